//! Frame step and mode state machine
//!
//! INIT -> INTRO -> PLAY <-> PAUSE, PLAY -> END -> INIT. A quit request
//! short-circuits from any mode.

use super::physics::{play_frame, update_particles};
use super::state::{GameMode, GameState, RunState};
use crate::audio::{Audio, SoundClip};
use crate::error::GameError;
use crate::input::{InputState, Key};
use crate::lerp;
use crate::platform::Page;
use crate::settings::Settings;

/// Everything outside [`GameState`] a frame may touch
pub struct FrameContext<'a> {
    pub input: &'a InputState,
    pub page: &'a mut dyn Page,
    pub audio: &'a mut Audio,
    pub settings: &'a Settings,
}

/// Advance the game by one frame at host time `now` (seconds).
///
/// Returns the run outcome; anything but `Running` means the run just
/// completed and the state is back in `Init`.
pub fn tick(
    state: &mut GameState,
    ctx: &mut FrameContext<'_>,
    now: f64,
) -> Result<RunState, GameError> {
    state.clock.advance(now);

    if ctx.input.key(Key::DebugDraw).released {
        state.debug_draw = !state.debug_draw;
    }

    // Reset first so a quit right after a finished run reports a fresh score
    if state.mode == GameMode::Init {
        enter_init(state, ctx.settings);
    }

    if ctx.input.quit_requested() {
        return Ok(quit(state, ctx));
    }

    if state.mode != GameMode::Pause {
        state.clock.sim_time += state.clock.delta as f64;
    }

    match state.mode {
        // Left for Intro above
        GameMode::Init => {}
        GameMode::Intro => intro(state, ctx)?,
        GameMode::Play => play_frame(state, ctx)?,
        GameMode::Pause => pause(state, ctx),
        GameMode::End => return Ok(end(state, ctx)),
    }
    Ok(RunState::Running)
}

fn enter_init(state: &mut GameState, settings: &Settings) {
    state.reset(settings);
    state.mode = GameMode::Intro;
    log::info!("New run: {}x{} window", state.window.x, state.window.y);
}

fn quit(state: &mut GameState, ctx: &mut FrameContext<'_>) -> RunState {
    ctx.page.hide_help();
    ctx.page.hide_pause();
    ctx.page.hide_score();
    ctx.page.hide_lives();
    ctx.audio.stop_music();
    state.mode = GameMode::Init;
    state.run_state = RunState::Quit;
    log::info!("Quit with score {}", state.scoreboard.score);
    RunState::Quit
}

/// Paddle, then ball, then help; each gated on the previous timer
fn intro(state: &mut GameState, ctx: &mut FrameContext<'_>) -> Result<(), GameError> {
    let delta = state.clock.delta;
    let settings = ctx.settings;
    let rest_y = state.paddle_rest_y(settings);
    let parked_y = state.paddle_parked_y();

    state.intro.paddle.advance(delta);
    state.paddle.position.y = lerp(parked_y, rest_y, state.intro.paddle.fraction());

    if state.intro.paddle.unlocks(&state.intro.ball) {
        if !state.intro.ball_spawned {
            state.spawn_ball_attached(settings)?;
            state.intro.ball_spawned = true;
        }
        state.intro.ball.advance(delta);
    }

    // The ball rises out of the paddle into its resting spot
    let fraction = state.intro.ball.fraction();
    if let Some(idx) = state.attached_ball_index() {
        let paddle = &state.paddle;
        let ball = &mut state.balls[idx];
        ball.ride(paddle);
        ball.position.y = lerp(paddle.position.y, paddle.position.y - ball.size, fraction);
    }

    if state.intro.ball.unlocks(&state.intro.help) {
        if !state.intro.help_shown {
            ctx.page.show_help();
            state.intro.help_shown = true;
        }
        state.intro.help.advance(delta);
    }

    if state.intro.is_complete() {
        start_play(state, ctx)?;
    }
    Ok(())
}

/// Sample the page (help overlay included) and hand over to PLAY
fn start_play(state: &mut GameState, ctx: &mut FrameContext<'_>) -> Result<(), GameError> {
    let settings = ctx.settings;
    let bounds = ctx.page.block_bounds();
    state.blocks = GameState::build_blocks(&bounds, settings)?;

    state.paddle.position.y = state.paddle_rest_y(settings);
    match state.attached_ball_index() {
        Some(idx) => state.balls[idx].ride(&state.paddle),
        None => state.spawn_ball_attached(settings)?,
    }

    ctx.page
        .show_score(state.scoreboard.score, state.scoreboard.multiplier);
    ctx.page.show_lives(state.scoreboard.lives);
    ctx.audio.play(SoundClip::Music);
    state.mode = GameMode::Play;
    log::info!("Play: {} blocks", state.blocks.len());
    Ok(())
}

fn pause(state: &mut GameState, ctx: &mut FrameContext<'_>) {
    if ctx.input.key(Key::Pause).released {
        state.mode = GameMode::Play;
        ctx.page.hide_pause();
        log::info!("Resumed");
    }
}

/// Independent outro timers; reports the latched outcome when all finish
fn end(state: &mut GameState, ctx: &mut FrameContext<'_>) -> RunState {
    let delta = state.clock.delta;
    let rest_y = state.paddle_rest_y(ctx.settings);
    let parked_y = state.paddle_parked_y();
    let outro = &mut state.outro;

    if !outro.overlays_hidden {
        ctx.page.hide_help();
        ctx.page.hide_pause();
        outro.overlays_hidden = true;
    }
    outro.overlays.advance(delta);

    if !outro.score_hidden {
        ctx.page.hide_score();
        ctx.page.hide_lives();
        outro.score_hidden = true;
    }
    outro.score.advance(delta);

    outro.paddle.advance(delta);
    state.paddle.position.y = lerp(rest_y, parked_y, outro.paddle.fraction());

    update_particles(&mut state.particles, state.clock.sim_time);

    if state.outro.is_complete() {
        state.mode = GameMode::Init;
        log::info!("Outro finished: {:?}", state.run_state);
        return state.run_state;
    }
    RunState::Running
}
