//! The PLAY frame
//!
//! Order matters and is fixed: cheat toggle, paddle, launch, balls (reverse
//! order, removed the frame they die), particles, win check.

use super::collision::{bounce_off_paddle, reflect, reflection_axis, renormalize, resolve_walls};
use super::scoring::BallLoss;
use super::state::{GameMode, GameState, Particle, RunState, emit_particles};
use super::tick::FrameContext;
use crate::audio::SoundClip;
use crate::error::GameError;
use crate::input::{InputState, Key};
use crate::settings::Settings;

/// Advance one PLAY frame
pub fn play_frame(state: &mut GameState, ctx: &mut FrameContext<'_>) -> Result<(), GameError> {
    if ctx.input.key(Key::Pause).released {
        state.mode = GameMode::Pause;
        ctx.page.show_pause();
        log::info!("Paused");
        return Ok(());
    }

    if ctx.input.key(Key::Cheat).released {
        toggle_cheats(state, ctx.settings);
    }

    move_paddle(state, ctx.input, ctx.settings);

    if ctx.input.confirm_released() {
        launch_or_spawn(state, ctx)?;
    }

    update_balls(state, ctx)?;
    if state.run_state == RunState::Lose {
        enter_end(state, ctx, RunState::Lose);
        return Ok(());
    }

    update_particles(&mut state.particles, state.clock.sim_time);

    if !state.blocks.is_empty() && state.blocks.iter().all(|b| b.destroyed) {
        enter_end(state, ctx, RunState::Win);
    }
    Ok(())
}

/// Latch the outcome and start the outro
pub fn enter_end(state: &mut GameState, ctx: &mut FrameContext<'_>, outcome: RunState) {
    state.run_state = outcome;
    state.mode = GameMode::End;
    state.balls.clear();
    ctx.audio.stop_music();
    ctx.audio.play(match outcome {
        RunState::Win => SoundClip::Win,
        _ => SoundClip::Lose,
    });
    log::info!(
        "Run over: {:?} with score {} ({} blocks left)",
        outcome,
        state.scoreboard.score,
        state.blocks_remaining()
    );
}

fn toggle_cheats(state: &mut GameState, settings: &Settings) {
    state.cheats = !state.cheats;
    let width = if state.cheats {
        state.paddle.base_width * settings.cheat_width_factor
    } else {
        state.paddle.base_width
    };
    state.paddle.set_width_centered(width);
    state.paddle.clamp_to(state.window.x);
    log::info!("Cheats {}", if state.cheats { "on" } else { "off" });
}

/// Pointer movement wins over the keyboard for this frame
pub fn move_paddle(state: &mut GameState, input: &InputState, settings: &Settings) {
    let paddle = &mut state.paddle;

    if input.mouse_changed() {
        let old_x = paddle.position.x;
        paddle.position.x = input.mouse_position().x - paddle.width / 2.0;
        paddle.clamp_to(state.window.x);
        let displacement = paddle.position.x - old_x;
        paddle.velocity.x = if displacement > 0.0 {
            1.0
        } else if displacement < 0.0 {
            -1.0
        } else {
            0.0
        };
    } else {
        let mut direction = 0.0;
        if input.key(Key::Left).down {
            direction -= 1.0;
        }
        if input.key(Key::Right).down {
            direction += 1.0;
        }
        paddle.velocity.x = direction;
        paddle.position.x += direction * settings.paddle_speed;
        paddle.clamp_to(state.window.x);
    }

    if paddle.velocity.x != 0.0 {
        paddle.move_direction = paddle.velocity.x;
    }
}

fn launch_or_spawn(state: &mut GameState, ctx: &mut FrameContext<'_>) -> Result<(), GameError> {
    if let Some(idx) = state.attached_ball_index() {
        let direction = state.paddle.move_direction;
        state.balls[idx].launch(direction);
        ctx.audio.play(SoundClip::Launch);
        log::debug!("Launched ball {idx} toward {direction}");
    } else if state.scoreboard.can_spawn(state.balls.len(), state.cheats) {
        state.spawn_ball_attached(ctx.settings)?;
    }
    Ok(())
}

/// Integrate and collide every ball, newest first
fn update_balls(state: &mut GameState, ctx: &mut FrameContext<'_>) -> Result<(), GameError> {
    let settings = ctx.settings;
    let GameState {
        balls,
        blocks,
        particles,
        scoreboard,
        paddle,
        rng,
        clock,
        window,
        cheats,
        run_state,
        ..
    } = state;

    for i in (0..balls.len()).rev() {
        let ball = &mut balls[i];

        if ball.attached {
            ball.ride(paddle);
            continue;
        }

        ball.position += ball.velocity * ball.speed;

        let walls = resolve_walls(ball, *window);
        let mut bounced = walls.bounced;
        if walls.bounced {
            ctx.audio.play(SoundClip::WallHit);
        }

        if walls.fell {
            ball.destroyed = true;
        } else {
            if bounce_off_paddle(ball, paddle, settings.paddle_english) {
                bounced = true;
                ctx.audio.play(SoundClip::PaddleHit);
            }

            for block in blocks.iter_mut().filter(|b| !b.destroyed) {
                if !ball.rect().overlaps(&block.rect) {
                    continue;
                }
                let axis = reflection_axis(ball.center(), &block.rect);
                ball.velocity = reflect(ball.velocity, axis);
                bounced = true;

                block.destroyed = true;
                ctx.page.destroy_block(block.id);
                let points = scoreboard.award_block(settings);
                ball.speed = (ball.speed + settings.ball_speed_step).min(settings.ball_max_speed);
                emit_particles(particles, rng, &block.rect, clock.sim_time, settings);
                ctx.audio.play(SoundClip::BlockBreak);
                ctx.page.show_score(scoreboard.score, scoreboard.multiplier);
                log::debug!(
                    "Block {} destroyed (+{points}, x{:.1}, {axis:?} bounce)",
                    block.id,
                    scoreboard.multiplier
                );
            }

            if bounced {
                ball.velocity = renormalize(ball.velocity);
            }
            ball.record_trail(settings.trail_length);
        }

        if ball.destroyed {
            balls.remove(i);
            ctx.audio.play(SoundClip::BallLost);
            let loss = scoreboard.lose_ball(*cheats);
            log::debug!("Ball lost ({loss:?}), {} lives left", scoreboard.lives);
            match loss {
                BallLoss::GameOver => {
                    *run_state = RunState::Lose;
                    break;
                }
                BallLoss::LifeLost => ctx.page.show_lives(scoreboard.lives),
                BallLoss::Shielded => {}
            }
            ctx.page.show_score(scoreboard.score, scoreboard.multiplier);
        }
    }
    Ok(())
}

/// Move live particles and drop expired ones
pub fn update_particles(particles: &mut Vec<Particle>, now: f64) {
    particles.retain(|p| !p.is_expired(now));
    for particle in particles.iter_mut() {
        particle.advance(now);
    }
}
