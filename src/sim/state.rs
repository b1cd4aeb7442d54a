//! Game state and core simulation types
//!
//! Everything a frame reads or writes lives in [`GameState`]; there are no
//! globals, so several games can run side by side.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::scoring::Scoreboard;
use crate::consts::MAX_FRAME_DELTA;
use crate::error::{GameError, ensure_invariant};
use crate::settings::Settings;
use crate::{Color, clamp, lerp, normalize, random_range};

/// Top-level phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Reset; never rendered on its own
    Init,
    /// Paddle, ball and help slide in
    Intro,
    /// Active gameplay
    Play,
    /// Frozen until the pause key is released again
    Pause,
    /// Outro animations, then back to Init
    End,
}

/// Outcome of a run, reported to the caller once the run completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Win,
    Lose,
    Quit,
}

/// Frame timing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameClock {
    /// Host timestamp of the current frame (seconds)
    pub current_time: f64,
    /// Seconds since the previous frame (0 on the first frame)
    pub delta: f32,
    /// Seconds of unpaused simulation; particle timestamps use this
    pub sim_time: f64,
    started: bool,
}

impl GameClock {
    /// Advance to `now`; a backwards timestamp yields a zero delta
    pub fn advance(&mut self, now: f64) {
        self.delta = if self.started {
            ((now - self.current_time) as f32).clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };
        self.current_time = now;
        self.started = true;
    }
}

/// A one-shot animation timer driven by frame deltas
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Timer {
    pub duration: f32,
    /// Progress the previous timer must exceed past 1.0 before this one runs
    pub delay: f32,
    /// Accumulates `delta / duration`; keeps growing past 1.0
    pub progress: f32,
}

impl Timer {
    pub fn new(duration: f32, delay: f32) -> Self {
        Self {
            duration,
            delay,
            progress: 0.0,
        }
    }

    pub fn advance(&mut self, delta: f32) {
        self.progress += delta / self.duration;
    }

    /// Progress clamped to `[0, 1]` for interpolation
    pub fn fraction(&self) -> f32 {
        clamp(self.progress, 0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Has this timer run far enough to unlock `next`
    pub fn unlocks(&self, next: &Timer) -> bool {
        self.progress > 1.0 + next.delay
    }
}

/// Delay-gated intro sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroTimers {
    pub paddle: Timer,
    pub ball: Timer,
    pub help: Timer,
    pub ball_spawned: bool,
    pub help_shown: bool,
}

impl IntroTimers {
    pub fn new(settings: &Settings) -> Self {
        Self {
            paddle: Timer::new(settings.intro_paddle_duration, 0.0),
            ball: Timer::new(settings.intro_ball_duration, settings.intro_ball_delay),
            help: Timer::new(settings.intro_help_duration, settings.intro_help_delay),
            ball_spawned: false,
            help_shown: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.paddle.is_complete() && self.ball.is_complete() && self.help.is_complete()
    }
}

/// Independent outro timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutroTimers {
    pub overlays: Timer,
    pub score: Timer,
    pub paddle: Timer,
    pub overlays_hidden: bool,
    pub score_hidden: bool,
}

impl OutroTimers {
    pub fn new(settings: &Settings) -> Self {
        Self {
            overlays: Timer::new(settings.outro_overlay_duration, 0.0),
            score: Timer::new(settings.outro_score_duration, 0.0),
            paddle: Timer::new(settings.outro_paddle_duration, 0.0),
            overlays_hidden: false,
            score_hidden: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.overlays.is_complete() && self.score.is_complete() && self.paddle.is_complete()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    /// x is the sign of this frame's motion (-1, 0 or +1)
    pub velocity: Vec2,
    /// Last nonzero direction, used for launch angle (-1 or +1)
    pub move_direction: f32,
    /// Width outside cheat mode
    pub base_width: f32,
}

impl Paddle {
    pub fn new(settings: &Settings) -> Self {
        Self {
            position: Vec2::ZERO,
            width: settings.paddle_width,
            height: settings.paddle_height,
            velocity: Vec2::ZERO,
            move_direction: 1.0,
            base_width: settings.paddle_width,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.position.x + self.width / 2.0
    }

    /// Keep the paddle inside `[0, window_width - width]`
    pub fn clamp_to(&mut self, window_width: f32) {
        self.position.x = clamp(self.position.x, 0.0, window_width - self.width);
    }

    /// Change width around the current center
    pub fn set_width_centered(&mut self, width: f32) {
        let center = self.center_x();
        self.width = width;
        self.position.x = center - width / 2.0;
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left corner
    pub position: Vec2,
    /// Edge length (balls are square)
    pub size: f32,
    /// Direction of travel, kept at unit length
    pub velocity: Vec2,
    /// Pixels per frame
    pub speed: f32,
    pub color: Color,
    pub destroyed: bool,
    /// Riding the paddle, waiting for launch
    pub attached: bool,
    /// Recent centers, oldest first
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    pub fn new_attached(paddle: &Paddle, settings: &Settings, color: Color) -> Self {
        let mut ball = Self {
            position: Vec2::ZERO,
            size: settings.ball_size,
            velocity: Vec2::ZERO,
            speed: settings.ball_speed,
            color,
            destroyed: false,
            attached: true,
            trail: VecDeque::with_capacity(settings.trail_length),
        };
        ball.ride(paddle);
        ball
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Sit centered on top of the paddle
    pub fn ride(&mut self, paddle: &Paddle) {
        self.position.x = paddle.center_x() - self.size / 2.0;
        self.position.y = paddle.position.y - self.size;
    }

    /// Detach from the paddle heading up and toward `direction`
    pub fn launch(&mut self, direction: f32) {
        self.attached = false;
        self.velocity = normalize(Vec2::new(direction, -1.0));
        self.trail.clear();
    }

    /// Append the current center, evicting the oldest past `cap`
    pub fn record_trail(&mut self, cap: usize) {
        self.trail.push_back(self.center());
        while self.trail.len() > cap {
            self.trail.pop_front();
        }
    }
}

/// A destructible block backed by a page element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Index into the page's block list
    pub id: usize,
    pub rect: Rect,
    pub destroyed: bool,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    /// Unit direction
    pub velocity: Vec2,
    /// Pixels per frame
    pub speed: f32,
    pub size: f32,
    pub color: Color,
    pub duration: f32,
    /// `GameClock::sim_time` at emission
    pub spawn_time: f64,
}

impl Particle {
    fn elapsed_ratio(&self, now: f64) -> f32 {
        ((now - self.spawn_time) as f32 / self.duration).max(0.0)
    }

    /// Move one frame and fade toward transparent
    pub fn advance(&mut self, now: f64) {
        self.position += self.velocity * self.speed;
        self.color.a = clamp(1.0 - self.elapsed_ratio(now), 0.0, 1.0);
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.spawn_time + self.duration as f64
    }
}

/// Ball and particle colors
pub const PALETTE: [Color; 6] = [
    Color::rgb(1.0, 0.35, 0.35),
    Color::rgb(1.0, 0.65, 0.2),
    Color::rgb(1.0, 0.9, 0.3),
    Color::rgb(0.4, 0.9, 0.45),
    Color::rgb(0.35, 0.7, 1.0),
    Color::rgb(0.75, 0.45, 1.0),
];

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    pub mode: GameMode,
    /// Latched outcome, surfaced when the outro finishes
    pub run_state: RunState,
    pub clock: GameClock,
    /// Logical window size
    pub window: Vec2,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub blocks: Vec<Block>,
    pub particles: Vec<Particle>,
    pub scoreboard: Scoreboard,
    pub intro: IntroTimers,
    pub outro: OutroTimers,
    pub cheats: bool,
    /// Draw block outlines in the render snapshot
    pub debug_draw: bool,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64, settings: &Settings, window: Vec2) -> Self {
        let mut state = Self {
            seed,
            mode: GameMode::Init,
            run_state: RunState::Running,
            clock: GameClock::default(),
            window,
            paddle: Paddle::new(settings),
            balls: Vec::new(),
            blocks: Vec::new(),
            particles: Vec::new(),
            scoreboard: Scoreboard::new(settings.start_lives),
            intro: IntroTimers::new(settings),
            outro: OutroTimers::new(settings),
            cheats: false,
            debug_draw: false,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.reset(settings);
        state
    }

    /// INIT: everything back to the start of a run
    pub fn reset(&mut self, settings: &Settings) {
        self.run_state = RunState::Running;
        self.cheats = false;
        self.paddle = Paddle::new(settings);
        self.paddle.position.x = (self.window.x - self.paddle.width) / 2.0;
        self.paddle.position.y = self.paddle_parked_y();
        self.balls.clear();
        self.blocks.clear();
        self.particles.clear();
        self.intro = IntroTimers::new(settings);
        self.outro = OutroTimers::new(settings);
        self.scoreboard = Scoreboard::new(settings.start_lives);
    }

    /// Paddle y while playing
    pub fn paddle_rest_y(&self, settings: &Settings) -> f32 {
        self.window.y - settings.paddle_bottom_offset - self.paddle.height
    }

    /// Paddle y when hidden below the window
    pub fn paddle_parked_y(&self) -> f32 {
        self.window.y
    }

    pub fn attached_ball_index(&self) -> Option<usize> {
        self.balls.iter().position(|b| b.attached)
    }

    /// Spawn a ball riding the paddle
    pub fn spawn_ball_attached(&mut self, settings: &Settings) -> Result<(), GameError> {
        ensure_invariant(
            settings.strict_invariants,
            self.attached_ball_index().is_none(),
            || "spawning a second attached ball".into(),
        )?;
        let color = PALETTE[self.rng.random_range(0..PALETTE.len())];
        self.balls.push(Ball::new_attached(&self.paddle, settings, color));
        log::debug!("Spawned attached ball ({} in play)", self.balls.len());
        Ok(())
    }

    /// Build the block set from page geometry (index = block id)
    pub fn build_blocks(
        bounds: &[Option<Rect>],
        settings: &Settings,
    ) -> Result<Vec<Block>, GameError> {
        if bounds.is_empty() {
            return Err(GameError::NoBlocks);
        }
        bounds
            .iter()
            .enumerate()
            .map(|(id, rect)| {
                let rect = rect.ok_or(GameError::MissingBlockGeometry { id })?;
                Ok(Block {
                    id,
                    rect: rect.expand(settings.block_margin),
                    destroyed: false,
                })
            })
            .collect()
    }

    /// Recompute block rectangles, keeping `destroyed` flags. Blocks are
    /// left untouched unless every id still has geometry.
    pub fn refresh_block_geometry(
        &mut self,
        bounds: &[Option<Rect>],
        settings: &Settings,
    ) -> Result<(), GameError> {
        let rects = self
            .blocks
            .iter()
            .map(|block| {
                bounds
                    .get(block.id)
                    .copied()
                    .flatten()
                    .map(|rect| rect.expand(settings.block_margin))
                    .ok_or(GameError::MissingBlockGeometry { id: block.id })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (block, rect) in self.blocks.iter_mut().zip(rects) {
            block.rect = rect;
        }
        Ok(())
    }

    pub fn blocks_remaining(&self) -> usize {
        self.blocks.iter().filter(|b| !b.destroyed).count()
    }
}

/// Number of particles for a block of the given area
pub fn burst_size(area: f32, settings: &Settings) -> usize {
    let t = clamp(area / settings.particle_area_reference, 0.0, 1.0);
    lerp(settings.particles_min as f32, settings.particles_max as f32, t).round() as usize
}

/// Emit a burst of particles over `rect`.
///
/// The pool is capped at `max_particles`; the oldest particles make room.
pub fn emit_particles(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    rect: &Rect,
    now: f64,
    settings: &Settings,
) {
    let count = burst_size(rect.area(), settings).min(settings.max_particles);
    let overflow = (particles.len() + count).saturating_sub(settings.max_particles);
    if overflow > 0 {
        log::debug!("Particle pool full, evicting {overflow} oldest");
        particles.drain(..overflow);
    }

    for _ in 0..count {
        let angle = random_range(rng, 0.0, std::f32::consts::TAU);
        particles.push(Particle {
            position: Vec2::new(
                random_range(rng, rect.left(), rect.right()),
                random_range(rng, rect.top(), rect.bottom()),
            ),
            velocity: Vec2::new(angle.cos(), angle.sin()),
            speed: random_range(rng, settings.particle_speed.0, settings.particle_speed.1),
            size: random_range(rng, settings.particle_size.0, settings.particle_size.1),
            color: PALETTE[rng.random_range(0..PALETTE.len())],
            duration: random_range(rng, settings.particle_duration.0, settings.particle_duration.1),
            spawn_time: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_clock_first_frame_zero_delta() {
        let mut clock = GameClock::default();
        clock.advance(12.0);
        assert_eq!(clock.delta, 0.0);
        clock.advance(12.016);
        assert!((clock.delta - 0.016).abs() < 1e-4);
        // Long stall is clamped
        clock.advance(20.0);
        assert_eq!(clock.delta, MAX_FRAME_DELTA);
    }

    #[test]
    fn test_timer_gating() {
        let mut first = Timer::new(0.5, 0.0);
        let second = Timer::new(0.5, 0.2);
        first.advance(0.5);
        assert!(first.is_complete());
        assert!(!first.unlocks(&second));
        first.advance(0.11);
        assert!(first.unlocks(&second));
        assert_eq!(first.fraction(), 1.0);
    }

    #[test]
    fn test_reset_parks_paddle() {
        let s = settings();
        let state = GameState::new(1, &s, Vec2::new(800.0, 600.0));
        assert_eq!(state.mode, GameMode::Init);
        assert_eq!(state.paddle.position.y, 600.0);
        assert_eq!(state.paddle.center_x(), 400.0);
        assert_eq!(state.scoreboard.lives, s.start_lives);
    }

    #[test]
    fn test_ball_rides_paddle() {
        let s = settings();
        let mut paddle = Paddle::new(&s);
        paddle.position = Vec2::new(100.0, 500.0);
        let ball = Ball::new_attached(&paddle, &s, PALETTE[0]);
        assert_eq!(ball.center().x, paddle.center_x());
        assert_eq!(ball.rect().bottom(), 500.0);
        assert!(ball.attached);
    }

    #[test]
    fn test_trail_cap_evicts_oldest() {
        let s = settings();
        let paddle = Paddle::new(&s);
        let mut ball = Ball::new_attached(&paddle, &s, PALETTE[0]);
        for i in 0..5 {
            ball.position.x = i as f32;
            ball.record_trail(3);
        }
        assert_eq!(ball.trail.len(), 3);
        assert_eq!(ball.trail.front().unwrap().x, 2.0 + ball.size / 2.0);
        assert_eq!(ball.trail.back().unwrap().x, 4.0 + ball.size / 2.0);
    }

    #[test]
    fn test_build_blocks_errors() {
        let s = settings();
        assert!(matches!(
            GameState::build_blocks(&[], &s),
            Err(GameError::NoBlocks)
        ));
        let bounds = [Some(Rect::new(0.0, 0.0, 10.0, 10.0)), None];
        assert!(matches!(
            GameState::build_blocks(&bounds, &s),
            Err(GameError::MissingBlockGeometry { id: 1 })
        ));
    }

    #[test]
    fn test_build_blocks_applies_margin() {
        let s = settings();
        let blocks =
            GameState::build_blocks(&[Some(Rect::new(50.0, 50.0, 100.0, 20.0))], &s).unwrap();
        assert_eq!(blocks[0].rect, Rect::new(50.0, 50.0, 100.0, 20.0).expand(s.block_margin));
        assert!(!blocks[0].destroyed);
    }

    #[test]
    fn test_burst_size_scales_with_area() {
        let s = settings();
        assert_eq!(burst_size(0.0, &s), s.particles_min as usize);
        assert_eq!(burst_size(1e9, &s), s.particles_max as usize);
        let mid = burst_size(s.particle_area_reference / 2.0, &s);
        assert!(mid > s.particles_min as usize && mid < s.particles_max as usize);
    }

    #[test]
    fn test_particle_fade_and_expiry() {
        let mut p = Particle {
            position: Vec2::ZERO,
            velocity: Vec2::X,
            speed: 2.0,
            size: 3.0,
            color: PALETTE[0],
            duration: 1.0,
            spawn_time: 10.0,
        };
        p.advance(10.5);
        assert_eq!(p.position, Vec2::new(2.0, 0.0));
        assert!((p.color.a - 0.5).abs() < 1e-5);
        assert!(!p.is_expired(10.99));
        assert!(p.is_expired(11.0));
    }

    #[test]
    fn test_particle_pool_evicts_oldest_in_any_mode() {
        for strict in [false, true] {
            let mut s = settings();
            s.strict_invariants = strict;
            s.max_particles = 5;
            let mut rng = Pcg32::seed_from_u64(3);
            let mut particles = Vec::new();
            let rect = Rect::new(0.0, 0.0, 400.0, 400.0);

            emit_particles(&mut particles, &mut rng, &rect, 0.0, &s);
            assert_eq!(particles.len(), 5);

            // A second burst replaces the first one entirely
            emit_particles(&mut particles, &mut rng, &rect, 1.0, &s);
            assert_eq!(particles.len(), 5);
            assert!(particles.iter().all(|p| p.spawn_time == 1.0));
        }
    }

    #[test]
    fn test_particle_pool_partial_eviction() {
        let mut s = settings();
        s.max_particles = 26;
        let mut rng = Pcg32::seed_from_u64(9);
        let mut particles = Vec::new();
        let big = Rect::new(0.0, 0.0, 400.0, 400.0);
        emit_particles(&mut particles, &mut rng, &big, 0.0, &s);
        assert_eq!(particles.len(), s.particles_max as usize);

        let small = Rect::new(0.0, 0.0, 1.0, 1.0);
        emit_particles(&mut particles, &mut rng, &small, 2.0, &s);
        assert_eq!(particles.len(), 26);
        // Two of the oldest made room; the new burst sits at the back
        assert_eq!(particles.iter().filter(|p| p.spawn_time == 0.0).count(), 22);
        assert_eq!(particles.iter().filter(|p| p.spawn_time == 2.0).count(), 4);
        assert_eq!(particles[25].spawn_time, 2.0);
        assert_eq!(particles[0].spawn_time, 0.0);
    }

    #[test]
    fn test_refresh_geometry_is_all_or_nothing() {
        let s = settings();
        let mut state = GameState::new(1, &s, Vec2::new(800.0, 600.0));
        let original = [
            Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
            Some(Rect::new(50.0, 0.0, 10.0, 10.0)),
        ];
        state.blocks = GameState::build_blocks(&original, &s).unwrap();
        let before: Vec<Rect> = state.blocks.iter().map(|b| b.rect).collect();

        let reflowed = [Some(Rect::new(5.0, 5.0, 10.0, 10.0)), None];
        assert!(matches!(
            state.refresh_block_geometry(&reflowed, &s),
            Err(GameError::MissingBlockGeometry { id: 1 })
        ));
        let after: Vec<Rect> = state.blocks.iter().map(|b| b.rect).collect();
        assert_eq!(after, before);

        state.blocks[0].destroyed = true;
        let reflowed = [Some(Rect::new(5.0, 5.0, 10.0, 10.0)), original[1]];
        state.refresh_block_geometry(&reflowed, &s).unwrap();
        assert_eq!(state.blocks[0].rect, Rect::new(5.0, 5.0, 10.0, 10.0).expand(s.block_margin));
        assert!(state.blocks[0].destroyed);
    }
}
