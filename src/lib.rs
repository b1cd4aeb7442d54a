//! Page Breaker - Breakout over the elements of a web page
//!
//! Core modules:
//! - `sim`: Deterministic simulation (modes, physics, collisions, scoring)
//! - `game`: Frame driver and public API
//! - `input`: Logical keys, edge flags and the platform key map
//! - `platform`: Page/renderer capability traits and a headless implementation
//! - `renderer`: Render snapshots handed to an external renderer
//! - `audio`: Sound clip keys and a degradable audio front
//! - `settings`: Data-driven game tuning

pub mod audio;
pub mod error;
pub mod game;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use game::{FrameResult, Game};
pub use settings::Settings;
pub use sim::{GameMode, RunState};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Longest frame delta the simulation accepts (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    /// Pixels per frame while a movement key is held
    pub const PADDLE_SPEED: f32 = 12.0;
    /// Gap between the resting paddle and the bottom of the window
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
    /// Cheat mode paddle widening
    pub const CHEAT_WIDTH_FACTOR: f32 = 3.0;
    /// Horizontal "english" imparted by a moving paddle
    pub const PADDLE_ENGLISH: f32 = 1.5;

    /// Ball defaults (speeds are pixels per frame)
    pub const BALL_SIZE: f32 = 12.0;
    pub const BALL_START_SPEED: f32 = 6.0;
    pub const BALL_SPEED_STEP: f32 = 0.15;
    pub const BALL_MAX_SPEED: f32 = 16.0;
    /// Maximum number of trail points to store
    pub const TRAIL_LENGTH: usize = 20;

    /// Blocks are grown past the element's bounding box by this much per side
    pub const BLOCK_MARGIN: f32 = 4.0;

    /// Scoring
    pub const POINTS_PER_BLOCK: u32 = 10;
    pub const MULTIPLIER_STEP: f32 = 0.1;
    pub const START_LIVES: i32 = 2;

    /// Particle bursts
    pub const PARTICLES_MIN: u32 = 4;
    pub const PARTICLES_MAX: u32 = 24;
    /// Block area (px²) at which a burst reaches `PARTICLES_MAX`
    pub const PARTICLE_AREA_REFERENCE: f32 = 40_000.0;
    pub const PARTICLE_SPEED_MIN: f32 = 1.0;
    pub const PARTICLE_SPEED_MAX: f32 = 4.0;
    pub const PARTICLE_SIZE_MIN: f32 = 2.0;
    pub const PARTICLE_SIZE_MAX: f32 = 6.0;
    pub const PARTICLE_DURATION_MIN: f32 = 0.4;
    pub const PARTICLE_DURATION_MAX: f32 = 1.0;
    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 512;

    /// Intro sequence (seconds; delays are in progress units of the previous timer)
    pub const INTRO_PADDLE_DURATION: f32 = 0.6;
    pub const INTRO_BALL_DURATION: f32 = 0.4;
    pub const INTRO_BALL_DELAY: f32 = 0.1;
    pub const INTRO_HELP_DURATION: f32 = 0.3;
    pub const INTRO_HELP_DELAY: f32 = 0.2;

    /// Outro sequence (seconds)
    pub const OUTRO_OVERLAY_DURATION: f32 = 0.3;
    pub const OUTRO_SCORE_DURATION: f32 = 0.5;
    pub const OUTRO_PADDLE_DURATION: f32 = 0.6;
}

/// RGBA color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f32::clamp` this never panics: when the range is inverted (a window
/// narrower than the paddle) `min` wins.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Linear interpolation from `a` to `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Unit vector in the direction of `v`, or zero for a zero vector
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Is `point` inside the box at `origin` with the given size (edges inclusive)
#[inline]
pub fn point_in_box(point: Vec2, origin: Vec2, size: Vec2) -> bool {
    point.x >= origin.x
        && point.x <= origin.x + size.x
        && point.y >= origin.y
        && point.y <= origin.y + size.y
}

/// Uniform sample from `[min, max)`; returns `min` for an empty range
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}
