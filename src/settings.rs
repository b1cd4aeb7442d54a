//! Game tuning
//!
//! Every gameplay constant lives here so a host can ship its own balance as
//! JSON. Missing fields fall back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// Game settings/tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Pixels per frame while a movement key is held
    pub paddle_speed: f32,
    /// Gap between resting paddle and window bottom
    pub paddle_bottom_offset: f32,
    pub cheat_width_factor: f32,
    /// Ball x velocity = paddle velocity * this on a moving-paddle bounce
    pub paddle_english: f32,

    // === Ball ===
    pub ball_size: f32,
    pub ball_speed: f32,
    pub ball_speed_step: f32,
    pub ball_max_speed: f32,
    pub trail_length: usize,

    // === Blocks & scoring ===
    pub block_margin: f32,
    pub points_per_block: u32,
    pub multiplier_step: f32,
    pub start_lives: i32,

    // === Particles ===
    pub particles_min: u32,
    pub particles_max: u32,
    pub particle_area_reference: f32,
    pub particle_speed: (f32, f32),
    pub particle_size: (f32, f32),
    pub particle_duration: (f32, f32),
    pub max_particles: usize,

    // === Intro/outro (seconds, delays in progress units) ===
    pub intro_paddle_duration: f32,
    pub intro_ball_duration: f32,
    pub intro_ball_delay: f32,
    pub intro_help_duration: f32,
    pub intro_help_delay: f32,
    pub outro_overlay_duration: f32,
    pub outro_score_duration: f32,
    pub outro_paddle_duration: f32,

    // === Diagnostics ===
    /// Turn invariant violations into fatal errors
    pub strict_invariants: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,
            cheat_width_factor: CHEAT_WIDTH_FACTOR,
            paddle_english: PADDLE_ENGLISH,

            ball_size: BALL_SIZE,
            ball_speed: BALL_START_SPEED,
            ball_speed_step: BALL_SPEED_STEP,
            ball_max_speed: BALL_MAX_SPEED,
            trail_length: TRAIL_LENGTH,

            block_margin: BLOCK_MARGIN,
            points_per_block: POINTS_PER_BLOCK,
            multiplier_step: MULTIPLIER_STEP,
            start_lives: START_LIVES,

            particles_min: PARTICLES_MIN,
            particles_max: PARTICLES_MAX,
            particle_area_reference: PARTICLE_AREA_REFERENCE,
            particle_speed: (PARTICLE_SPEED_MIN, PARTICLE_SPEED_MAX),
            particle_size: (PARTICLE_SIZE_MIN, PARTICLE_SIZE_MAX),
            particle_duration: (PARTICLE_DURATION_MIN, PARTICLE_DURATION_MAX),
            max_particles: MAX_PARTICLES,

            intro_paddle_duration: INTRO_PADDLE_DURATION,
            intro_ball_duration: INTRO_BALL_DURATION,
            intro_ball_delay: INTRO_BALL_DELAY,
            intro_help_duration: INTRO_HELP_DURATION,
            intro_help_delay: INTRO_HELP_DELAY,
            outro_overlay_duration: OUTRO_OVERLAY_DURATION,
            outro_score_duration: OUTRO_SCORE_DURATION,
            outro_paddle_duration: OUTRO_PADDLE_DURATION,

            strict_invariants: cfg!(debug_assertions),
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take defaults) and validate
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        let positive = [
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_size", self.ball_size),
            ("ball_speed", self.ball_speed),
            ("cheat_width_factor", self.cheat_width_factor),
            ("particle_area_reference", self.particle_area_reference),
            ("intro_paddle_duration", self.intro_paddle_duration),
            ("intro_ball_duration", self.intro_ball_duration),
            ("intro_help_duration", self.intro_help_duration),
            ("outro_overlay_duration", self.outro_overlay_duration),
            ("outro_score_duration", self.outro_score_duration),
            ("outro_paddle_duration", self.outro_paddle_duration),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(GameError::InvalidSetting {
                    name,
                    reason: format!("must be > 0, got {value}"),
                });
            }
        }

        if self.ball_max_speed < self.ball_speed {
            return Err(GameError::InvalidSetting {
                name: "ball_max_speed",
                reason: format!("{} is below ball_speed {}", self.ball_max_speed, self.ball_speed),
            });
        }
        if self.particles_min > self.particles_max {
            return Err(GameError::InvalidSetting {
                name: "particles_min",
                reason: format!("{} exceeds particles_max {}", self.particles_min, self.particles_max),
            });
        }
        if self.particle_duration.0 <= 0.0 || self.particle_duration.1 < self.particle_duration.0 {
            return Err(GameError::InvalidSetting {
                name: "particle_duration",
                reason: format!("bad range {:?}", self.particle_duration),
            });
        }
        if self.start_lives < 0 {
            return Err(GameError::InvalidSetting {
                name: "start_lives",
                reason: format!("must be >= 0, got {}", self.start_lives),
            });
        }
        if self.trail_length == 0 {
            return Err(GameError::InvalidSetting {
                name: "trail_length",
                reason: "must hold at least one point".into(),
            });
        }
        Ok(())
    }
}
