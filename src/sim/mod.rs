//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (one `Pcg32` per game)
//! - Balls iterate newest first and are removed the frame they die
//! - No rendering or platform dependencies beyond the capability traits

pub mod collision;
pub mod physics;
pub mod rect;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{Axis, WallContact, reflect, reflection_axis};
pub use rect::Rect;
pub use scoring::{BallLoss, Scoreboard};
pub use state::{
    Ball, Block, GameClock, GameMode, GameState, IntroTimers, OutroTimers, PALETTE, Paddle,
    Particle, RunState, Timer,
};
pub use tick::{FrameContext, tick};
