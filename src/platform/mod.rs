//! Platform abstraction layer
//!
//! The simulation only talks to the outside world through these traits:
//! - [`Page`]: block discovery, DOM destruction and HUD overlays
//! - [`Renderer`]: rectangle and trail drawing
//! - [`crate::audio::AudioSink`]: clip playback
//!
//! `headless` provides in-memory implementations for the native demo and tests.

mod headless;

pub use crate::audio::AudioSink;
pub use headless::{AudioEvent, HeadlessPage, PageEvent, RecordingAudio, RecordingRenderer};

use glam::Vec2;

use crate::Color;
use crate::sim::Rect;

/// The web page the game is played over
pub trait Page {
    /// Bounding rectangles of every destructible element, indexed by block id.
    /// `None` means the element currently has no layout box.
    fn block_bounds(&self) -> Vec<Option<Rect>>;
    /// Hide/mark the element behind block `id`
    fn destroy_block(&mut self, id: usize);
    fn show_help(&mut self);
    fn hide_help(&mut self);
    fn show_score(&mut self, score: u64, multiplier: f32);
    fn hide_score(&mut self);
    fn show_pause(&mut self);
    fn hide_pause(&mut self);
    fn show_lives(&mut self, lives: i32);
    fn hide_lives(&mut self);
}

/// Drawing backend (canvas, WebGL, ...)
pub trait Renderer {
    fn clear(&mut self, color: Color);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_trail(&mut self, point: Vec2, size: f32, color: Color);
}
