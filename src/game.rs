//! Frame driver and public API
//!
//! A [`Game`] owns the simulation state plus the host capabilities. The host
//! forwards raw input events as they arrive and calls [`Game::update`] once
//! per animation frame.

use glam::Vec2;

use crate::audio::{Audio, AudioSink, SoundClip};
use crate::error::GameError;
use crate::input::{InputState, KeyMap};
use crate::platform::{Page, Renderer};
use crate::renderer::{RenderSnapshot, build_snapshot, draw};
use crate::settings::Settings;
use crate::sim::{FrameContext, GameMode, GameState, RunState, tick};

/// Window size used until the host's first `resize`
pub const DEFAULT_WINDOW_SIZE: Vec2 = Vec2::new(1280.0, 720.0);

/// What one `update` reports back to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    /// `Running`, or the outcome of a run that completed this frame
    pub state: RunState,
    pub score: u64,
}

/// One game played over a page
pub struct Game<P: Page, R: Renderer> {
    state: GameState,
    settings: Settings,
    page: P,
    renderer: R,
    audio: Audio,
    input: InputState,
    key_map: KeyMap,
    snapshot: RenderSnapshot,
}

impl<P: Page, R: Renderer> Game<P, R> {
    pub fn new(page: P, renderer: R, settings: Settings, seed: u64) -> Self {
        let state = GameState::new(seed, &settings, DEFAULT_WINDOW_SIZE);
        Self {
            state,
            settings,
            page,
            renderer,
            audio: Audio::disabled(),
            input: InputState::default(),
            key_map: KeyMap::default(),
            snapshot: RenderSnapshot::default(),
        }
    }

    /// Attach the host's audio backend
    pub fn with_audio(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio = Audio::new(sink);
        self
    }

    /// Clip keys the host must load before the first frame
    pub fn clips_to_load() -> impl Iterator<Item = &'static str> {
        SoundClip::ALL.into_iter().map(|clip| clip.key())
    }

    /// Check settings and page before the first frame
    pub fn init(&mut self) -> Result<(), GameError> {
        self.settings.validate()?;
        let blocks = self.page.block_bounds();
        if blocks.is_empty() {
            return Err(GameError::NoBlocks);
        }
        log::info!(
            "Game ready: {} blocks, seed {}, audio {}",
            blocks.len(),
            self.state.seed,
            if self.audio.is_enabled() { "on" } else { "off" }
        );
        Ok(())
    }

    /// Run one frame at host time `current_time` (seconds)
    pub fn update(&mut self, current_time: f64) -> Result<FrameResult, GameError> {
        let mut ctx = FrameContext {
            input: &self.input,
            page: &mut self.page,
            audio: &mut self.audio,
            settings: &self.settings,
        };
        let outcome = tick(&mut self.state, &mut ctx, current_time);

        if outcome.is_ok() && self.state.mode != GameMode::Init {
            self.snapshot = build_snapshot(&self.state);
            draw(&self.snapshot, &mut self.renderer);
        }
        self.input.clear_edges();

        Ok(FrameResult {
            state: outcome?,
            score: self.state.scoreboard.score,
        })
    }

    /// New window bounds. Mid-run, block and paddle geometry follow the page.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), GameError> {
        let in_run = matches!(self.state.mode, GameMode::Play | GameMode::Pause);
        if in_run {
            // Fails before anything is written
            let bounds = self.page.block_bounds();
            self.state.refresh_block_geometry(&bounds, &self.settings)?;
        }

        self.state.window = Vec2::new(width, height);
        if !in_run {
            return Ok(());
        }

        let state = &mut self.state;
        state.paddle.position.y = state.paddle_rest_y(&self.settings);
        state.paddle.clamp_to(width);
        if let Some(idx) = state.attached_ball_index() {
            state.balls[idx].ride(&state.paddle);
        }
        log::debug!("Resized to {width}x{height}");
        Ok(())
    }

    pub fn keydown(&mut self, code: &str) {
        match self.key_map.key(code) {
            Ok(key) => self.input.key_down(key),
            Err(e) => log::error!("{e}"),
        }
    }

    pub fn keyup(&mut self, code: &str) {
        match self.key_map.key(code) {
            Ok(key) => self.input.key_up(key),
            Err(e) => log::error!("{e}"),
        }
    }

    pub fn mousedown(&mut self, button: i16) {
        match self.key_map.button(button) {
            Ok(button) => self.input.button_down(button),
            Err(e) => log::error!("{e}"),
        }
    }

    pub fn mouseup(&mut self, button: i16) {
        match self.key_map.button(button) {
            Ok(button) => self.input.button_up(button),
            Err(e) => log::error!("{e}"),
        }
    }

    pub fn mousemove(&mut self, x: f32, y: f32) {
        self.input.mouse_move(x, y);
    }

    /// End the run at the next frame
    pub fn request_quit(&mut self) {
        self.input.request_quit();
    }

    pub fn set_key_map(&mut self, key_map: KeyMap) {
        self.key_map = key_map;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    /// What the last rendered frame drew
    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Lets the host (or a test) reflow the page
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
