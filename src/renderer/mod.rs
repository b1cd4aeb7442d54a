//! Render snapshots
//!
//! The simulation never draws directly. Each frame is flattened into a
//! [`RenderSnapshot`] (plain rectangles, colors and trail dots) and replayed
//! onto whatever [`Renderer`] the host provides.

pub mod trail;

pub use trail::{TrailDot, ball_trail};

use crate::Color;
use crate::platform::Renderer;
use crate::sim::{GameMode, GameState, Rect};

/// Fixed draw colors
pub mod colors {
    use crate::Color;

    /// The canvas sits over the page, so the background stays transparent
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const PADDLE: Color = Color::rgb(0.92, 0.92, 0.96);
    pub const PADDLE_CHEAT: Color = Color::rgb(1.0, 0.84, 0.2);
    pub const BLOCK_OUTLINE: Color = Color::rgba(0.2, 1.0, 0.4, 0.6);
    pub const BLOCK_OUTLINE_DESTROYED: Color = Color::rgba(1.0, 0.3, 0.3, 0.3);
}

/// Everything one frame draws, in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub clear: Color,
    pub rects: Vec<(Rect, Color)>,
    pub trails: Vec<TrailDot>,
}

impl Default for RenderSnapshot {
    fn default() -> Self {
        Self {
            clear: colors::CLEAR,
            rects: Vec::new(),
            trails: Vec::new(),
        }
    }
}

/// Flatten the state into draw calls.
///
/// Order: debug block outlines, particles, trails, balls, paddle. INIT is a
/// transient mode and produces an empty snapshot.
pub fn build_snapshot(state: &GameState) -> RenderSnapshot {
    let mut snapshot = RenderSnapshot::default();
    if state.mode == GameMode::Init {
        return snapshot;
    }

    if state.debug_draw {
        for block in &state.blocks {
            let color = if block.destroyed {
                colors::BLOCK_OUTLINE_DESTROYED
            } else {
                colors::BLOCK_OUTLINE
            };
            snapshot.rects.push((block.rect, color));
        }
    }

    for particle in &state.particles {
        let half = particle.size / 2.0;
        snapshot.rects.push((
            Rect::new(
                particle.position.x - half,
                particle.position.y - half,
                particle.size,
                particle.size,
            ),
            particle.color,
        ));
    }

    for ball in &state.balls {
        snapshot
            .trails
            .extend(ball_trail(&ball.trail, ball.size, ball.color));
        snapshot.rects.push((ball.rect(), ball.color));
    }

    let paddle_color = if state.cheats {
        colors::PADDLE_CHEAT
    } else {
        colors::PADDLE
    };
    snapshot.rects.push((state.paddle.rect(), paddle_color));

    snapshot
}

/// Replay a snapshot onto a renderer
pub fn draw(snapshot: &RenderSnapshot, renderer: &mut impl Renderer) {
    renderer.clear(snapshot.clear);
    for dot in &snapshot.trails {
        renderer.draw_trail(dot.center, dot.size, dot.color);
    }
    for &(rect, color) in &snapshot.rects {
        renderer.draw_rect(rect, color);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::platform::RecordingRenderer;
    use crate::settings::Settings;
    use crate::sim::Block;

    fn playing_state() -> GameState {
        let settings = Settings::default();
        let mut state = GameState::new(3, &settings, Vec2::new(800.0, 600.0));
        state.mode = GameMode::Play;
        state.blocks = vec![Block {
            id: 0,
            rect: Rect::new(10.0, 10.0, 50.0, 20.0),
            destroyed: false,
        }];
        state.spawn_ball_attached(&settings).unwrap();
        state
    }

    #[test]
    fn test_init_snapshot_is_empty() {
        let settings = Settings::default();
        let state = GameState::new(3, &settings, Vec2::new(800.0, 600.0));
        let snapshot = build_snapshot(&state);
        assert!(snapshot.rects.is_empty());
        assert!(snapshot.trails.is_empty());
    }

    #[test]
    fn test_paddle_drawn_last() {
        let state = playing_state();
        let snapshot = build_snapshot(&state);
        // Ball then paddle; blocks are page elements and stay undrawn
        assert_eq!(snapshot.rects.len(), 2);
        assert_eq!(snapshot.rects[1], (state.paddle.rect(), colors::PADDLE));
        assert_eq!(snapshot.rects[0].0, state.balls[0].rect());
    }

    #[test]
    fn test_debug_draw_outlines_blocks() {
        let mut state = playing_state();
        state.debug_draw = true;
        let snapshot = build_snapshot(&state);
        assert_eq!(snapshot.rects[0], (state.blocks[0].rect, colors::BLOCK_OUTLINE));
    }

    #[test]
    fn test_draw_replays_snapshot() {
        let mut state = playing_state();
        state.balls[0].trail.extend([Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)]);
        let snapshot = build_snapshot(&state);

        let mut renderer = RecordingRenderer::default();
        draw(&snapshot, &mut renderer);
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.clear_color, Some(colors::CLEAR));
        assert_eq!(renderer.rects, snapshot.rects);
        assert_eq!(renderer.trails.len(), 2);
    }
}
