//! Ball trail dots

use std::collections::VecDeque;

use glam::Vec2;

use crate::Color;

/// Alpha of the newest trail dot
const TRAIL_HEAD_ALPHA: f32 = 0.8;
/// Share of the ball size the oldest dot loses
const TRAIL_SHRINK: f32 = 0.7;

/// One dot of a fading trail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailDot {
    pub center: Vec2,
    pub size: f32,
    pub color: Color,
}

/// Fade alpha and size along a trail stored oldest first.
///
/// The newest point gets `TRAIL_HEAD_ALPHA` and the full ball size; older
/// points shrink and fade toward the tail.
pub fn ball_trail(trail: &VecDeque<Vec2>, ball_size: f32, color: Color) -> Vec<TrailDot> {
    if trail.len() < 2 {
        return Vec::new();
    }

    let trail_len = trail.len() as f32;
    trail
        .iter()
        .enumerate()
        .map(|(i, &center)| {
            // 0 at the head, approaching 1 at the tail
            let age = (trail.len() - 1 - i) as f32 / trail_len;
            TrailDot {
                center,
                size: ball_size * (1.0 - age * TRAIL_SHRINK),
                color: color.with_alpha((1.0 - age) * TRAIL_HEAD_ALPHA),
            }
        })
        .collect()
}
