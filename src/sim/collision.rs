//! Collision detection and response for axis-aligned boxes
//!
//! This is a heuristic model, not a contact solver: the ball is a box, a
//! block hit reflects one axis chosen from nearest-edge distances, and the
//! paddle always sends the ball back up.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Ball, Paddle};
use crate::normalize;

/// Which velocity component a block hit reflects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Result of resolving a ball against the window edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// Bounced off top, left or right
    pub bounced: bool,
    /// Touched the bottom edge
    pub fell: bool,
}

/// Reflect off the top/left/right window edges and detect the bottom edge.
///
/// Positions are clamped back inside the window; the bottom edge only
/// reports, the caller destroys the ball.
pub fn resolve_walls(ball: &mut Ball, window: Vec2) -> WallContact {
    let mut contact = WallContact::default();

    if ball.position.y < 0.0 {
        ball.position.y = 0.0;
        ball.velocity.y = ball.velocity.y.abs();
        contact.bounced = true;
    }

    if ball.position.x < 0.0 {
        ball.position.x = 0.0;
        ball.velocity.x = ball.velocity.x.abs();
        contact.bounced = true;
    } else if ball.position.x + ball.size > window.x {
        ball.position.x = window.x - ball.size;
        ball.velocity.x = -ball.velocity.x.abs();
        contact.bounced = true;
    }

    if ball.position.y + ball.size > window.y {
        contact.fell = true;
    }

    contact
}

/// Bounce a ball off the paddle if they overlap.
///
/// A moving paddle overrides the ball's x velocity with
/// `paddle.velocity.x * english`; the ball is snapped to rest on the paddle
/// top. Returns whether a bounce happened.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, english: f32) -> bool {
    if !ball.rect().overlaps(&paddle.rect()) {
        return false;
    }
    ball.velocity.y = -ball.velocity.y;
    if paddle.velocity.x != 0.0 {
        ball.velocity.x = paddle.velocity.x * english;
    }
    ball.position.y = paddle.position.y - ball.size;
    true
}

/// Pick the axis to reflect for a ball whose center is at `center` hitting `block`.
///
/// Compares the nearer of the two vertical edges against the nearer of the two
/// horizontal edges. Corner hits can land on the wrong face; that is accepted.
pub fn reflection_axis(center: Vec2, block: &Rect) -> Axis {
    let horizontal = (center.x - block.left())
        .abs()
        .min((center.x - block.right()).abs());
    let vertical = (center.y - block.top())
        .abs()
        .min((center.y - block.bottom()).abs());

    if horizontal < vertical {
        Axis::X
    } else {
        Axis::Y
    }
}

/// Flip one component of `velocity`
pub fn reflect(velocity: Vec2, axis: Axis) -> Vec2 {
    match axis {
        Axis::X => Vec2::new(-velocity.x, velocity.y),
        Axis::Y => Vec2::new(velocity.x, -velocity.y),
    }
}

/// Back to unit length, direction kept. Speed lives in `Ball::speed`.
#[inline]
pub fn renormalize(velocity: Vec2) -> Vec2 {
    normalize(velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::PALETTE;
    use proptest::prelude::*;

    fn free_ball(pos: Vec2, vel: Vec2) -> Ball {
        let s = Settings::default();
        let mut ball = Ball::new_attached(&Paddle::new(&s), &s, PALETTE[0]);
        ball.attached = false;
        ball.position = pos;
        ball.velocity = vel;
        ball
    }

    #[test]
    fn test_top_wall_reflects_down() {
        let mut ball = free_ball(Vec2::new(100.0, -3.0), Vec2::new(0.6, -0.8));
        let contact = resolve_walls(&mut ball, Vec2::new(800.0, 600.0));
        assert!(contact.bounced);
        assert!(!contact.fell);
        assert_eq!(ball.position.y, 0.0);
        assert_eq!(ball.velocity, Vec2::new(0.6, 0.8));
    }

    #[test]
    fn test_side_walls_clamp_inside() {
        let window = Vec2::new(800.0, 600.0);
        let mut ball = free_ball(Vec2::new(795.0, 300.0), Vec2::new(0.6, 0.8));
        assert!(resolve_walls(&mut ball, window).bounced);
        assert_eq!(ball.position.x, 800.0 - ball.size);
        assert!(ball.velocity.x < 0.0);

        let mut ball = free_ball(Vec2::new(-2.0, 300.0), Vec2::new(-0.6, 0.8));
        assert!(resolve_walls(&mut ball, window).bounced);
        assert_eq!(ball.position.x, 0.0);
        assert!(ball.velocity.x > 0.0);
    }

    #[test]
    fn test_bottom_wall_reports_fall() {
        let mut ball = free_ball(Vec2::new(100.0, 595.0), Vec2::new(0.0, 1.0));
        let contact = resolve_walls(&mut ball, Vec2::new(800.0, 600.0));
        assert!(contact.fell);
        assert!(!contact.bounced);
    }

    #[test]
    fn test_stationary_paddle_keeps_x() {
        let s = Settings::default();
        let mut paddle = Paddle::new(&s);
        paddle.position = Vec2::new(100.0, 500.0);
        let vel = normalize(Vec2::new(0.3, 1.0));
        let mut ball = free_ball(Vec2::new(150.0, 495.0), vel);

        assert!(bounce_off_paddle(&mut ball, &paddle, s.paddle_english));
        assert_eq!(ball.velocity.x, vel.x);
        assert_eq!(ball.velocity.y, -vel.y);
        assert_eq!(ball.position.y + ball.size, paddle.position.y);
    }

    #[test]
    fn test_moving_paddle_imparts_english() {
        let s = Settings::default();
        let mut paddle = Paddle::new(&s);
        paddle.position = Vec2::new(100.0, 500.0);
        paddle.velocity.x = -1.0;
        let mut ball = free_ball(Vec2::new(150.0, 495.0), Vec2::new(0.0, 1.0));

        assert!(bounce_off_paddle(&mut ball, &paddle, 1.5));
        assert_eq!(ball.velocity, Vec2::new(-1.5, -1.0));
    }

    #[test]
    fn test_paddle_miss() {
        let s = Settings::default();
        let mut paddle = Paddle::new(&s);
        paddle.position = Vec2::new(100.0, 500.0);
        let mut ball = free_ball(Vec2::new(400.0, 495.0), Vec2::new(0.0, 1.0));
        assert!(!bounce_off_paddle(&mut ball, &paddle, 1.5));
        assert_eq!(ball.velocity, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_axis_bottom_face() {
        let block = Rect::new(100.0, 100.0, 80.0, 30.0);
        // Centered under the block, just inside its bottom edge
        assert_eq!(reflection_axis(Vec2::new(140.0, 128.0), &block), Axis::Y);
    }

    #[test]
    fn test_axis_side_face() {
        let block = Rect::new(100.0, 100.0, 80.0, 30.0);
        assert_eq!(reflection_axis(Vec2::new(102.0, 115.0), &block), Axis::X);
        assert_eq!(reflection_axis(Vec2::new(179.0, 115.0), &block), Axis::X);
    }

    #[test]
    fn test_axis_tie_prefers_y() {
        let block = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(reflection_axis(Vec2::new(2.0, 2.0), &block), Axis::Y);
    }

    #[test]
    fn test_reflect() {
        let v = Vec2::new(0.6, -0.8);
        assert_eq!(reflect(v, Axis::X), Vec2::new(-0.6, -0.8));
        assert_eq!(reflect(v, Axis::Y), Vec2::new(0.6, 0.8));
    }

    proptest! {
        #[test]
        fn prop_renormalized_bounce_is_unit(
            vx in -5.0f32..5.0,
            vy in 0.1f32..5.0,
            paddle_dir in prop::sample::select(vec![-1.0f32, 0.0, 1.0]),
        ) {
            let s = Settings::default();
            let mut paddle = Paddle::new(&s);
            paddle.position = Vec2::new(100.0, 500.0);
            paddle.velocity.x = paddle_dir;
            let mut ball = free_ball(Vec2::new(150.0, 495.0), normalize(Vec2::new(vx, vy)));

            prop_assert!(bounce_off_paddle(&mut ball, &paddle, s.paddle_english));
            ball.velocity = renormalize(ball.velocity);
            prop_assert!((ball.velocity.length() - 1.0).abs() < 1e-4);
            prop_assert!(ball.velocity.y < 0.0);
        }

        #[test]
        fn prop_block_reflection_keeps_unit_length(
            angle in 0.0f32..std::f32::consts::TAU,
            cx in 90.0f32..190.0,
            cy in 90.0f32..140.0,
        ) {
            let block = Rect::new(100.0, 100.0, 80.0, 30.0);
            let v = Vec2::new(angle.cos(), angle.sin());
            let axis = reflection_axis(Vec2::new(cx, cy), &block);
            let r = renormalize(reflect(v, axis));
            prop_assert!((r.length() - 1.0).abs() < 1e-4);
            match axis {
                Axis::X => prop_assert_eq!(r.x.signum(), -v.x.signum()),
                Axis::Y => prop_assert_eq!(r.y.signum(), -v.y.signum()),
            }
        }
    }
}
