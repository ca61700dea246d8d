//! Collision detection for the ball against the playfield and paddle
//!
//! All tests are axis-aligned: the playfield is a box open at the bottom and
//! the paddle is a rectangle. Detection is kept separate from response so each
//! check can be tested on its own.

use glam::Vec2;

use super::state::{Paddle, Wall};

/// Result of a ball/paddle overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleContact {
    /// Hit position relative to the paddle center, scaled so the paddle edges
    /// are at -1 and 1
    pub offset: f32,
    /// Ball center `y` that puts the ball flush on top of the paddle
    pub rest_y: f32,
}

/// Check whether the ball pokes past a side wall
///
/// Returns the wall that was crossed. The left wall wins when the ball is
/// somehow past both.
pub fn side_wall_collision(ball_pos: Vec2, ball_radius: f32, width: f32) -> Option<Wall> {
    if ball_pos.x - ball_radius < 0.0 {
        Some(Wall::Left)
    } else if ball_pos.x + ball_radius > width {
        Some(Wall::Right)
    } else {
        None
    }
}

/// Ball center `x` that puts the ball flush against the given side wall
pub fn side_wall_rest_x(ball_pos: Vec2, ball_radius: f32, width: f32) -> f32 {
    if ball_pos.x < ball_radius {
        ball_radius
    } else {
        width - ball_radius
    }
}

/// Check whether the ball pokes past the ceiling
#[inline]
pub fn ceiling_collision(ball_pos: Vec2, ball_radius: f32) -> bool {
    ball_pos.y - ball_radius < 0.0
}

/// Check the ball against the paddle rectangle
///
/// The ball's vertical span must overlap the paddle band and its center must
/// be strictly inside the paddle's horizontal span. Corners are not rounded:
/// a ball whose center is past the paddle edge misses even if its rim
/// overlaps.
pub fn ball_paddle_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    paddle: &Paddle,
) -> Option<PaddleContact> {
    let overlaps_band =
        ball_pos.y + ball_radius > paddle.y && ball_pos.y - ball_radius < paddle.y + paddle.height;
    let within_span = ball_pos.x > paddle.x && ball_pos.x < paddle.x + paddle.width;

    if !(overlaps_band && within_span) {
        return None;
    }

    let half_width = paddle.width / 2.0;
    Some(PaddleContact {
        offset: (ball_pos.x - paddle.center_x()) / half_width,
        rest_y: paddle.y - ball_radius,
    })
}

/// Check whether the ball has fully left through the floor
#[inline]
pub fn ball_below_floor(ball_pos: Vec2, ball_radius: f32, height: f32) -> bool {
    ball_pos.y - ball_radius > height
}
