//! Fixed step simulation tick
//!
//! Core game loop that advances the simulation by one display frame. There is
//! no delta time: one call is one step.

use super::collision::{
    ball_below_floor, ball_paddle_collision, ceiling_collision, side_wall_collision,
    side_wall_rest_x,
};
use super::state::{GameEvent, GamePhase, GameState, Metrics, Paddle, Wall};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left key held
    pub left: bool,
    /// Move right key held
    pub right: bool,
}

/// Advance the game state by one step
///
/// Does nothing unless the phase is `Playing`. Returns the events produced
/// during the step, in the order they happened.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_ticks += 1;

    // Paddle control
    move_paddle(&mut state.paddle, input);

    // Gravity + explicit Euler
    let ball = &mut state.ball;
    ball.vel.y += GRAVITY;
    ball.pos += ball.vel;

    // Side walls break the combo
    if let Some(wall) = side_wall_collision(ball.pos, ball.radius, GAME_WIDTH) {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = side_wall_rest_x(ball.pos, ball.radius, GAME_WIDTH);
        state.metrics.combo = 0;
        events.push(GameEvent::WallHit(wall));
        events.push(GameEvent::MetricsChanged(state.metrics));
    }

    // Ceiling only bounces
    if ceiling_collision(ball.pos, ball.radius) {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = ball.radius;
        events.push(GameEvent::WallHit(Wall::Ceiling));
    }

    if let Some(contact) = ball_paddle_collision(ball.pos, ball.radius, &state.paddle) {
        ball.pos.y = contact.rest_y;

        ball.vel.x = contact.offset * BOUNCE_HORIZONTAL_SPEED;
        ball.vel.y = -ball.vel.y.abs() * PADDLE_BOUNCE_BOOST;
        // Only the vertical component is capped
        if ball.vel.y.abs() > MAX_BALL_SPEED {
            ball.vel.y = -MAX_BALL_SPEED;
        }

        if score_paddle_hit(&mut state.metrics) {
            events.push(GameEvent::HighScore(state.metrics.high_score));
        }

        if state.metrics.score % SHRINK_EVERY_POINTS == 0 && state.paddle.shrink() {
            events.push(GameEvent::PaddleShrunk {
                width: state.paddle.width,
            });
        }

        events.push(GameEvent::PaddleHit {
            offset: contact.offset,
        });
        events.push(GameEvent::MetricsChanged(state.metrics));
    }

    if ball_below_floor(state.ball.pos, state.ball.radius, GAME_HEIGHT) {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver(state.metrics));
    }

    events
}

/// Apply held movement keys and keep the paddle on screen
///
/// Both keys may be held at once; their steps cancel out.
fn move_paddle(paddle: &mut Paddle, input: &TickInput) {
    if input.left {
        paddle.x -= PADDLE_SPEED_STEP;
    }
    if input.right {
        paddle.x += PADDLE_SPEED_STEP;
    }
    paddle.clamp_to_playfield();
}

/// Award a paddle hit: one point plus a combo bonus of `combo / 2` from the
/// second consecutive hit on. Returns true if this set a new best.
fn score_paddle_hit(metrics: &mut Metrics) -> bool {
    metrics.score += 1;
    metrics.combo += 1;
    if metrics.combo > 1 {
        metrics.score += u64::from(metrics.combo / 2);
    }
    metrics.max_combo = metrics.max_combo.max(metrics.combo);

    if metrics.score > metrics.high_score {
        metrics.high_score = metrics.score;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn playing() -> GameState {
        let mut state = GameState::new(0);
        state.reset_for_play();
        state
    }

    #[test]
    fn test_tick_ignored_outside_playing() {
        for phase in [GamePhase::Start, GamePhase::Paused, GamePhase::GameOver] {
            let mut state = playing();
            state.phase = phase;
            let before = state.clone();
            let events = tick(
                &mut state,
                &TickInput {
                    left: true,
                    right: false,
                },
            );
            assert!(events.is_empty());
            assert_eq!(state, before);
        }
    }

    #[test]
    fn test_gravity_and_integration() {
        let mut state = playing();
        state.ball.pos = Vec2::new(400.0, 520.0);
        state.ball.vel = Vec2::new(0.0, 5.0);

        let events = tick(&mut state, &TickInput::default());

        assert!((state.ball.vel.y - 5.15).abs() < 1e-4);
        assert!((state.ball.pos.y - 525.15).abs() < 1e-4);
        assert_eq!(state.ball.pos.x, 400.0);
        // Bottom edge has not reached the paddle yet
        assert!(events.is_empty());
        assert_eq!(state.metrics.score, 0);
    }

    #[test]
    fn test_paddle_keys() {
        let mut state = playing();
        let x0 = state.paddle.x;

        tick(&mut state, &TickInput { left: true, right: false });
        assert_eq!(state.paddle.x, x0 - PADDLE_SPEED_STEP);

        tick(&mut state, &TickInput { left: true, right: true });
        assert_eq!(state.paddle.x, x0 - PADDLE_SPEED_STEP);

        tick(&mut state, &TickInput { left: false, right: true });
        assert_eq!(state.paddle.x, x0);
    }

    #[test]
    fn test_paddle_clamped_at_edges() {
        let mut state = playing();
        state.paddle.x = 5.0;
        tick(&mut state, &TickInput { left: true, right: false });
        assert_eq!(state.paddle.x, 0.0);

        state.paddle.x = GAME_WIDTH - state.paddle.width - 3.0;
        tick(&mut state, &TickInput { left: false, right: true });
        assert_eq!(state.paddle.x, GAME_WIDTH - state.paddle.width);
    }

    #[test]
    fn test_pointer_overshoot_clamped_next_tick() {
        let mut state = playing();
        state.paddle.center_on(-200.0);
        assert!(state.paddle.x < 0.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.paddle.x, 0.0);
    }

    #[test]
    fn test_side_wall_resets_combo() {
        let mut state = playing();
        state.metrics.combo = 5;
        state.metrics.max_combo = 5;
        state.ball.pos = Vec2::new(790.0, 300.0);
        state.ball.vel = Vec2::new(6.0, 0.0);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.ball.vel.x, -6.0);
        assert_eq!(state.ball.pos.x, GAME_WIDTH - BALL_RADIUS);
        assert_eq!(state.metrics.combo, 0);
        assert_eq!(state.metrics.max_combo, 5);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], GameEvent::WallHit(Wall::Right));
        assert_eq!(events[1], GameEvent::MetricsChanged(state.metrics));
    }

    #[test]
    fn test_side_wall_then_paddle_same_tick() {
        let mut state = playing();
        state.paddle.x = 0.0;
        state.metrics.combo = 4;
        state.metrics.max_combo = 4;
        state.ball.pos = Vec2::new(10.0, 548.0);
        state.ball.vel = Vec2::new(-3.0, 4.85);

        let events = tick(&mut state, &TickInput::default());

        // Wall resets the combo, then the paddle starts a new one
        assert_eq!(state.metrics.combo, 1);
        assert_eq!(state.metrics.max_combo, 4);
        assert_eq!(state.metrics.score, 1);
        assert_eq!(state.ball.pos, Vec2::new(BALL_RADIUS, state.paddle.y - BALL_RADIUS));
        let expected_offset = (BALL_RADIUS - 60.0) / 60.0;
        assert!((state.ball.vel.x - expected_offset * BOUNCE_HORIZONTAL_SPEED).abs() < 1e-4);
        assert!(state.ball.vel.y < 0.0);
        assert!(matches!(events.as_slice(), [
            GameEvent::WallHit(Wall::Left),
            GameEvent::MetricsChanged(Metrics { combo: 0, .. }),
            GameEvent::HighScore(1),
            GameEvent::PaddleHit { .. },
            GameEvent::MetricsChanged(Metrics { combo: 1, .. }),
        ]));
    }

    #[test]
    fn test_left_wall() {
        let mut state = playing();
        state.ball.pos = Vec2::new(10.0, 300.0);
        state.ball.vel = Vec2::new(-4.0, 0.0);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.ball.vel.x, 4.0);
        assert_eq!(state.ball.pos.x, BALL_RADIUS);
        assert_eq!(events[0], GameEvent::WallHit(Wall::Left));
    }

    #[test]
    fn test_ceiling_keeps_combo() {
        let mut state = playing();
        state.metrics.combo = 3;
        state.ball.pos = Vec2::new(400.0, 10.0);
        state.ball.vel = Vec2::new(0.0, -6.0);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.ball.pos.y, BALL_RADIUS);
        assert!((state.ball.vel.y - 5.85).abs() < 1e-4);
        assert_eq!(state.metrics.combo, 3);
        assert_eq!(events, vec![GameEvent::WallHit(Wall::Ceiling)]);
    }

    /// Place the ball so that after one step of gravity and integration it
    /// sits at `x` with a downward speed of `vy`, overlapping the paddle band.
    fn ball_arriving_at(state: &mut GameState, x: f32, vel_x: f32, vy: f32) {
        let target_y = state.paddle.y - BALL_RADIUS + 2.0;
        state.ball.vel = Vec2::new(vel_x, vy - GRAVITY);
        state.ball.pos = Vec2::new(x - vel_x, target_y - vy);
    }

    #[test]
    fn test_paddle_center_hit() {
        let mut state = playing();
        let center = state.paddle.center_x();
        ball_arriving_at(&mut state, center, 3.0, 10.0);

        let events = tick(&mut state, &TickInput::default());

        assert!(state.ball.vel.x.abs() < 1e-4);
        assert!((state.ball.vel.y + 10.5).abs() < 1e-3);
        assert_eq!(state.ball.pos.y, state.paddle.y - BALL_RADIUS);
        assert_eq!(state.metrics.score, 1);
        assert_eq!(state.metrics.combo, 1);
        assert_eq!(state.metrics.max_combo, 1);
        assert!(matches!(events.as_slice(), [
            GameEvent::HighScore(1),
            GameEvent::PaddleHit { .. },
            GameEvent::MetricsChanged(_),
        ]));
    }

    #[test]
    fn test_paddle_edge_deflects() {
        let mut state = playing();
        let x = state.paddle.x + state.paddle.width * 0.75;
        ball_arriving_at(&mut state, x, 0.0, 6.0);

        tick(&mut state, &TickInput::default());

        assert!((state.ball.vel.x - 4.0).abs() < 1e-3);
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn test_vertical_speed_capped() {
        let mut state = playing();
        let center = state.paddle.center_x();
        ball_arriving_at(&mut state, center, 0.0, 11.9);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.ball.vel.y, -MAX_BALL_SPEED);
    }

    #[test]
    fn test_combo_bonus() {
        let mut metrics = Metrics::new(100);
        score_paddle_hit(&mut metrics);
        assert_eq!((metrics.score, metrics.combo), (1, 1));
        score_paddle_hit(&mut metrics);
        // 1 + 1 + 2/2
        assert_eq!((metrics.score, metrics.combo), (3, 2));
        score_paddle_hit(&mut metrics);
        // 3 + 1 + 3/2
        assert_eq!((metrics.score, metrics.combo), (5, 3));
        score_paddle_hit(&mut metrics);
        // 5 + 1 + 4/2
        assert_eq!((metrics.score, metrics.combo), (8, 4));
        assert_eq!(metrics.max_combo, 4);
        assert_eq!(metrics.high_score, 100);
    }

    #[test]
    fn test_high_score_tracks_score() {
        let mut metrics = Metrics::new(2);
        // 1 point does not beat the stored 2
        assert!(!score_paddle_hit(&mut metrics));
        assert_eq!(metrics.high_score, 2);
        // 1 + 1 + 2/2 = 3 does
        assert!(score_paddle_hit(&mut metrics));
        assert_eq!(metrics.score, 3);
        assert_eq!(metrics.high_score, 3);
    }

    #[test]
    fn test_difficulty_shrinks_paddle() {
        let mut state = playing();
        state.metrics.score = 9;
        let center = state.paddle.center_x();
        ball_arriving_at(&mut state, center, 0.0, 5.0);

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.metrics.score, 10);
        assert_eq!(state.paddle.width, INITIAL_PADDLE_WIDTH - PADDLE_SHRINK_STEP);
        assert!(events.contains(&GameEvent::PaddleShrunk {
            width: INITIAL_PADDLE_WIDTH - PADDLE_SHRINK_STEP
        }));
    }

    #[test]
    fn test_difficulty_skipped_when_bonus_jumps_multiple() {
        let mut state = playing();
        state.metrics.score = 8;
        state.metrics.combo = 3;
        let center = state.paddle.center_x();
        ball_arriving_at(&mut state, center, 0.0, 5.0);

        tick(&mut state, &TickInput::default());

        // 8 + 1 + 4/2 = 11 jumps past 10
        assert_eq!(state.metrics.score, 11);
        assert_eq!(state.paddle.width, INITIAL_PADDLE_WIDTH);
    }

    #[test]
    fn test_game_over_snapshot() {
        let mut state = playing();
        state.metrics.score = 12;
        state.metrics.combo = 2;
        state.metrics.max_combo = 6;
        state.ball.pos = Vec2::new(400.0, GAME_HEIGHT + BALL_RADIUS + 1.0);
        state.ball.vel = Vec2::ZERO;
        let before = state.metrics;

        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(events, vec![GameEvent::GameOver(before)]);

        // Further ticks do nothing
        let frozen = state.clone();
        assert!(tick(&mut state, &TickInput::default()).is_empty());
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = playing();
        let mut state2 = playing();

        let inputs = [
            TickInput { left: true, right: false },
            TickInput::default(),
            TickInput { left: false, right: true },
            TickInput { left: true, right: true },
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            let e1 = tick(&mut state1, input);
            let e2 = tick(&mut state2, input);
            assert_eq!(e1, e2);
        }

        assert_eq!(state1, state2);
    }
}
