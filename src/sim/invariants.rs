//! Property tests over arbitrary input sequences

use glam::Vec2;
use proptest::prelude::*;

use super::state::{GameEvent, GamePhase, GameState, Wall};
use super::tick::{TickInput, tick};
use crate::consts::*;

fn arb_input() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>()).prop_map(|(left, right)| TickInput { left, right })
}

/// Input plus an optional pointer write before the tick
fn arb_frame() -> impl Strategy<Value = (TickInput, Option<f32>)> {
    (arb_input(), prop::option::weighted(0.2, -400.0f32..1200.0))
}

fn arb_start() -> impl Strategy<Value = GameState> {
    (
        20.0f32..780.0,
        20.0f32..400.0,
        -8.0f32..8.0,
        -8.0f32..8.0,
        0.0f32..680.0,
    )
        .prop_map(|(x, y, vx, vy, paddle_x)| {
            let mut state = GameState::new(0);
            state.reset_for_play();
            state.ball.pos = Vec2::new(x, y);
            state.ball.vel = Vec2::new(vx, vy);
            state.paddle.x = paddle_x;
            state
        })
}

proptest! {
    #[test]
    fn prop_deterministic(
        start in arb_start(),
        frames in prop::collection::vec(arb_frame(), 1..300),
    ) {
        let mut a = start.clone();
        let mut b = start;
        for (input, pointer) in &frames {
            if let Some(x) = pointer {
                a.paddle.center_on(*x);
                b.paddle.center_on(*x);
            }
            prop_assert_eq!(tick(&mut a, input), tick(&mut b, input));
        }
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_tick_invariants(
        start in arb_start(),
        frames in prop::collection::vec(arb_frame(), 1..400),
    ) {
        let mut state = start;
        let mut max_score_seen = state.metrics.score;
        let mut last_max_combo = state.metrics.max_combo;

        for (input, pointer) in &frames {
            if state.phase != GamePhase::Playing {
                break;
            }
            if let Some(x) = pointer {
                state.paddle.center_on(*x);
            }
            let score_before = state.metrics.score;
            let events = tick(&mut state, input);

            // Combo high-water mark
            prop_assert!(state.metrics.max_combo >= last_max_combo);
            prop_assert!(state.metrics.max_combo >= state.metrics.combo);
            last_max_combo = state.metrics.max_combo;

            // Side-wall ticks end with no combo, unless the same tick then
            // lands on the paddle and starts a fresh one
            let side_wall = events.iter().any(|e| {
                matches!(e, GameEvent::WallHit(Wall::Left) | GameEvent::WallHit(Wall::Right))
            });
            let paddle_hit = events.iter().any(|e| matches!(e, GameEvent::PaddleHit { .. }));
            if side_wall {
                let expected = if paddle_hit { 1 } else { 0 };
                prop_assert_eq!(state.metrics.combo, expected);
            }

            // Score and best
            prop_assert!(state.metrics.score >= score_before);
            max_score_seen = max_score_seen.max(state.metrics.score);
            prop_assert_eq!(state.metrics.high_score, max_score_seen);
            // Every gain beats the best because the run started at zero
            let raised = state.metrics.score > score_before;
            let reported = events.iter().any(|e| matches!(e, GameEvent::HighScore(_)));
            prop_assert_eq!(raised, reported);

            // Paddle bounds
            prop_assert!(state.paddle.x >= 0.0);
            prop_assert!(state.paddle.x <= GAME_WIDTH - state.paddle.width);
            prop_assert!(state.paddle.width >= MIN_PADDLE_WIDTH);
            prop_assert!(state.paddle.width <= INITIAL_PADDLE_WIDTH);

            // Vertical speed after a paddle bounce
            if paddle_hit {
                prop_assert!(state.ball.vel.y.abs() <= MAX_BALL_SPEED);
                prop_assert!(state.ball.vel.y <= 0.0);
            }
        }
    }

    #[test]
    fn prop_paused_is_frozen(
        start in arb_start(),
        frames in prop::collection::vec(arb_input(), 1..100),
    ) {
        let mut state = start;
        state.phase = GamePhase::Paused;
        let frozen = state.clone();
        for input in &frames {
            prop_assert!(tick(&mut state, input).is_empty());
        }
        prop_assert_eq!(state, frozen);
    }
}
