//! Input sampling
//!
//! Keyboard state is held here between events and turned into a [`TickInput`]
//! once per tick. Pointer movement does not go through the tick: it moves the
//! paddle as soon as the event arrives and is only clamped by the next tick.

use crate::consts::GAME_WIDTH;
use crate::sim::{Paddle, TickInput};

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    TogglePause,
    ToggleMute,
    /// Start from the title screen or retry after game over
    Start,
}

/// Map a DOM `KeyboardEvent.key` value to a command
pub fn key_command(key: &str) -> Option<Command> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Command::MoveLeft),
        "ArrowRight" | "d" | "D" => Some(Command::MoveRight),
        " " | "Spacebar" => Some(Command::TogglePause),
        "m" | "M" => Some(Command::ToggleMute),
        "Enter" => Some(Command::Start),
        _ => None,
    }
}

/// Convert a pointer's client x coordinate into logical playfield space
///
/// `rect_left` and `rect_width` describe the canvas as laid out on the page.
/// The result is not clamped.
pub fn pointer_to_logical(client_x: f32, rect_left: f32, rect_width: f32) -> f32 {
    if rect_width <= 0.0 {
        return client_x - rect_left;
    }
    (client_x - rect_left) * (GAME_WIDTH / rect_width)
}

/// Held movement keys
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    left: bool,
    right: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true if the key was a movement key.
    pub fn key_down(&mut self, command: Command) -> bool {
        self.set_held(command, true)
    }

    /// Record a key release. Returns true if the key was a movement key.
    pub fn key_up(&mut self, command: Command) -> bool {
        self.set_held(command, false)
    }

    fn set_held(&mut self, command: Command, held: bool) -> bool {
        match command {
            Command::MoveLeft => self.left = held,
            Command::MoveRight => self.right = held,
            _ => return false,
        }
        true
    }

    /// Snapshot for the next tick
    pub fn sample(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
        }
    }

    /// Drop all held keys (session restart, focus loss)
    pub fn clear(&mut self) {
        self.left = false;
        self.right = false;
    }

    /// Center the paddle under the pointer right away
    pub fn pointer_moved(paddle: &mut Paddle, logical_x: f32) {
        paddle.center_on(logical_x);
    }
}
