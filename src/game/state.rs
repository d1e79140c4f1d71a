use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta, wrapping around a square grid of `grid_size` cells per side
    pub fn wrapped_by(&self, dx: i32, dy: i32, grid_size: usize) -> Self {
        let size = grid_size as i32;
        Self {
            x: (self.x + dx).rem_euclid(size),
            y: (self.y + dy).rem_euclid(size),
        }
    }

    /// Move one cell in a direction on a toroidal grid
    pub fn stepped(&self, direction: Direction, grid_size: usize) -> Self {
        let (dx, dy) = direction.delta();
        self.wrapped_by(dx, dy, grid_size)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction applied on the most recent tick
    pub direction: Direction,
}

impl Snake {
    /// Create a single-segment snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Check if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Put a new head in front; drop the tail unless growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Which commands the engine accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    Ready,
    Playing,
    /// Snake ran into itself; only a fresh start leaves this phase
    GameOver,
}

/// Read-only view of everything a renderer or input source needs
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    /// Segments, head first
    pub snake: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub high_score: u32,
    /// Direction applied on the most recent tick
    pub direction: Direction,
    /// Turn queued for the next tick, if any
    pub pending_direction: Option<Direction>,
    pub paused: bool,
    pub tick_interval: Duration,
    pub grid_size: usize,
}

impl GameSnapshot {
    pub fn head(&self) -> Position {
        self.snake[0]
    }

    /// Whether a tick source should currently be firing
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing && !self.paused
    }

    /// The finished game set the record (the score equals a non-zero high score)
    pub fn is_new_high_score(&self) -> bool {
        self.phase == GamePhase::GameOver && self.score > 0 && self.score == self.high_score
    }
}
