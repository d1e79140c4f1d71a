use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::action::Direction;
use super::state::Position;

/// Reasons a [`GameConfig`] is refused at engine construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid_size must be at least 2, got {0}")]
    GridTooSmall(usize),
    #[error("grid_size {0} is too large for i32 coordinates")]
    GridTooLarge(usize),
    #[error("initial_tick_interval must be positive")]
    ZeroTickInterval,
    #[error("min_tick_interval must be positive")]
    ZeroMinTickInterval,
    #[error("min_tick_interval ({min:?}) cannot exceed initial_tick_interval ({initial:?})")]
    FloorAboveInitial { min: Duration, initial: Duration },
    #[error("spawn position ({x}, {y}) lies outside a {grid_size}x{grid_size} grid")]
    SpawnOutOfBounds { x: i32, y: i32, grid_size: usize },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width and height of the square, wrapping grid
    pub grid_size: usize,
    /// Tick interval at the start of every game
    pub initial_tick_interval: Duration,
    /// Amount the interval shrinks each time food is eaten
    pub tick_decrement: Duration,
    /// Floor the interval never drops below
    pub min_tick_interval: Duration,
    /// Cell the single-segment snake starts on
    pub spawn_position: Position,
    /// Heading at the start of every game
    pub spawn_direction: Direction,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_tick_interval: Duration::from_millis(200),
            tick_decrement: Duration::from_millis(2),
            min_tick_interval: Duration::from_millis(50),
            spawn_position: Position::new(5, 5),
            spawn_direction: Direction::Right,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size.
    ///
    /// Boards too small for the default spawn cell start in the middle instead.
    pub fn new(grid_size: usize) -> Self {
        let defaults = Self::default();
        let spawn_position = if grid_size > defaults.spawn_position.x as usize {
            defaults.spawn_position
        } else {
            let mid = (grid_size / 2) as i32;
            Position::new(mid, mid)
        };

        Self {
            grid_size,
            spawn_position,
            ..defaults
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Set the tick timing, keeping everything else
    pub fn with_timing(mut self, initial: Duration, decrement: Duration, min: Duration) -> Self {
        self.initial_tick_interval = initial;
        self.tick_decrement = decrement;
        self.min_tick_interval = min;
        self
    }

    /// Number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Check the construction contract
    pub fn validate(&self) -> Result<(), ConfigError> {
        // A one-cell board leaves no room for food next to the snake
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }

        if i32::try_from(self.grid_size).is_err() {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }

        if self.initial_tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }

        if self.min_tick_interval.is_zero() {
            return Err(ConfigError::ZeroMinTickInterval);
        }

        if self.min_tick_interval > self.initial_tick_interval {
            return Err(ConfigError::FloorAboveInitial {
                min: self.min_tick_interval,
                initial: self.initial_tick_interval,
            });
        }

        let size = self.grid_size as i32;
        let spawn = self.spawn_position;
        if !(0..size).contains(&spawn.x) || !(0..size).contains(&spawn.y) {
            return Err(ConfigError::SpawnOutOfBounds {
                x: spawn.x,
                y: spawn.y,
                grid_size: self.grid_size,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.initial_tick_interval, Duration::from_millis(200));
        assert_eq!(config.tick_decrement, Duration::from_millis(2));
        assert_eq!(config.spawn_position, Position::new(5, 5));
        assert_eq!(config.spawn_direction, Direction::Right);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15);
        assert_eq!(config.grid_size, 15);
        assert_eq!(config.cell_count(), 225);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_small_grid_spawns_in_middle() {
        let config = GameConfig::new(4);
        assert_eq!(config.spawn_position, Position::new(2, 2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        assert_eq!(
            GameConfig::new(0).validate(),
            Err(ConfigError::GridTooSmall(0))
        );
        assert_eq!(
            GameConfig::new(1).validate(),
            Err(ConfigError::GridTooSmall(1))
        );
    }

    #[test]
    fn test_rejects_zero_intervals() {
        let config = GameConfig::default().with_timing(
            Duration::ZERO,
            Duration::from_millis(2),
            Duration::ZERO,
        );
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));

        let config = GameConfig::default().with_timing(
            Duration::from_millis(100),
            Duration::from_millis(2),
            Duration::ZERO,
        );
        assert_eq!(config.validate(), Err(ConfigError::ZeroMinTickInterval));
    }

    #[test]
    fn test_rejects_floor_above_initial() {
        let config = GameConfig::default().with_timing(
            Duration::from_millis(40),
            Duration::from_millis(2),
            Duration::from_millis(50),
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FloorAboveInitial { .. })
        ));
    }

    #[test]
    fn test_zero_decrement_is_allowed() {
        let config = GameConfig::default().with_timing(
            Duration::from_millis(100),
            Duration::ZERO,
            Duration::from_millis(100),
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_spawn_outside_grid() {
        let mut config = GameConfig::new(5);
        assert!(config.validate().is_ok());

        config.spawn_position = Position::new(5, 5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpawnOutOfBounds {
                x: 5,
                y: 5,
                grid_size: 5
            })
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = GameConfig::small();
        let json = serde_json::to_string(&config).unwrap();
        let restored: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
