use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

use super::{
    action::Direction,
    config::{ConfigError, GameConfig},
    state::{GamePhase, GameSnapshot, Position, Snake},
};

/// What a single call to [`GameEngine::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing, or paused; nothing changed
    Idle,
    /// Snake moved one cell without eating
    Moved,
    /// Snake ate the food and grew
    Ate {
        /// Score after this tick
        score: u32,
        /// Set when this tick raised the high score, carrying the new value
        new_high_score: Option<u32>,
    },
    /// Head would have landed on the body; the game is over and the move was not committed
    Collided,
}

/// The game engine that owns one session of Snake on a wrapping grid.
///
/// Driven entirely from outside: a periodic source calls [`tick`](Self::tick),
/// an input source calls [`set_direction_intent`](Self::set_direction_intent)
/// and [`toggle_pause`](Self::toggle_pause). Commands issued in the wrong
/// phase are ignored rather than reported.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    phase: GamePhase,
    snake: Snake,
    food: Position,
    score: u32,
    high_score: u32,
    tick_interval: Duration,
    pending_direction: Option<Direction>,
    paused: bool,
}

impl GameEngine {
    /// Create an engine in the READY phase.
    ///
    /// `high_score` is the previously stored record; the engine only ever raises it.
    pub fn new(config: GameConfig, high_score: u32) -> Result<Self, ConfigError> {
        Self::with_rng(config, high_score, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new) but with reproducible food placement
    pub fn with_seed(config: GameConfig, high_score: u32, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, high_score, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, high_score: u32, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut engine = Self {
            snake: Snake::new(config.spawn_position, config.spawn_direction),
            food: config.spawn_position,
            tick_interval: config.initial_tick_interval,
            config,
            rng,
            phase: GamePhase::Ready,
            score: 0,
            high_score,
            pending_direction: None,
            paused: false,
        };
        engine.reset_board();

        Ok(engine)
    }

    /// Begin a new game from any phase
    pub fn start(&mut self) {
        self.reset_board();
        self.phase = GamePhase::Playing;
        info!(
            "Game started on {0}x{0} grid, food at ({1}, {2})",
            self.config.grid_size, self.food.x, self.food.y
        );
    }

    /// Queue a turn for the next tick.
    ///
    /// A request to reverse the direction applied on the last tick is dropped,
    /// as is anything sent outside the PLAYING phase. Later requests replace
    /// earlier ones that have not been consumed yet.
    pub fn set_direction_intent(&mut self, direction: Direction) {
        if self.phase != GamePhase::Playing {
            return;
        }

        if self.snake.direction.is_opposite(direction) {
            debug!("Ignoring reversal {:?} -> {:?}", self.snake.direction, direction);
            return;
        }

        self.pending_direction = Some(direction);
    }

    /// Pause or resume; only meaningful while PLAYING
    pub fn toggle_pause(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }

        self.paused = !self.paused;
        debug!("Paused: {}", self.paused);
    }

    /// Advance the game by one cell
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != GamePhase::Playing || self.paused {
            return TickOutcome::Idle;
        }

        let direction = self.pending_direction.take().unwrap_or(self.snake.direction);
        let new_head = self
            .snake
            .head()
            .stepped(direction, self.config.grid_size);

        // The tail still counts: it has not moved out of the way yet
        if self.snake.occupies(new_head) {
            self.phase = GamePhase::GameOver;
            info!(
                "Game over at ({}, {}) with score {}",
                new_head.x, new_head.y, self.score
            );
            return TickOutcome::Collided;
        }

        let ate_food = new_head == self.food;
        self.snake.advance(new_head, ate_food);
        self.snake.direction = direction;

        if !ate_food {
            return TickOutcome::Moved;
        }

        self.score += 1;
        let new_high_score = if self.score > self.high_score {
            self.high_score = self.score;
            info!("New high score: {}", self.high_score);
            Some(self.high_score)
        } else {
            None
        };

        self.tick_interval = self
            .tick_interval
            .saturating_sub(self.config.tick_decrement)
            .max(self.config.min_tick_interval);

        match spawn_food_avoid_snake(&mut self.rng, &self.snake, self.config.grid_size) {
            Some(food) => {
                debug!("Food placed at ({}, {})", food.x, food.y);
                self.food = food;
            }
            None => {
                self.phase = GamePhase::GameOver;
                info!("Board filled with score {}", self.score);
            }
        }

        TickOutcome::Ate {
            score: self.score,
            new_high_score,
        }
    }

    /// Copy out the observable state
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            snake: self.snake.body.clone(),
            food: self.food,
            score: self.score,
            high_score: self.high_score,
            direction: self.snake.direction,
            pending_direction: self.pending_direction,
            paused: self.paused,
            tick_interval: self.tick_interval,
            grid_size: self.config.grid_size,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Delay the scheduler should wait before the next tick
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn reset_board(&mut self) {
        self.snake = Snake::new(self.config.spawn_position, self.config.spawn_direction);
        self.pending_direction = None;
        self.score = 0;
        self.tick_interval = self.config.initial_tick_interval;
        self.paused = false;

        if let Some(food) = spawn_food_avoid_snake(&mut self.rng, &self.snake, self.config.grid_size)
        {
            self.food = food;
        }
    }
}

/// Pick a uniformly random cell the snake does not cover, or `None` when the board is full
fn spawn_food_avoid_snake(rng: &mut StdRng, snake: &Snake, grid_size: usize) -> Option<Position> {
    if snake.len() >= grid_size * grid_size {
        return None;
    }

    loop {
        let x = rng.gen_range(0..grid_size) as i32;
        let y = rng.gen_range(0..grid_size) as i32;
        let pos = Position::new(x, y);

        if !snake.occupies(pos) {
            return Some(pos);
        }
    }
}
