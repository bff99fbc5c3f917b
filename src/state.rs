use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Top-left corner of a grid cell, in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn random<R: Rng>(config: &Config, rng: &mut R) -> Self {
        Position {
            x: rng.gen_range(0..config.columns()) * config.block,
            y: rng.gen_range(0..config.rows()) * config.block,
        }
    }

    /// Moves one step, reappearing on the opposite edge when leaving the grid.
    pub fn step(self, direction: Direction, config: &Config) -> Self {
        let (dx, dy) = direction.delta(config.block);
        Position {
            x: (self.x + dx).rem_euclid(config.width),
            y: (self.y + dy).rem_euclid(config.height),
        }
    }

    pub fn is_on_grid(&self, config: &Config) -> bool {
        (0..config.width).contains(&self.x)
            && (0..config.height).contains(&self.y)
            && self.x % config.block == 0
            && self.y % config.block == 0
    }
}

impl From<[i32; 2]> for Position {
    fn from([x, y]: [i32; 2]) -> Self {
        Position { x, y }
    }
}

impl From<Position> for [i32; 2] {
    fn from(pos: Position) -> Self {
        [pos.x, pos.y]
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self, block: i32) -> (i32, i32) {
        match self {
            Direction::Up => (0, -block),
            Direction::Down => (0, block),
            Direction::Left => (-block, 0),
            Direction::Right => (block, 0),
        }
    }

    pub fn from_delta(delta: (i32, i32), block: i32) -> Option<Self> {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .find(|d| d.delta(block) == delta)
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }
}

/// The persisted subset of a game.
#[derive(Clone, PartialEq, Debug)]
pub struct SavedGame {
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub food: Position,
    pub score: u32,
    pub speed: u32,
    pub saved_at: Option<DateTime<Local>>,
}

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("saved snake has no segments")]
    EmptySnake,
    #[error("cell {0:?} is outside the grid")]
    OffGrid(Position),
    #[error("food at {0:?} overlaps the snake")]
    FoodOnSnake(Position),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub food: Position,
    pub score: u32,
    pub speed: u32,
    pub paused: bool,
    pub game_over: bool,
    pub last_direction_key: Option<Direction>,
}

impl GameState {
    pub fn new<R: Rng>(config: &Config, rng: &mut R) -> Self {
        let start = Position::new(config.width / 2, config.height / 2);
        let mut state = GameState {
            snake: vec![start],
            direction: Direction::Right,
            food: start,
            score: 0,
            speed: config.base_speed,
            paused: false,
            game_over: false,
            last_direction_key: None,
        };
        state.spawn_food(config, rng);
        state
    }

    pub fn reset<R: Rng>(&mut self, config: &Config, rng: &mut R) {
        *self = GameState::new(config, rng);
    }

    pub fn head(&self) -> Position {
        self.snake[0]
    }

    /// Places food on a random free cell. Returns false when the snake fills the grid.
    pub fn spawn_food<R: Rng>(&mut self, config: &Config, rng: &mut R) -> bool {
        if self.snake.len() >= config.cell_count() {
            return false;
        }
        loop {
            let pos = Position::random(config, rng);
            if !self.snake.contains(&pos) {
                self.food = pos;
                return true;
            }
        }
    }

    /// Applies a directional key. A repeat of the previous accepted key boosts speed.
    pub fn turn(&mut self, direction: Direction, config: &Config) -> bool {
        if direction.axis() == self.direction.axis() {
            return false;
        }
        self.direction = direction;
        if self.last_direction_key == Some(direction) {
            self.speed = (self.speed + config.speed_increment).min(config.speed_max);
        }
        self.last_direction_key = Some(direction);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    pub fn snapshot(&self) -> SavedGame {
        SavedGame {
            snake: self.snake.clone(),
            direction: self.direction,
            food: self.food,
            score: self.score,
            speed: self.speed,
            saved_at: None,
        }
    }

    /// Replaces the live game with `saved`, or leaves it untouched if the snapshot
    /// does not fit the grid.
    pub fn restore(&mut self, saved: SavedGame, config: &Config) -> Result<(), SnapshotError> {
        if saved.snake.is_empty() {
            return Err(SnapshotError::EmptySnake);
        }
        if let Some(pos) = saved
            .snake
            .iter()
            .chain(std::iter::once(&saved.food))
            .find(|pos| !pos.is_on_grid(config))
        {
            return Err(SnapshotError::OffGrid(*pos));
        }
        if saved.snake.contains(&saved.food) {
            return Err(SnapshotError::FoodOnSnake(saved.food));
        }

        self.snake = saved.snake;
        self.direction = saved.direction;
        self.food = saved.food;
        self.score = saved.score;
        self.speed = config.clamp_speed(saved.speed);
        self.paused = false;
        self.game_over = false;
        Ok(())
    }
}
