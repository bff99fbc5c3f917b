use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::state::{Direction, Position, SavedGame};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save is missing `{0}`")]
    MissingField(&'static str),
    #[error("save has an invalid direction {0:?}")]
    BadDirection([i32; 2]),
}

/// Durable storage for the high score and the resumable game.
///
/// Implementations never fail outward: problems are logged and the game keeps going.
pub trait Storage {
    fn load_high_score(&self) -> u32;
    fn save_high_score(&mut self, value: u32);
    fn save_game(&mut self, game: &SavedGame);
    fn load_game(&self) -> Option<SavedGame>;
}

/// On-disk layout of the save file. Every field is optional so that a
/// missing key can be reported instead of failing the whole parse.
#[derive(Serialize, Deserialize)]
struct SaveRecord {
    snake: Option<Vec<Position>>,
    direction: Option<[i32; 2]>,
    food: Option<Position>,
    score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Local>>,
}

pub struct FileStore {
    high_score_path: PathBuf,
    save_path: PathBuf,
    block: i32,
    default_speed: u32,
}

impl FileStore {
    pub fn new(config: &Config) -> Self {
        FileStore {
            high_score_path: config.high_score_path.clone(),
            save_path: config.save_path.clone(),
            block: config.block,
            default_speed: config.base_speed,
        }
    }

    fn read_high_score(&self) -> Result<u32, StoreError> {
        let contents = read(&self.high_score_path)?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse()
            .map_err(|e| io_error(&self.high_score_path, io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn write_save(&self, game: &SavedGame) -> Result<(), StoreError> {
        let (dx, dy) = game.direction.delta(self.block);
        let record = SaveRecord {
            snake: Some(game.snake.clone()),
            direction: Some([dx, dy]),
            food: Some(game.food),
            score: Some(game.score),
            speed: Some(game.speed),
            saved_at: Some(game.saved_at.unwrap_or_else(Local::now)),
        };
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&self.save_path, json).map_err(|e| io_error(&self.save_path, e))
    }

    fn read_save(&self) -> Result<Option<SavedGame>, StoreError> {
        let contents = match fs::read_to_string(&self.save_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&self.save_path, e)),
        };
        let record: SaveRecord = serde_json::from_str(&contents)?;
        self.decode(record).map(Some)
    }

    fn decode(&self, record: SaveRecord) -> Result<SavedGame, StoreError> {
        let snake = record.snake.ok_or(StoreError::MissingField("snake"))?;
        let delta = record.direction.ok_or(StoreError::MissingField("direction"))?;
        let food = record.food.ok_or(StoreError::MissingField("food"))?;
        let score = record.score.ok_or(StoreError::MissingField("score"))?;
        let direction = Direction::from_delta((delta[0], delta[1]), self.block)
            .ok_or(StoreError::BadDirection(delta))?;

        Ok(SavedGame {
            snake,
            direction,
            food,
            score,
            speed: record.speed.unwrap_or(self.default_speed),
            saved_at: record.saved_at,
        })
    }
}

impl Storage for FileStore {
    fn load_high_score(&self) -> u32 {
        match self.read_high_score() {
            Ok(score) => score,
            Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("Ignoring high score file: {}", e);
                0
            }
        }
    }

    fn save_high_score(&mut self, value: u32) {
        if let Err(e) = fs::write(&self.high_score_path, value.to_string()) {
            log::error!("Failed to save high score: {}", io_error(&self.high_score_path, e));
        }
    }

    fn save_game(&mut self, game: &SavedGame) {
        match self.write_save(game) {
            Ok(()) => log::info!("Game saved to {}", self.save_path.display()),
            Err(e) => log::error!("Failed to save game: {}", e),
        }
    }

    fn load_game(&self) -> Option<SavedGame> {
        match self.read_save() {
            Ok(Some(game)) => {
                log::info!("Game loaded from {}", self.save_path.display());
                Some(game)
            }
            Ok(None) => {
                log::info!("No saved game at {}", self.save_path.display());
                None
            }
            Err(e) => {
                log::error!("Failed to load game: {}", e);
                None
            }
        }
    }
}

fn read(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: io::Error) -> StoreError {
    StoreError::Io { path: path.to_path_buf(), source }
}
