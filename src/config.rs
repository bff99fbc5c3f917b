use std::path::PathBuf;
use std::time::Duration;

pub const SCREEN_WIDTH: i32 = 640;
pub const SCREEN_HEIGHT: i32 = 480;
pub const BLOCK: i32 = 20;
pub const BASE_SPEED: u32 = 10;
const SPEED_INCREMENT: u32 = 2;
const SPEED_MAX: u32 = 25;
const SCORE_SPEEDUP_STEP: u32 = 5;

const SAVE_FILE: &str = "savegame.json";
const HIGH_SCORE_FILE: &str = "highscore.txt";
pub const SAVE_FILE_ENV_VAR: &str = "SNAKE_SAVE_FILE";
pub const HIGH_SCORE_FILE_ENV_VAR: &str = "SNAKE_HIGHSCORE_FILE";

/// Session parameters, fixed once the window is open.
#[derive(Debug, Clone)]
pub struct Config {
    pub width: i32,
    pub height: i32,
    pub block: i32,
    pub base_speed: u32,
    pub speed_increment: u32,
    pub speed_max: u32,
    pub score_speedup_step: u32,
    pub high_score_path: PathBuf,
    pub save_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            block: BLOCK,
            base_speed: BASE_SPEED,
            speed_increment: SPEED_INCREMENT,
            speed_max: SPEED_MAX,
            score_speedup_step: SCORE_SPEEDUP_STEP,
            high_score_path: PathBuf::from(HIGH_SCORE_FILE),
            save_path: PathBuf::from(SAVE_FILE),
        }
    }
}

impl Config {
    /// Defaults, with the storage paths taken from the environment when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os(HIGH_SCORE_FILE_ENV_VAR) {
            config.high_score_path = PathBuf::from(path);
        }
        if let Some(path) = std::env::var_os(SAVE_FILE_ENV_VAR) {
            config.save_path = PathBuf::from(path);
        }
        config
    }

    pub fn columns(&self) -> i32 {
        self.width / self.block
    }

    pub fn rows(&self) -> i32 {
        self.height / self.block
    }

    pub fn cell_count(&self) -> usize {
        (self.columns() * self.rows()) as usize
    }

    /// Ticks per second: manual speed plus one for every `score_speedup_step` points.
    pub fn tick_rate(&self, speed: u32, score: u32) -> u32 {
        (speed + score / self.score_speedup_step).max(1)
    }

    pub fn tick_interval(&self, speed: u32, score: u32) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate(speed, score) as f64)
    }

    pub fn clamp_speed(&self, speed: u32) -> u32 {
        speed.clamp(self.base_speed, self.speed_max)
    }
}
