use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;

/// Fixed game constants. Every field has a default, so a config file only
/// needs to name the values it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// length of a round in seconds
    pub round_secs: u32,
    /// pixels a word falls per fall tick
    pub fall_speed: f64,
    pub fall_tick_ms: u64,
    pub spawn_interval_ms: u64,
    pub game_height: f64,
    /// rendered height of a word; a word is missed once its top passes
    /// `game_height - word_height`
    pub word_height: f64,
    pub max_words: usize,
    pub wpm_interval_ms: u64,
    pub countdown_ms: u64,
    pub spawn_top: f64,
    pub spawn_left_min: f64,
    pub spawn_left_max: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_secs: 60,
            fall_speed: 1.0,
            fall_tick_ms: 16,
            spawn_interval_ms: 2000,
            game_height: 500.0,
            word_height: 50.0,
            max_words: 8,
            wpm_interval_ms: 1000,
            countdown_ms: 1000,
            spawn_top: -30.0,
            spawn_left_min: 10.0,
            spawn_left_max: 90.0,
        }
    }
}

impl GameConfig {
    pub fn miss_line(&self) -> f64 {
        self.game_height - self.word_height
    }

    pub fn fall_tick(&self) -> Duration {
        Duration::from_millis(self.fall_tick_ms)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn wpm_interval(&self) -> Duration {
        Duration::from_millis(self.wpm_interval_ms)
    }

    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.countdown_ms)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.round_secs > 0, "round_secs must be positive");
        ensure!(self.max_words > 0, "max_words must be positive");
        ensure!(
            self.fall_tick_ms > 0
                && self.spawn_interval_ms > 0
                && self.wpm_interval_ms > 0
                && self.countdown_ms > 0,
            "timer periods must be positive"
        );
        ensure!(
            self.fall_speed.is_finite() && self.fall_speed >= 0.0,
            "fall_speed must be a non-negative number"
        );
        ensure!(
            self.game_height > self.word_height,
            "game_height must exceed word_height"
        );
        ensure!(
            self.game_height.is_finite() && self.word_height.is_finite(),
            "game_height and word_height must be numbers"
        );
        ensure!(self.spawn_top.is_finite(), "spawn_top must be a number");
        ensure!(
            (0.0..=100.0).contains(&self.spawn_left_min)
                && (0.0..=100.0).contains(&self.spawn_left_max),
            "spawn_left_min and spawn_left_max must be percentages in 0..=100"
        );
        ensure!(
            self.spawn_left_min <= self.spawn_left_max,
            "spawn_left_min must not exceed spawn_left_max"
        );
        Ok(())
    }
}

pub trait ConfigStore {
    fn load(&self) -> anyhow::Result<GameConfig>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("wordrace.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> anyhow::Result<GameConfig> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no config file, using defaults");
                return Ok(GameConfig::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading config {}", self.path.display()))
            }
        };

        let cfg: GameConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing config {}", self.path.display()))?;
        cfg.validate()
            .with_context(|| format!("invalid config {}", self.path.display()))?;
        Ok(cfg)
    }
}
