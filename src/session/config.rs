//! Immutable per-session settings.

use crate::board::{BoardLayout, Player};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Who the second actor is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameMode {
    /// Human against the engine's AI; the engine answers every human move.
    #[default]
    HumanVsEngine,
    /// Two humans sharing the board; the engine only adjudicates moves.
    HumanVsHuman,
}

/// Settings fixed for the lifetime of one game session.
///
/// Supplied once at session start and never mutated afterwards. The
/// starting color takes the first turn; against the engine it is also the
/// human's side.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Side that moves first (the human side in human-vs-engine mode).
    #[serde(default = "default_starting_color")]
    starting_color: Player,
    /// Starting arrangement handed to the engine.
    #[serde(default)]
    layout: BoardLayout,
    /// Human-vs-engine or human-vs-human.
    #[serde(default)]
    mode: GameMode,
    /// Cap on the combined move count of both players.
    #[serde(default = "default_move_limit")]
    move_limit: u32,
    /// Per-turn time limit for black, in seconds.
    #[serde(default = "default_time_limit_secs")]
    black_time_limit_secs: u64,
    /// Per-turn time limit for white, in seconds.
    #[serde(default = "default_time_limit_secs")]
    white_time_limit_secs: u64,
    /// Where the end-of-game log file is written.
    #[serde(default = "default_log_path")]
    log_path: PathBuf,
}

fn default_starting_color() -> Player {
    Player::Black
}

fn default_move_limit() -> u32 {
    100
}

fn default_time_limit_secs() -> u64 {
    60
}

fn default_log_path() -> PathBuf {
    PathBuf::from("abalone_game.log")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_color: default_starting_color(),
            layout: BoardLayout::default(),
            mode: GameMode::default(),
            move_limit: default_move_limit(),
            black_time_limit_secs: default_time_limit_secs(),
            white_time_limit_secs: default_time_limit_secs(),
            log_path: default_log_path(),
        }
    }
}

impl SessionConfig {
    /// Creates a configuration with explicit values.
    #[instrument]
    pub fn new(
        starting_color: Player,
        layout: BoardLayout,
        mode: GameMode,
        move_limit: u32,
        black_time_limit_secs: u64,
        white_time_limit_secs: u64,
        log_path: PathBuf,
    ) -> Self {
        info!(?mode, move_limit, "Creating session config");
        Self {
            starting_color,
            layout,
            mode,
            move_limit,
            black_time_limit_secs,
            white_time_limit_secs,
            log_path,
        }
    }

    /// Convenience constructor giving both players the same time limit.
    #[instrument]
    pub fn with_shared_time_limit(
        starting_color: Player,
        layout: BoardLayout,
        mode: GameMode,
        move_limit: u32,
        time_limit_secs: u64,
        log_path: PathBuf,
    ) -> Self {
        Self::new(
            starting_color,
            layout,
            mode,
            move_limit,
            time_limit_secs,
            time_limit_secs,
            log_path,
        )
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading session config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(?config.mode, config.move_limit, "Config loaded successfully");
        Ok(config)
    }

    /// The per-turn time limit for `player`.
    pub fn time_limit(&self, player: Player) -> Duration {
        match player {
            Player::Black => Duration::from_secs(self.black_time_limit_secs),
            Player::White => Duration::from_secs(self.white_time_limit_secs),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
