//! Database models for finished game records.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use std::str::FromStr;
use tracing::instrument;

use crate::board::Player;
use crate::db::{DbError, schema};
use crate::log::EndReason;

/// A finished game as stored in the database.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::game_records)]
pub struct GameRecord {
    id: i32,
    mode: String,
    winner: Option<String>,
    end_reason: String,
    black_moves: i32,
    white_moves: i32,
    black_elapsed_secs: f64,
    white_elapsed_secs: f64,
    black_marbles: i32,
    white_marbles: i32,
    log_path: String,
    finished_at: NaiveDateTime,
}

impl GameRecord {
    /// Parses the stored winner column back into a [`Player`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column holds an unknown color.
    #[instrument(skip(self), fields(winner = ?self.winner))]
    pub fn parse_winner(&self) -> Result<Option<Player>, DbError> {
        match self.winner.as_deref() {
            None => Ok(None),
            Some(s) => Player::from_str(s)
                .map(Some)
                .map_err(|_| DbError::new(format!("Invalid winner: '{}'", s))),
        }
    }

    /// Parses the stored end reason.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column holds an unknown reason.
    #[instrument(skip(self), fields(end_reason = %self.end_reason))]
    pub fn parse_end_reason(&self) -> Result<EndReason, DbError> {
        EndReason::from_str(&self.end_reason)
            .map_err(|_| DbError::new(format!("Invalid end reason: '{}'", self.end_reason)))
    }
}

/// Insertable model for recording a finished game.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::game_records)]
pub struct NewGameRecord {
    mode: String,
    winner: Option<String>,
    end_reason: String,
    black_moves: i32,
    white_moves: i32,
    black_elapsed_secs: f64,
    white_elapsed_secs: f64,
    black_marbles: i32,
    white_marbles: i32,
    log_path: String,
}

/// Aggregated results over a set of recorded games.
#[derive(Debug, Clone, Getters)]
pub struct AggregatedResults {
    total_games: i32,
    black_wins: i32,
    white_wins: i32,
    unresolved: i32,
}

impl AggregatedResults {
    /// Creates new aggregated results.
    #[instrument]
    pub fn new(total_games: i32, black_wins: i32, white_wins: i32, unresolved: i32) -> Self {
        Self {
            total_games,
            black_wins,
            white_wins,
            unresolved,
        }
    }

    /// Share of recorded games that produced a winner (0.0–100.0).
    #[instrument(skip(self))]
    pub fn decided_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            let decided = self.black_wins + self.white_wins;
            (decided as f64 / self.total_games as f64) * 100.0
        }
    }
}
