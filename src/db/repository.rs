//! Database repository for finished game records.

use diesel::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::db::{AggregatedResults, DbError, GameRecord, NewGameRecord, schema};

/// Repository over the finished-games database.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Records a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, record), fields(mode = %record.mode(), end_reason = %record.end_reason()))]
    pub fn record_game(&self, record: NewGameRecord) -> Result<GameRecord, DbError> {
        debug!("Recording finished game");
        let mut conn = self.connection()?;

        let stored = diesel::insert_into(schema::game_records::table)
            .values(&record)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(
            record_id = stored.id(),
            winner = ?stored.winner(),
            "Game result recorded"
        );
        Ok(stored)
    }

    /// Lists all recorded games, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<GameRecord>, DbError> {
        debug!("Listing recorded games");
        let mut conn = self.connection()?;

        let games = schema::game_records::table
            .order(schema::game_records::finished_at.desc())
            .load::<GameRecord>(&mut conn)?;

        info!(count = games.len(), "Games loaded");
        Ok(games)
    }

    /// Lists recorded games for one mode, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn games_by_mode(&self, mode: &str) -> Result<Vec<GameRecord>, DbError> {
        debug!(mode = %mode, "Loading games by mode");
        let mut conn = self.connection()?;

        let games = schema::game_records::table
            .filter(schema::game_records::mode.eq(mode))
            .order(schema::game_records::finished_at.desc())
            .load::<GameRecord>(&mut conn)?;

        info!(mode = %mode, count = games.len(), "Mode games loaded");
        Ok(games)
    }

    /// Aggregates win counts across every recorded game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn aggregate_results(&self) -> Result<AggregatedResults, DbError> {
        debug!("Computing aggregated results");
        let mut conn = self.connection()?;

        let games = schema::game_records::table.load::<GameRecord>(&mut conn)?;

        let mut black_wins = 0;
        let mut white_wins = 0;
        let mut unresolved = 0;

        for game in &games {
            match game.winner().as_deref() {
                Some("black") => black_wins += 1,
                Some("white") => white_wins += 1,
                None => unresolved += 1,
                Some(other) => warn!(winner = %other, record_id = game.id(), "Unknown winner value"),
            }
        }

        let total = games.len() as i32;
        let aggregated = AggregatedResults::new(total, black_wins, white_wins, unresolved);

        info!(
            total = %total,
            black_wins = %black_wins,
            white_wins = %white_wins,
            unresolved = %unresolved,
            "Aggregated results computed"
        );

        Ok(aggregated)
    }
}
