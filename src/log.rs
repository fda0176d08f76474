//! Append-only move log and the persisted end-of-game summary.

use crate::board::{Coordinate, Direction, Player};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Why the session ended.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    /// A side dropped to the losing marble count.
    MarblesCaptured,
    /// The combined move cap was reached.
    MoveLimitReached,
    /// The engine failed; the session could not continue.
    EngineFault,
}

/// Whether a logged attempt was actually applied to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The engine applied the move.
    Applied,
    /// The attempt was rejected; the board never changed.
    Rejected,
}

/// One attempted or applied move.
///
/// Applied records carry the turn duration that was charged to the actor's
/// clock; undo subtracts exactly these durations back out. Rejected records
/// are history only and are never popped.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct MoveRecord {
    /// Who attempted the move.
    actor: Player,
    /// Move text in wire notation (or a short note for engine replies).
    text: String,
    /// Time charged against the actor for this record.
    duration: Duration,
    /// Whether the move was applied.
    outcome: RecordOutcome,
}

impl MoveRecord {
    /// Formats the record as one log line.
    pub fn line(&self) -> String {
        match self.outcome {
            RecordOutcome::Applied => format!(
                "{} {} ({:.2}s)",
                self.actor,
                self.text,
                self.duration.as_secs_f64()
            ),
            RecordOutcome::Rejected => format!("[INVALID] {} {}", self.actor, self.text),
        }
    }
}

/// Formats a move in the engine wire notation.
///
/// Inline moves (the group travels along its own axis, or a single marble)
/// are `i<cell><dir>`; sidesteps are `s<first><last><dir>` over the sorted
/// endpoints of the group. `iC3NE` reads "the group whose rearmost cell is
/// C3 moves north-east".
pub fn format_move(coords: &[Coordinate], direction: Direction) -> String {
    let mut sorted: Vec<Coordinate> = coords.to_vec();
    sorted.sort();
    match sorted.as_slice() {
        [] => format!("i??{direction}"),
        [only] => format!("i{only}{direction}"),
        [first, second, ..] => {
            let last = sorted[sorted.len() - 1];
            let axis = Direction::from_delta((
                second.col() - first.col(),
                second.row() - first.row(),
            ));
            let inline = axis
                .map(|a| a == direction || a == direction.opposite())
                .unwrap_or(false);
            if inline {
                format!("i{first}{direction}")
            } else {
                format!("s{first}{last}{direction}")
            }
        }
    }
}

/// The append-only record of every attempted and applied move.
#[derive(Debug, Clone, Default)]
pub struct MoveLog {
    records: Vec<MoveRecord>,
}

impl MoveLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Number of records, applied and rejected.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no record has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of applied records.
    pub fn applied_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| *r.outcome() == RecordOutcome::Applied)
            .count()
    }

    /// Appends a record and returns its formatted line.
    pub fn append(&mut self, record: MoveRecord) -> String {
        let line = record.line();
        self.records.push(record);
        line
    }

    /// Removes and returns the `n` most recent applied records, oldest of
    /// them first. Rejected records stay in place as history.
    pub fn pop_last_applied(&mut self, n: usize) -> Vec<MoveRecord> {
        let mut indices: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, r)| *r.outcome() == RecordOutcome::Applied)
            .take(n)
            .map(|(i, _)| i)
            .collect();
        indices.sort_unstable();
        let mut popped = Vec::with_capacity(indices.len());
        for i in indices.into_iter().rev() {
            popped.push(self.records.remove(i));
        }
        popped.reverse();
        popped
    }

    /// Writes every record line, the closing headline, and the summary
    /// block to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LogError`] if the file cannot be created or written.
    #[instrument(skip(self, summary, path), fields(path = %path.as_ref().display()))]
    pub fn persist(&self, summary: &GameSummary, path: impl AsRef<Path>) -> Result<(), LogError> {
        let file = std::fs::File::create(path.as_ref())?;
        let mut out = std::io::BufWriter::new(file);
        for record in &self.records {
            writeln!(out, "{}", record.line())?;
        }
        writeln!(out, "{}", summary.headline())?;
        write!(out, "{}", summary.block())?;
        out.flush()?;
        info!(records = self.records.len(), "game log persisted");
        Ok(())
    }
}

/// Final counters for a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameSummary {
    /// Winning side, if one was determined.
    winner: Option<Player>,
    /// Why the game ended.
    reason: EndReason,
    /// Moves black made.
    black_moves: u32,
    /// Moves white made.
    white_moves: u32,
    /// Total time black spent.
    black_elapsed: Duration,
    /// Total time white spent.
    white_elapsed: Duration,
    /// Marbles black still has on the board.
    black_marbles: u8,
    /// Marbles white still has on the board.
    white_marbles: u8,
}

impl GameSummary {
    /// One-line closing entry for the log.
    pub fn headline(&self) -> String {
        match self.winner {
            Some(p) => format!("game over: {} wins ({})", p, self.reason),
            None => format!("game over: no winner ({})", self.reason),
        }
    }

    /// The multi-line summary block written after the move lines.
    pub fn block(&self) -> String {
        format!(
            "-- summary --\n\
             black: {} moves, {:.2}s, {} marbles remaining\n\
             white: {} moves, {:.2}s, {} marbles remaining\n",
            self.black_moves,
            self.black_elapsed.as_secs_f64(),
            self.black_marbles,
            self.white_moves,
            self.white_elapsed.as_secs_f64(),
            self.white_marbles,
        )
    }
}

/// Failure while persisting the game log.
#[derive(Debug, Clone, Display, Error)]
#[display("Log error: {} at {}:{}", message, file, line)]
pub struct LogError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl LogError {
    /// Creates a new log error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for LogError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}
