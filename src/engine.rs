//! The seam to the external rule/AI engine.
//!
//! The engine is the single authority on move legality, push mechanics, and
//! marble ejection. The interaction core only ever sees it through this
//! trait: submit a structurally valid move, get back a status plus the full
//! post-move marble positions, and rebuild the cached board from those.

use crate::board::{BoardState, Coordinate, Direction};
use crate::selection::Selection;
use derive_more::{Display, Error};
use std::time::Duration;

/// Marble positions as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSnapshot {
    /// Cells holding black marbles.
    pub black: Vec<Coordinate>,
    /// Cells holding white marbles.
    pub white: Vec<Coordinate>,
}

impl EngineSnapshot {
    /// Rebuilds a [`BoardState`] cache from the position lists.
    pub fn board(&self) -> BoardState {
        BoardState::from_positions(&self.black, &self.white)
    }
}

/// Outcome of handing a move to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineReply {
    /// The move (and, against an engine opponent, its automatic reply) was
    /// applied. `reply_duration` is how long the engine searched for the
    /// reply; zero when there was none.
    Applied {
        /// Positions after everything was applied.
        snapshot: EngineSnapshot,
        /// Search time spent on the automatic reply.
        reply_duration: Duration,
    },
    /// The engine rejected the move; nothing changed.
    Invalid,
    /// The engine's own move cap was hit; `snapshot` holds the final
    /// positions to score the game with.
    MaxMoves {
        /// Final positions at the cap.
        snapshot: EngineSnapshot,
    },
}

/// Unexpected failure inside the engine, fatal to the session.
#[derive(Debug, Clone, Display, Error)]
#[display("Engine fault: {} at {}:{}", message, file, line)]
pub struct EngineError {
    /// Error message.
    pub message: String,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl EngineError {
    /// Creates an engine error with caller location tracking.
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

/// The rule/AI engine as seen by the orchestrator.
///
/// Implementations own the authoritative board. Any `Err` from these
/// methods is treated as a fatal session fault: the orchestrator ends the
/// game and stops accepting moves.
pub trait Engine: Send {
    /// Applies a human move and, against an engine opponent, computes and
    /// applies the automatic reply in the same call.
    fn apply_move_and_maybe_reply(
        &mut self,
        selection: &Selection,
        direction: Direction,
    ) -> Result<EngineReply, EngineError>;

    /// Rolls back exactly one applied move-pair (one ply in human-vs-human).
    fn undo_last_move_pair(&mut self) -> Result<(), EngineError>;

    /// Positions as the engine currently sees them.
    fn current_state(&self) -> Result<EngineSnapshot, EngineError>;

    /// Positions at the start of the game.
    fn initial_state(&self) -> Result<EngineSnapshot, EngineError>;
}
