//! Session error taxonomy.

use crate::engine::EngineError;
use derive_more::{Display, Error};
use std::time::Duration;

/// Everything that can go wrong while driving a session.
///
/// Only [`MaxMovesReached`](SessionError::MaxMovesReached) and
/// [`EngineFault`](SessionError::EngineFault) end the session; the other
/// variants leave it awaiting a fresh selection from the same player.
#[derive(Debug, Clone, Display, Error)]
pub enum SessionError {
    /// A pick or extend was rejected by the ownership/geometry rules, or a
    /// move was submitted without a selection.
    #[display("invalid selection")]
    InvalidSelection,
    /// The engine rejected a structurally valid move.
    #[display("illegal move: {_0}")]
    IllegalMove(#[error(not(source))] String),
    /// The turn ran past the player's time limit before submission.
    #[display("time limit exceeded: {:.2}s over a {:.2}s limit", elapsed.as_secs_f64(), limit.as_secs_f64())]
    TimeLimitExceeded {
        /// How long the turn had been running.
        elapsed: Duration,
        /// The limit it ran past.
        limit: Duration,
    },
    /// The combined move cap was hit; the session is over.
    #[display("maximum move count reached")]
    MaxMovesReached,
    /// The engine failed; the session is over.
    #[display("engine fault: {_0}")]
    EngineFault(#[error(source)] EngineError),
    /// Undo was requested with no applied move to roll back.
    #[display("nothing to undo")]
    NothingToUndo,
    /// Undo was requested while an engine reply was still pending.
    #[display("engine reply pending")]
    ReplyPending,
    /// The session has already ended.
    #[display("session is over")]
    SessionOver,
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        Self::EngineFault(err)
    }
}
