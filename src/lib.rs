//! Abalone interaction core - selection validation and turn orchestration
//!
//! This library is the engine-facing half of a hexagonal Abalone game: it
//! decides whether a set of picked cells forms a legal group, sequences
//! human and engine turns, enforces time and move-count limits, keeps
//! clocks, scores and an append-only move log, supports undo, and persists
//! end-of-game artifacts. Rendering and the rule/AI engine itself live
//! elsewhere; the engine is reached only through the [`Engine`] trait.
//!
//! # Architecture
//!
//! - **Board**: 61-cell axial coordinates, six directions, occupancy cache
//! - **Selection**: incremental validation of 1-3 marble groups
//! - **Session**: the turn state machine with clocks, scores and undo
//! - **Log**: move records, the persisted end-of-game summary
//! - **Db**: SQLite records of finished sessions
//!
//! # Example
//!
//! ```no_run
//! use abalone_core::{GameSession, NullObserver, SessionConfig};
//!
//! # fn example(engine: Box<dyn abalone_core::Engine>) -> Result<(), abalone_core::SessionError> {
//! let config = SessionConfig::default();
//! let session = GameSession::new(config, engine, Box::new(NullObserver))?;
//! assert!(!session.is_over());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod db;
mod engine;
mod log;
mod selection;
mod session;

// Crate-level exports - Board model
pub use board::{BoardLayout, BoardState, Coordinate, Direction, Player, STARTING_MARBLES};

// Crate-level exports - Persistence
pub use db::{AggregatedResults, DbError, GameRecord, GameRepository, NewGameRecord};

// Crate-level exports - Engine seam
pub use engine::{Engine, EngineError, EngineReply, EngineSnapshot};

// Crate-level exports - Move log and summary
pub use log::{EndReason, GameSummary, LogError, MoveLog, MoveRecord, RecordOutcome, format_move};

// Crate-level exports - Selection validation
pub use selection::{MAX_GROUP, Selection, group_is_line, is_valid_group};

// Crate-level exports - Session orchestration
pub use session::{
    ConfigError, GameMode, GameSession, NullObserver, Phase, PlayerStats, SessionConfig,
    SessionError, SessionObserver, SessionStats,
};
