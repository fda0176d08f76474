//! Database persistence layer for finished game records.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{AggregatedResults, GameRecord, NewGameRecord};
pub use repository::GameRepository;
