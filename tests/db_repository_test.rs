//! Tests for database repository operations.

mod common;

use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;

use abalone_core::{
    Direction, EndReason, GameMode, GameRepository, GameSession, NewGameRecord, NullObserver,
    Player,
};
use common::{FakeEngine, Scripted, coord, snapshot_with_counts, test_config};
use std::time::Duration;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("Failed to connect");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Migrations failed");

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    (db_file, repo)
}

fn sample_record(mode: &str, winner: Option<&str>) -> NewGameRecord {
    NewGameRecord::new(
        mode.to_string(),
        winner.map(String::from),
        EndReason::MarblesCaptured.to_string(),
        21,
        20,
        310.5,
        290.25,
        12,
        8,
        "game.log".to_string(),
    )
}

#[test]
fn test_record_game() {
    let (_db, repo) = setup_test_db();

    let stored = repo
        .record_game(sample_record("human_vs_engine", Some("black")))
        .expect("Record failed");

    assert!(*stored.id() > 0);
    assert_eq!(stored.mode(), "human_vs_engine");
    assert_eq!(stored.winner().as_deref(), Some("black"));
    assert_eq!(*stored.black_moves(), 21);
    assert_eq!(*stored.white_marbles(), 8);
    assert!((stored.black_elapsed_secs() - 310.5).abs() < f64::EPSILON);
}

#[test]
fn test_record_game_without_winner() {
    let (_db, repo) = setup_test_db();

    let stored = repo
        .record_game(sample_record("human_vs_human", None))
        .expect("Record failed");

    assert_eq!(*stored.winner(), None);
    assert_eq!(stored.parse_winner().expect("parse"), None);
}

#[test]
fn test_list_games() {
    let (_db, repo) = setup_test_db();
    for winner in [Some("black"), Some("white"), None] {
        repo.record_game(sample_record("human_vs_engine", winner))
            .expect("Record failed");
    }

    let games = repo.list_games().expect("List failed");
    assert_eq!(games.len(), 3);
}

#[test]
fn test_games_by_mode() {
    let (_db, repo) = setup_test_db();
    repo.record_game(sample_record("human_vs_engine", Some("black")))
        .expect("Record failed");
    repo.record_game(sample_record("human_vs_engine", Some("white")))
        .expect("Record failed");
    repo.record_game(sample_record("human_vs_human", None))
        .expect("Record failed");

    let pve = repo.games_by_mode("human_vs_engine").expect("Query failed");
    assert_eq!(pve.len(), 2);

    let pvp = repo.games_by_mode("human_vs_human").expect("Query failed");
    assert_eq!(pvp.len(), 1);

    let none = repo.games_by_mode("engine_vs_engine").expect("Query failed");
    assert!(none.is_empty());
}

#[test]
fn test_aggregate_results() {
    let (_db, repo) = setup_test_db();
    let winners = [Some("black"), Some("black"), Some("white"), None];
    for winner in winners {
        repo.record_game(sample_record("human_vs_engine", winner))
            .expect("Record failed");
    }

    let agg = repo.aggregate_results().expect("Aggregation failed");
    assert_eq!(*agg.total_games(), 4);
    assert_eq!(*agg.black_wins(), 2);
    assert_eq!(*agg.white_wins(), 1);
    assert_eq!(*agg.unresolved(), 1);
    assert!((agg.decided_rate() - 75.0).abs() < 0.001);
}

#[test]
fn test_aggregate_results_empty() {
    let (_db, repo) = setup_test_db();
    let agg = repo.aggregate_results().expect("Aggregation failed");
    assert_eq!(*agg.total_games(), 0);
    assert_eq!(agg.decided_rate(), 0.0);
}

#[test]
fn test_parse_winner_round_trip() {
    let (_db, repo) = setup_test_db();
    let stored = repo
        .record_game(sample_record("human_vs_engine", Some("white")))
        .expect("Record failed");
    assert_eq!(stored.parse_winner().expect("parse"), Some(Player::White));
}

#[test]
fn test_parse_winner_invalid_string() {
    let (_db, repo) = setup_test_db();
    let stored = repo
        .record_game(sample_record("human_vs_engine", Some("purple")))
        .expect("Record failed");
    assert!(stored.parse_winner().is_err());
}

#[test]
fn test_parse_end_reason_round_trip() {
    let (_db, repo) = setup_test_db();
    let stored = repo
        .record_game(sample_record("human_vs_engine", Some("black")))
        .expect("Record failed");
    assert_eq!(
        stored.parse_end_reason().expect("parse"),
        EndReason::MarblesCaptured
    );
}

#[test]
fn test_session_end_records_into_repository() {
    let (_db, repo) = setup_test_db();
    let dir = tempfile::tempdir().expect("tempdir");

    let engine = FakeEngine::standard().script(Scripted::Snapshot(
        snapshot_with_counts(14, 8),
        Duration::ZERO,
    ));
    let mut session = GameSession::new(
        test_config(GameMode::HumanVsHuman, dir.path().join("game.log")),
        Box::new(engine),
        Box::new(NullObserver),
    )
    .expect("session")
    .with_repository(repo.clone());

    session.pick(coord(3, 3)).expect("pick");
    session.submit(Direction::SE).expect("submit");
    assert!(session.is_over());

    let games = repo.list_games().expect("List failed");
    assert_eq!(games.len(), 1);
    let stored = &games[0];
    assert_eq!(stored.mode(), "human_vs_human");
    assert_eq!(stored.parse_winner().expect("parse"), Some(Player::Black));
    assert_eq!(
        stored.parse_end_reason().expect("parse"),
        EndReason::MarblesCaptured
    );
    assert_eq!(*stored.black_moves(), 1);
    assert_eq!(*stored.white_marbles(), 8);
}
