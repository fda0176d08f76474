//! Tests for session configuration and TOML loading.

use abalone_core::{BoardLayout, GameMode, Player, SessionConfig};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = SessionConfig::default();
    assert_eq!(*config.starting_color(), Player::Black);
    assert_eq!(*config.layout(), BoardLayout::Standard);
    assert_eq!(*config.mode(), GameMode::HumanVsEngine);
    assert_eq!(*config.move_limit(), 100);
    assert_eq!(config.time_limit(Player::Black), Duration::from_secs(60));
    assert_eq!(config.time_limit(Player::White), Duration::from_secs(60));
}

#[test]
fn test_per_player_time_limits() {
    let config = SessionConfig::new(
        Player::White,
        BoardLayout::BelgianDaisy,
        GameMode::HumanVsHuman,
        40,
        30,
        45,
        PathBuf::from("out.log"),
    );
    assert_eq!(config.time_limit(Player::Black), Duration::from_secs(30));
    assert_eq!(config.time_limit(Player::White), Duration::from_secs(45));
    assert_eq!(*config.starting_color(), Player::White);
}

#[test]
fn test_shared_time_limit() {
    let config = SessionConfig::with_shared_time_limit(
        Player::Black,
        BoardLayout::GermanDaisy,
        GameMode::HumanVsEngine,
        60,
        90,
        PathBuf::from("out.log"),
    );
    assert_eq!(config.time_limit(Player::Black), config.time_limit(Player::White));
    assert_eq!(config.time_limit(Player::Black), Duration::from_secs(90));
}

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.toml");
    let mut file = std::fs::File::create(&path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
    (dir, path)
}

#[test]
fn test_from_file_full() {
    let (_dir, path) = write_config(
        r#"
starting_color = "white"
layout = "german_daisy"
mode = "human_vs_human"
move_limit = 50
black_time_limit_secs = 20
white_time_limit_secs = 25
log_path = "session.log"
"#,
    );
    let config = SessionConfig::from_file(&path).expect("load config");
    assert_eq!(*config.starting_color(), Player::White);
    assert_eq!(*config.layout(), BoardLayout::GermanDaisy);
    assert_eq!(*config.mode(), GameMode::HumanVsHuman);
    assert_eq!(*config.move_limit(), 50);
    assert_eq!(config.time_limit(Player::Black), Duration::from_secs(20));
    assert_eq!(config.time_limit(Player::White), Duration::from_secs(25));
    assert_eq!(*config.log_path(), PathBuf::from("session.log"));
}

#[test]
fn test_from_file_partial_falls_back_to_defaults() {
    let (_dir, path) = write_config("move_limit = 12\n");
    let config = SessionConfig::from_file(&path).expect("load config");
    assert_eq!(*config.move_limit(), 12);
    assert_eq!(*config.starting_color(), Player::Black);
    assert_eq!(*config.mode(), GameMode::HumanVsEngine);
}

#[test]
fn test_from_file_missing_file_errors() {
    let result = SessionConfig::from_file("/nonexistent/session.toml");
    assert!(result.is_err());
}

#[test]
fn test_from_file_bad_toml_errors() {
    let (_dir, path) = write_config("mode = \"carrier_pigeon\"\n");
    assert!(SessionConfig::from_file(&path).is_err());
}

#[test]
fn test_toml_round_trip() {
    let original = SessionConfig::with_shared_time_limit(
        Player::White,
        BoardLayout::BelgianDaisy,
        GameMode::HumanVsHuman,
        33,
        15,
        PathBuf::from("round.log"),
    );
    let text = toml::to_string(&original).expect("serialize");
    let reloaded: SessionConfig = toml::from_str(&text).expect("deserialize");
    assert_eq!(reloaded, original);
}
