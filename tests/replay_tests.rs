// Unit tests for replay module
//
// Plays a logged match, reads the JSONL back and checks that every tick
// re-resolves to the logged state. Also covers malformed logs and move validation.

use snake_duel::bot;
use snake_duel::config::{Config, PlayerKind};
use snake_duel::debug_logger::{LogEntry, MatchLogger};
use snake_duel::game::Match;
use snake_duel::replay::ReplayEngine;
use snake_duel::types::{Direction, SnakeId};
use std::path::PathBuf;

/// Fresh log path under the system temp dir
fn log_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("snake_duel_{}_{}.jsonl", name, std::process::id()))
}

fn config() -> Config {
    let mut config = Config::default_hardcoded();
    config.timing.max_ticks = 200;
    config.players.player1 = PlayerKind::Search;
    config.players.player2 = PlayerKind::Heuristic;
    config
}

/// Plays one logged match and loads its entries back
fn logged_match(name: &str, seed: u64) -> (Vec<LogEntry>, u32) {
    let config = config();
    let path = log_path(name);
    let logger = MatchLogger::new(true, path.to_str().expect("utf-8 temp path"));
    assert!(logger.is_enabled());

    let mut game = Match::new(
        &config,
        bot::from_kind(config.players.player1, &config),
        bot::from_kind(config.players.player2, &config),
        seed,
    )
    .with_logger(logger);
    let result = game.run();

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).expect("Failed to load match log");
    let _ = std::fs::remove_file(&path);
    (entries, result.ticks)
}

#[test]
fn test_log_has_start_then_ticks() {
    let (entries, ticks) = logged_match("layout", 3);

    assert_eq!(entries.len(), ticks as usize + 1);
    match &entries[0] {
        LogEntry::Start { seed, state, .. } => {
            assert_eq!(*seed, 3);
            assert_eq!(state.lengths(), (3, 3));
        }
        other => panic!("Expected start record, got {:?}", other),
    }
    for (i, entry) in entries[1..].iter().enumerate() {
        match entry {
            LogEntry::Tick { tick, .. } => assert_eq!(*tick as usize, i + 1),
            other => panic!("Expected tick record, got {:?}", other),
        }
    }
}

#[test]
fn test_replay_reproduces_every_tick() {
    let (entries, ticks) = logged_match("full", 5);
    let engine = ReplayEngine::new(config(), false);

    let results = engine.replay_all(&entries).expect("replay succeeds");
    let stats = engine.generate_stats(&results);

    assert_eq!(stats.total_ticks, ticks as usize);
    let mismatched: Vec<u32> = results.iter().filter(|r| !r.matches).map(|r| r.tick).collect();
    assert_eq!(stats.mismatches, 0, "mismatched ticks: {:?}", mismatched);
    assert!((stats.match_rate - 100.0).abs() < f64::EPSILON);
}

#[test]
fn test_tampered_tick_is_reported() {
    let (mut entries, _) = logged_match("tampered", 5);

    if let LogEntry::Tick { state, .. } = &mut entries[1] {
        state.snake1.body.pop_back();
    }

    let engine = ReplayEngine::new(config(), false);
    let results = engine.replay_all(&entries).expect("replay succeeds");

    assert!(!results[0].matches);
    assert_eq!(results[0].logged_lengths.0 + 1, results[0].replayed_lengths.0);
}

#[test]
fn test_replay_selected_ticks() {
    let (entries, ticks) = logged_match("selected", 8);
    let engine = ReplayEngine::new(config(), false);

    let results = engine.replay_ticks(&entries, &[1]).expect("tick 1 exists");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].tick, 1);

    let missing = engine.replay_ticks(&entries, &[ticks + 10]);
    assert!(missing.is_err());
}

#[test]
fn test_log_without_start_is_rejected() {
    let (entries, _) = logged_match("headless", 4);
    let engine = ReplayEngine::new(config(), false);

    let err = engine.replay_all(&entries[1..]).unwrap_err();
    assert_eq!(err, "Log does not begin with a start record");
    assert_eq!(engine.replay_all(&[]).unwrap_err(), "Log is empty");
}

#[test]
fn test_validate_expected_moves() {
    let (entries, _) = logged_match("validate", 2);
    let engine = ReplayEngine::new(config(), false);

    let first = match &entries[1] {
        LogEntry::Tick { dir1, .. } => *dir1,
        other => panic!("Expected tick record, got {:?}", other),
    };
    let others: Vec<Direction> = Direction::all()
        .into_iter()
        .filter(|d| *d != first)
        .collect();

    assert!(engine
        .validate_expected_moves(&entries, SnakeId::One, &[(1, vec![first])])
        .is_ok());
    assert!(engine
        .validate_expected_moves(&entries, SnakeId::One, &[(1, others)])
        .is_err());
}

#[test]
fn test_load_missing_file() {
    let engine = ReplayEngine::new(config(), false);
    let result = engine.load_log_file(log_path("does_not_exist"));
    assert!(result.is_err());
}
