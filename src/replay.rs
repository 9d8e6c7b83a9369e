// Replay module for verifying logged matches
//
// This module provides functionality to:
// 1. Parse JSONL match logs
// 2. Re-resolve every logged tick from the previous logged state
// 3. Compare the recomputed state and winner with the logged ones
// 4. Generate summary reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::Config;
use crate::debug_logger::LogEntry;
use crate::pip::ScriptedPipSource;
use crate::resolver::Resolver;
use crate::types::{Direction, GameState, SnakeId};

/// Result of replaying a single tick
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub tick: u32,
    pub dir1: Direction,
    pub dir2: Direction,
    pub matches: bool,
    pub logged_winner: Option<SnakeId>,
    pub replayed_winner: Option<SnakeId>,
    pub logged_lengths: (usize, usize),
    pub replayed_lengths: (usize, usize),
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_ticks: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for match logs
pub struct ReplayEngine {
    resolver: Resolver,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine using the rules of the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            resolver: Resolver::new(config.rules),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-resolves one tick from `previous` and compares it with the logged outcome
    pub fn replay_tick(
        &self,
        previous: &GameState,
        tick: u32,
        dir1: Direction,
        dir2: Direction,
        logged: &GameState,
        logged_winner: Option<SnakeId>,
    ) -> ReplayResult {
        // A relocated pip is the only random input; feed the logged position back
        let mut pips = if logged.pip != previous.pip {
            ScriptedPipSource::new([logged.pip])
        } else {
            ScriptedPipSource::default()
        };

        let resolution = self
            .resolver
            .resolve(previous, Some(dir1), Some(dir2), &mut pips);
        let matches = resolution.state == *logged && resolution.winner == logged_winner;

        let result = ReplayResult {
            tick,
            dir1,
            dir2,
            matches,
            logged_winner,
            replayed_winner: resolution.winner,
            logged_lengths: logged.lengths(),
            replayed_lengths: resolution.state.lengths(),
        };

        if self.verbose {
            if matches {
                info!("Tick {}: ✓ MATCH - {}/{}", tick, dir1, dir2);
            } else {
                warn!(
                    "Tick {}: ✗ MISMATCH - lengths {:?} vs {:?}, winner {:?} vs {:?}",
                    tick,
                    result.logged_lengths,
                    result.replayed_lengths,
                    logged_winner,
                    resolution.winner
                );
            }
        }

        result
    }

    /// Replays every tick in a log. The first entry must be the start record.
    pub fn replay_all(&self, entries: &[LogEntry]) -> Result<Vec<ReplayResult>, String> {
        let mut previous = match entries.first() {
            Some(LogEntry::Start { state, .. }) => state.clone(),
            Some(_) => return Err("Log does not begin with a start record".to_string()),
            None => return Err("Log is empty".to_string()),
        };

        let mut results = Vec::new();
        for entry in &entries[1..] {
            match entry {
                LogEntry::Tick {
                    tick,
                    dir1,
                    dir2,
                    state,
                    winner,
                    ..
                } => {
                    results.push(self.replay_tick(&previous, *tick, *dir1, *dir2, state, *winner));
                    // Continue from the logged state so one mismatch does not cascade
                    previous = state.clone();
                }
                LogEntry::Start { .. } => {
                    warn!("Ignoring extra start record");
                }
            }
        }

        Ok(results)
    }

    /// Replays the log and keeps only the requested ticks
    pub fn replay_ticks(
        &self,
        entries: &[LogEntry],
        tick_numbers: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let results = self.replay_all(entries)?;
        for tick in tick_numbers {
            if !results.iter().any(|r| r.tick == *tick) {
                return Err(format!("Tick {} not found in log file", tick));
            }
        }
        Ok(results
            .into_iter()
            .filter(|r| tick_numbers.contains(&r.tick))
            .collect())
    }

    /// Checks that a snake moved in one of the acceptable directions on given ticks
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        id: SnakeId,
        expected_moves: &[(u32, Vec<Direction>)],
    ) -> Result<(), String> {
        for (tick, acceptable) in expected_moves {
            let actual = entries
                .iter()
                .find_map(|e| match e {
                    LogEntry::Tick {
                        tick: t,
                        dir1,
                        dir2,
                        ..
                    } if t == tick => Some(match id {
                        SnakeId::One => *dir1,
                        SnakeId::Two => *dir2,
                    }),
                    _ => None,
                })
                .ok_or_else(|| format!("Tick {} not found in log", tick))?;

            if !acceptable.contains(&actual) {
                return Err(format!(
                    "Tick {}: Expected one of {:?}, but got {}",
                    tick,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual
                ));
            }
        }

        Ok(())
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_ticks = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_ticks - matches;
        let match_rate = if total_ticks > 0 {
            (matches as f64 / total_ticks as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_ticks,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Ticks:    {}", stats.total_ticks);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Tick {}: {}/{} lengths {:?} → {:?}, winner {:?} → {:?}",
                    result.tick,
                    result.dir1,
                    result.dir2,
                    result.logged_lengths,
                    result.replayed_lengths,
                    result.logged_winner,
                    result.replayed_winner
                );
            }
            println!();
        }
    }
}
