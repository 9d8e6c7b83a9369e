// Match logging module
//
// Writes one JSON object per line: a start record with the initial state, then one
// record per resolved tick. The replay engine reads the same records back.

use log::error;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Arc;

use crate::types::{Direction, GameState, SnakeId};

/// A single line of the match log
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    Start {
        seed: u64,
        state: GameState,
        timestamp: String,
    },
    Tick {
        tick: u32,
        /// Heading each snake actually moved in
        dir1: Direction,
        dir2: Direction,
        /// State after resolution
        state: GameState,
        winner: Option<SnakeId>,
        timestamp: String,
    },
}

/// Shared match logger
/// Uses Arc<Mutex<..>> so clones handed to different owners append to one file
#[derive(Clone)]
pub struct MatchLogger {
    file: Arc<Mutex<Option<BufWriter<File>>>>,
    enabled: bool,
}

impl MatchLogger {
    /// Creates a new logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                log::info!("Match logging enabled: {}", log_file_path);
                MatchLogger {
                    file: Arc::new(Mutex::new(Some(BufWriter::new(file)))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create match log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled logger (no-op)
    pub fn disabled() -> Self {
        MatchLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn log_start(&self, seed: u64, state: &GameState) {
        if !self.enabled {
            return;
        }
        self.write(&LogEntry::Start {
            seed,
            state: state.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    pub fn log_tick(&self, tick: u32, state: &GameState, winner: Option<SnakeId>) {
        if !self.enabled {
            return;
        }
        self.write(&LogEntry::Tick {
            tick,
            dir1: state.snake1.direction,
            dir2: state.snake2.direction,
            state: state.clone(),
            winner,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    fn write(&self, entry: &LogEntry) {
        let mut guard = self.file.lock();
        let Some(writer) = guard.as_mut() else {
            return;
        };

        match serde_json::to_string(entry) {
            Ok(json_line) => {
                if let Err(e) = writeln!(writer, "{}", json_line) {
                    error!("Failed to write match log entry: {}", e);
                } else if let Err(e) = writer.flush() {
                    error!("Failed to flush match log: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize match log entry: {}", e);
            }
        }
    }
}
