// Configuration module for reading Duel.toml
// This module provides OOP-style configuration management for the duel engine

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::Direction;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub board: BoardConfig,
    pub snakes: SnakesConfig,
    pub timing: TimingConfig,
    pub rules: RulesConfig,
    pub heuristic: HeuristicConfig,
    pub search: SearchConfig,
    pub players: PlayersConfig,
    pub debug: DebugConfig,
    pub tournament: TournamentConfig,
}

/// Grid dimensions
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
}

/// Starting layout of both snakes
#[derive(Debug, Deserialize, Clone)]
pub struct SnakesConfig {
    pub initial_length: usize,
    pub snake1_start: (i32, i32),
    pub snake1_direction: Direction,
    pub snake2_start: (i32, i32),
    pub snake2_direction: Direction,
}

/// Tick pacing
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub tick_period_ms: u64,
    /// Hard cap on match length; reaching it ends the match on length
    pub max_ticks: u32,
}

/// Collision and match-end rules
#[derive(Debug, Deserialize, Clone)]
pub struct RulesConfig {
    /// A snake cut below this length is eliminated
    pub min_survivable_length: usize,
    /// Number of pips in a match; 0 plays until elimination
    pub pip_limit: u32,
}

/// Single-ply heuristic weights
#[derive(Debug, Deserialize, Clone)]
pub struct HeuristicConfig {
    pub k_distance: u32,
    pub k_self_hit: u32,
    pub k_opponent_hit: u32,
    pub k_danger: u32,
    pub danger_radius: u32,
}

/// Search engine parameters
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub max_depth: u8,
    /// Upper bound applied to any requested depth (cost grows as 9^depth)
    pub depth_cap: u8,
    pub parallel: bool,
}

impl SearchConfig {
    /// Clamps a requested depth into `1..=depth_cap`
    pub fn clamp_depth(&self, depth: u8) -> u8 {
        depth.clamp(1, self.depth_cap.max(1))
    }
}

/// Which controller drives each side
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Search,
    Heuristic,
    Human,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlayersConfig {
    pub player1: PlayerKind,
    pub player2: PlayerKind,
}

/// Match log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

/// Batch play settings for the headless runner
#[derive(Debug, Deserialize, Clone)]
pub struct TournamentConfig {
    pub matches: u32,
    pub seed: u64,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Duel.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Duel.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Duel.toml")
    }

    /// Rejects settings the engine cannot play with
    pub fn validate(&self) -> Result<(), String> {
        if self.board.width < 2 || self.board.height < 2 {
            return Err(format!(
                "Board must be at least 2x2, got {}x{}",
                self.board.width, self.board.height
            ));
        }
        if self.snakes.initial_length == 0 {
            return Err("initial_length must be at least 1".to_string());
        }
        if self.snakes.initial_length < self.rules.min_survivable_length {
            return Err(format!(
                "initial_length {} is below min_survivable_length {}",
                self.snakes.initial_length, self.rules.min_survivable_length
            ));
        }
        if self.timing.tick_period_ms == 0 {
            return Err("tick_period_ms must be at least 1".to_string());
        }
        if self.search.depth_cap > 12 {
            return Err(format!(
                "depth_cap {} is too large (search cost grows as 9^depth)",
                self.search.depth_cap
            ));
        }
        Ok(())
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Duel.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig {
                width: 31,
                height: 31,
            },
            snakes: SnakesConfig {
                initial_length: 3,
                snake1_start: (10, 10),
                snake1_direction: Direction::Right,
                snake2_start: (20, 20),
                snake2_direction: Direction::Left,
            },
            timing: TimingConfig {
                tick_period_ms: 100,
                max_ticks: 5000,
            },
            rules: RulesConfig {
                min_survivable_length: 3,
                pip_limit: 20,
            },
            heuristic: HeuristicConfig {
                k_distance: 1,
                k_self_hit: 10,
                k_opponent_hit: 1000,
                k_danger: 100,
                danger_radius: 3,
            },
            search: SearchConfig {
                max_depth: 1,
                depth_cap: 6,
                parallel: false,
            },
            players: PlayersConfig {
                player1: PlayerKind::Search,
                player2: PlayerKind::Heuristic,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "duel_match.jsonl".to_string(),
            },
            tournament: TournamentConfig {
                matches: 10,
                seed: 1,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: Could not load Duel.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.search.max_depth, 1);
        assert_eq!(config.heuristic.k_opponent_hit, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duel_toml_can_be_parsed() {
        let result = Config::from_file("Duel.toml");
        assert!(result.is_ok(), "Failed to parse Duel.toml: {:?}", result.err());
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Duel.toml").expect("Duel.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        assert_eq!(file_config.board.width, hardcoded.board.width);
        assert_eq!(file_config.board.height, hardcoded.board.height);
        assert_eq!(file_config.snakes.initial_length, hardcoded.snakes.initial_length);
        assert_eq!(file_config.snakes.snake1_start, hardcoded.snakes.snake1_start);
        assert_eq!(file_config.snakes.snake1_direction, hardcoded.snakes.snake1_direction);
        assert_eq!(file_config.snakes.snake2_start, hardcoded.snakes.snake2_start);
        assert_eq!(file_config.snakes.snake2_direction, hardcoded.snakes.snake2_direction);
        assert_eq!(file_config.timing.tick_period_ms, hardcoded.timing.tick_period_ms);
        assert_eq!(file_config.timing.max_ticks, hardcoded.timing.max_ticks);
        assert_eq!(
            file_config.rules.min_survivable_length,
            hardcoded.rules.min_survivable_length
        );
        assert_eq!(file_config.rules.pip_limit, hardcoded.rules.pip_limit);
        assert_eq!(file_config.heuristic.k_distance, hardcoded.heuristic.k_distance);
        assert_eq!(file_config.heuristic.k_self_hit, hardcoded.heuristic.k_self_hit);
        assert_eq!(file_config.heuristic.k_opponent_hit, hardcoded.heuristic.k_opponent_hit);
        assert_eq!(file_config.heuristic.k_danger, hardcoded.heuristic.k_danger);
        assert_eq!(file_config.heuristic.danger_radius, hardcoded.heuristic.danger_radius);
        assert_eq!(file_config.search.max_depth, hardcoded.search.max_depth);
        assert_eq!(file_config.search.depth_cap, hardcoded.search.depth_cap);
        assert_eq!(file_config.search.parallel, hardcoded.search.parallel);
        assert_eq!(file_config.players.player1, hardcoded.players.player1);
        assert_eq!(file_config.players.player2, hardcoded.players.player2);
        assert_eq!(file_config.debug.enabled, hardcoded.debug.enabled);
        assert_eq!(file_config.debug.log_file_path, hardcoded.debug.log_file_path);
        assert_eq!(file_config.tournament.matches, hardcoded.tournament.matches);
        assert_eq!(file_config.tournament.seed, hardcoded.tournament.seed);
    }

    #[test]
    fn test_clamp_depth() {
        let config = Config::default_hardcoded();
        assert_eq!(config.search.clamp_depth(0), 1);
        assert_eq!(config.search.clamp_depth(3), 3);
        assert_eq!(config.search.clamp_depth(40), 6);
    }

    #[test]
    fn test_tiny_board_rejected() {
        let mut config = Config::default_hardcoded();
        config.board.width = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_tick_period_rejected() {
        let mut config = Config::default_hardcoded();
        config.timing.tick_period_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_length_below_survivable_rejected() {
        let mut config = Config::default_hardcoded();
        config.snakes.initial_length = 2;
        let err = config.validate().unwrap_err();
        assert!(err.contains("min_survivable_length"), "unexpected error: {}", err);

        config.rules.min_survivable_length = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
