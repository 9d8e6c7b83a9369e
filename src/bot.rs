// Player controllers
//
// A Bot gets a read-only snapshot and its own id once per tick and answers with a
// direction, or None for "no change requested". Human-driven sides use NullBot and
// feed their key presses to the match directly.

use log::debug;

use crate::config::{Config, PlayerKind};
use crate::heuristic::Heuristic;
use crate::resolver::Resolver;
use crate::search::SearchEngine;
use crate::types::{Direction, GameState, SnakeId};

/// Move-selection contract shared by every controller
pub trait Bot: Send + Sync {
    fn name(&self) -> &'static str;

    fn choose(&self, state: &GameState, me: SnakeId) -> Option<Direction>;
}

/// Placeholder for a side driven purely by external input
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBot;

impl Bot for NullBot {
    fn name(&self) -> &'static str {
        "human"
    }

    fn choose(&self, _state: &GameState, _me: SnakeId) -> Option<Direction> {
        None
    }
}

/// Greedy one-ply controller
pub struct HeuristicBot {
    heuristic: Heuristic,
}

impl HeuristicBot {
    pub fn new(heuristic: Heuristic) -> Self {
        HeuristicBot { heuristic }
    }
}

impl Bot for HeuristicBot {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn choose(&self, state: &GameState, me: SnakeId) -> Option<Direction> {
        Some(self.heuristic.choose_move(state, me))
    }
}

/// Look-ahead controller backed by the search engine
pub struct SearchBot {
    engine: SearchEngine,
    max_depth: u8,
}

impl SearchBot {
    pub fn new(engine: SearchEngine, max_depth: u8) -> Self {
        SearchBot { engine, max_depth }
    }
}

impl Bot for SearchBot {
    fn name(&self) -> &'static str {
        "search"
    }

    fn choose(&self, state: &GameState, me: SnakeId) -> Option<Direction> {
        let report = self.engine.analyze(state, me, self.max_depth);
        if report.tie_broken {
            debug!("{}: search tie among {:?}, heuristic picked {}", me, report.scores, report.direction);
        }
        Some(report.direction)
    }
}

/// Builds the controller configured for a side
pub fn from_kind(kind: PlayerKind, config: &Config) -> Box<dyn Bot> {
    let heuristic = Heuristic::new(config.heuristic.clone());
    match kind {
        PlayerKind::Human => Box::new(NullBot),
        PlayerKind::Heuristic => Box::new(HeuristicBot::new(heuristic)),
        PlayerKind::Search => {
            let engine = SearchEngine::new(
                Resolver::new(config.rules.clone()),
                heuristic,
                config.search.clone(),
            );
            Box::new(SearchBot::new(engine, config.search.max_depth))
        }
    }
}
