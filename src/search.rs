// Bounded-depth simultaneous-move search
//
// Every ply expands the 3x3 product of both snakes' non-reversing moves. A branch
// that ends the match at ply `d` is credited with 9^(max_depth - d), the number of
// leaves it would have spawned had the search continued, so decided branches stay
// comparable with branches that run to the horizon. Each branch resolves its own
// copy of the state with a deterministic pip source; nothing is shared between
// branches, which is what lets the top level run on the rayon pool.

use log::debug;
use rayon::prelude::*;
use std::ops::Add;

use crate::config::SearchConfig;
use crate::heuristic::Heuristic;
use crate::pip::FirstFreeCell;
use crate::resolver::Resolver;
use crate::types::{Direction, GameState, SnakeId};

/// Branching factor of one ply (3 moves per snake)
const PLY_BRANCHES: i64 = 9;

/// Accumulated (mine, theirs) scores for a subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScorePair {
    pub mine: i64,
    pub theirs: i64,
}

impl ScorePair {
    pub fn net(&self) -> i64 {
        self.mine - self.theirs
    }
}

impl Add for ScorePair {
    type Output = ScorePair;

    fn add(self, other: ScorePair) -> ScorePair {
        ScorePair {
            mine: self.mine + other.mine,
            theirs: self.theirs + other.theirs,
        }
    }
}

/// Full result of one search, for logging and analysis
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub direction: Direction,
    /// Net score per top-level move, in candidate order
    pub scores: Vec<(Direction, i64)>,
    /// Whether the heuristic had to break a tie
    pub tie_broken: bool,
    /// Number of resolved branches
    pub nodes: u64,
    pub depth: u8,
}

pub struct SearchEngine {
    resolver: Resolver,
    heuristic: Heuristic,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(resolver: Resolver, heuristic: Heuristic, config: SearchConfig) -> Self {
        SearchEngine {
            resolver,
            heuristic,
            config,
        }
    }

    /// Best direction for `me`, searching `max_depth` plies (clamped to the configured cap)
    pub fn choose_move(&self, state: &GameState, me: SnakeId, max_depth: u8) -> Direction {
        self.analyze(state, me, max_depth).direction
    }

    /// Runs the search and returns the per-move aggregates alongside the choice
    pub fn analyze(&self, state: &GameState, me: SnakeId, max_depth: u8) -> SearchReport {
        let depth = self.config.clamp_depth(max_depth);
        let mine = state.snake(me).direction.candidates();
        let theirs = state.snake(me.opponent()).direction.candidates();

        let pairs: Vec<(Direction, Direction)> = mine
            .iter()
            .flat_map(|&m| theirs.iter().map(move |&t| (m, t)))
            .collect();

        let evaluate = |&(m, t): &(Direction, Direction)| {
            let (score, nodes) = self.explore(state, me, m, t, 1, depth);
            (m, score, nodes)
        };

        let results: Vec<(Direction, ScorePair, u64)> = if self.config.parallel {
            pairs.par_iter().map(evaluate).collect()
        } else {
            pairs.iter().map(evaluate).collect()
        };

        let nodes: u64 = results.iter().map(|(_, _, n)| n).sum();
        let scores: Vec<(Direction, i64)> = mine
            .iter()
            .map(|&m| {
                let net = results
                    .iter()
                    .filter(|(d, _, _)| *d == m)
                    .map(|(_, score, _)| score.net())
                    .sum();
                (m, net)
            })
            .collect();

        let best = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
        let tied: Vec<Direction> = scores
            .iter()
            .filter(|(_, s)| *s == best)
            .map(|(d, _)| *d)
            .collect();

        let tie_broken = tied.len() > 1;
        let direction = match tied.as_slice() {
            [only] => *only,
            _ => self.heuristic.choose(state, me, &tied),
        };

        debug!(
            "Search for {} at depth {}: {:?} -> {} ({} nodes)",
            me, depth, scores, direction, nodes
        );

        SearchReport {
            direction,
            scores,
            tie_broken,
            nodes,
            depth,
        }
    }

    /// Resolves one move pair and scores the subtree below it
    fn explore(
        &self,
        state: &GameState,
        me: SnakeId,
        my_move: Direction,
        their_move: Direction,
        depth: u8,
        max_depth: u8,
    ) -> (ScorePair, u64) {
        let (dir1, dir2) = match me {
            SnakeId::One => (my_move, their_move),
            SnakeId::Two => (their_move, my_move),
        };
        let resolution = self
            .resolver
            .resolve(state, Some(dir1), Some(dir2), &mut FirstFreeCell);

        if let Some(winner) = resolution.winner {
            let weight = PLY_BRANCHES.pow(u32::from(max_depth - depth));
            let score = if winner == me {
                ScorePair { mine: weight, theirs: 0 }
            } else {
                ScorePair { mine: 0, theirs: weight }
            };
            return (score, 1);
        }

        if depth >= max_depth {
            return (ScorePair::default(), 1);
        }

        let next = resolution.state;
        let mine = next.snake(me).direction.candidates();
        let theirs = next.snake(me.opponent()).direction.candidates();

        let mut total = ScorePair::default();
        let mut nodes = 1;
        for &m in &mine {
            for &t in &theirs {
                let (score, count) = self.explore(&next, me, m, t, depth + 1, max_depth);
                total = total + score;
                nodes += count;
            }
        }
        (total, nodes)
    }
}
