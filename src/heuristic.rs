// Single-ply heuristic
//
// Scores each non-reversing direction with a weighted cost and picks the cheapest.
// Distances are plain Manhattan distances even though the grid wraps: wrapped
// distance makes the snake oscillate between equivalent routes around the torus.

use crate::config::HeuristicConfig;
use crate::types::{Direction, GameState, SnakeId};

/// Cost-based move chooser, also used by the search engine to break ties
#[derive(Debug, Clone)]
pub struct Heuristic {
    weights: HeuristicConfig,
}

impl Heuristic {
    pub fn new(weights: HeuristicConfig) -> Self {
        Heuristic { weights }
    }

    /// Cost of moving snake `id` in `direction` from the current state (lower is better)
    pub fn score_move(&self, state: &GameState, id: SnakeId, direction: Direction) -> u32 {
        let w = &self.weights;
        let me = state.snake(id);
        let opponent = state.snake(id.opponent());
        let new_head = direction.apply(&me.head(), &state.dims);

        let distance = new_head.manhattan(&state.pip);
        let self_hit = me.trailing_index(&new_head).is_some();
        let opponent_hit = opponent.occupies(&new_head);
        let danger = state.last_pip_owner != id
            && new_head.manhattan(&opponent.head()) < w.danger_radius;

        w.k_distance * distance
            + w.k_self_hit * u32::from(self_hit)
            + w.k_opponent_hit * u32::from(opponent_hit)
            + w.k_danger * u32::from(danger)
    }

    /// Cheapest of `candidates`; earlier entries win ties.
    /// Falls back to the current heading if `candidates` is empty.
    pub fn choose(&self, state: &GameState, id: SnakeId, candidates: &[Direction]) -> Direction {
        let mut best: Option<(u32, Direction)> = None;
        for &direction in candidates {
            let cost = self.score_move(state, id, direction);
            match best {
                Some((best_cost, _)) if best_cost <= cost => {}
                _ => best = Some((cost, direction)),
            }
        }
        best.map(|(_, d)| d)
            .unwrap_or_else(|| state.snake(id).direction)
    }

    /// Cheapest of straight ahead and the two turns
    pub fn choose_move(&self, state: &GameState, id: SnakeId) -> Direction {
        let candidates = state.snake(id).direction.candidates();
        self.choose(state, id, &candidates)
    }
}
