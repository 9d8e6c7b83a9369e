// Move resolver
//
// Advances a GameState by one simultaneous tick. Both heads are computed from the
// pre-tick state, so the result does not depend on which snake is processed first.
// Priority order when causes overlap:
//   1. head-to-head (including heads swapping cells): last pip owner wins
//   2. self-hit, then opponent-body hit: the body that was hit is cut at the impact
//   3. pip consumption and normal advance

use log::{debug, warn};

use crate::config::RulesConfig;
use crate::pip::PipSource;
use crate::types::{Direction, GameState, Position, SnakeId};

const BOTH: [SnakeId; 2] = [SnakeId::One, SnakeId::Two];

/// Result of resolving one tick
#[derive(Debug, Clone)]
pub struct Resolution {
    pub state: GameState,
    /// Set when the tick decided the match
    pub winner: Option<SnakeId>,
    /// Which snakes consumed the pip this tick, indexed by `SnakeId::index`
    pub ate: [bool; 2],
    /// Whether the heads met (same cell or swapped cells)
    pub head_on: bool,
}

impl Resolution {
    pub fn ate(&self, id: SnakeId) -> bool {
        self.ate[id.index()]
    }
}

/// Pure tick function parameterised by the collision rules
#[derive(Debug, Clone)]
pub struct Resolver {
    rules: RulesConfig,
}

impl Resolver {
    pub fn new(rules: RulesConfig) -> Self {
        Resolver { rules }
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Resolves one tick.
    ///
    /// # Arguments
    /// * `state` - Pre-tick snapshot (never modified)
    /// * `dir1`, `dir2` - Requested directions; `None` or a reversal keeps the pending heading
    /// * `pips` - Source for the replacement pip when one is eaten
    pub fn resolve(
        &self,
        state: &GameState,
        dir1: Option<Direction>,
        dir2: Option<Direction>,
        pips: &mut dyn PipSource,
    ) -> Resolution {
        let mut next = state.clone();
        let dims = state.dims;
        let owner = state.last_pip_owner;

        for (id, requested) in [(SnakeId::One, dir1), (SnakeId::Two, dir2)] {
            let snake = next.snake_mut(id);
            if let Some(direction) = requested {
                snake.request(direction);
            }
            snake.direction = snake.pending_direction;
        }

        let heads: [Position; 2] = [
            next.snake1.direction.apply(&state.snake1.head(), &dims),
            next.snake2.direction.apply(&state.snake2.head(), &dims),
        ];

        // Heads swapping cells while moving toward each other would pass through
        // without ever sharing one. On a 2-wide board same-heading snakes also
        // swap cells across the wrap; that is not a meeting.
        let skip_over = next.snake1.direction == next.snake2.direction.opposite()
            && heads[0] == state.snake2.head()
            && heads[1] == state.snake1.head();
        let head_on = heads[0] == heads[1] || skip_over;
        let blocked = if head_on {
            debug!(
                "Head-on at {:?} (skip-over: {}), {} keeps priority",
                heads[0], skip_over, owner
            );
            Some(owner.opponent())
        } else {
            None
        };

        let cuts = Self::find_cuts(state, &heads, blocked);

        let mut ate = [false, false];
        for id in BOTH {
            if blocked == Some(id) {
                continue;
            }
            let head = heads[id.index()];
            let snake = next.snake_mut(id);
            snake.body.push_front(head);
            if head == state.pip {
                ate[id.index()] = true;
            } else {
                snake.body.pop_back();
            }
        }

        let mut eliminated = [false, false];
        for id in BOTH {
            let Some(index) = cuts[id.index()] else {
                continue;
            };
            // Advanced bodies gained a head in front of the pre-tick segments
            let keep = if blocked == Some(id) { index } else { index + 1 };
            let body = &mut next.snake_mut(id).body;
            if keep < body.len() {
                debug!("Cutting {} from {} to {} segments", id, body.len(), keep);
                body.truncate(keep);
            }
            eliminated[id.index()] = body.len() < self.rules.min_survivable_length;
        }

        let winner = match (blocked, eliminated) {
            (Some(loser), _) => Some(loser.opponent()),
            (None, [true, true]) => Some(owner),
            (None, [true, false]) => Some(SnakeId::Two),
            (None, [false, true]) => Some(SnakeId::One),
            (None, [false, false]) => None,
        };

        for id in BOTH {
            if ate[id.index()] && !eliminated[id.index()] {
                next.last_pip_owner = id;
            }
        }

        if ate.iter().any(|&a| a) {
            let free = next.free_cells();
            match pips.place(&free) {
                Some(pos) => next.pip = pos,
                None => warn!("No free cell left for a new pip"),
            }
        }

        if let Some(id) = winner {
            debug!("Tick decided: {} wins", id);
        }

        Resolution {
            state: next,
            winner,
            ate,
            head_on,
        }
    }

    /// Where each body gets cut, as an index into its pre-tick body.
    /// A snake that hits itself does not also cut the opponent.
    fn find_cuts(
        state: &GameState,
        heads: &[Position; 2],
        blocked: Option<SnakeId>,
    ) -> [Option<usize>; 2] {
        let mut cuts: [Option<usize>; 2] = [None, None];

        for id in BOTH {
            if blocked == Some(id) {
                continue;
            }
            let head = heads[id.index()];
            let hit = state
                .snake(id)
                .trailing_index(&head)
                .map(|i| (id, i))
                .or_else(|| {
                    let other = id.opponent();
                    state.snake(other).trailing_index(&head).map(|i| (other, i))
                });

            if let Some((victim, index)) = hit {
                debug!("{} hit {} at segment {} ({:?})", id, victim, index, head);
                let slot = &mut cuts[victim.index()];
                *slot = Some(slot.map_or(index, |current| current.min(index)));
            }
        }

        cuts
    }
}
