// Match driver
//
// Owns the authoritative state, the match RNG and both controllers. Each tick asks
// the bots for a direction and calls the resolver exactly once. Rendering and key
// handling live outside; a front end calls `request` for human input and reads
// `state` after every tick.

use log::{debug, info};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::bot::{self, Bot};
use crate::config::Config;
use crate::debug_logger::MatchLogger;
use crate::pip::RngPipSource;
use crate::resolver::Resolver;
use crate::types::{Direction, GameState, SnakeId};

/// Why a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndReason {
    /// A head-on or a fatal cut decided it
    Collision,
    /// The pip limit was reached; longest snake wins
    PipsExhausted,
    /// The tick cap was reached; longest snake wins
    TickLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub winner: SnakeId,
    pub reason: EndReason,
    pub ticks: u32,
    pub lengths: (usize, usize),
}

/// What happened during one driver step
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u32,
    pub dir1: Option<Direction>,
    pub dir2: Option<Direction>,
    pub ate: [bool; 2],
    pub result: Option<MatchResult>,
}

pub struct Match {
    state: GameState,
    resolver: Resolver,
    pips: RngPipSource<StdRng>,
    bots: [Box<dyn Bot>; 2],
    logger: MatchLogger,
    pip_limit: u32,
    max_ticks: u32,
    pips_eaten: u32,
    tick: u32,
    seed: u64,
    result: Option<MatchResult>,
}

impl Match {
    /// Sets up the configured starting position, drawing the first pip from `seed`
    pub fn new(config: &Config, bot1: Box<dyn Bot>, bot2: Box<dyn Bot>, seed: u64) -> Self {
        let mut pips = RngPipSource::seeded(seed);
        let state = GameState::new(config, &mut pips);
        Self::build(state, pips, config, [bot1, bot2], seed)
    }

    /// Starts from an arbitrary position
    pub fn from_state(
        state: GameState,
        config: &Config,
        bot1: Box<dyn Bot>,
        bot2: Box<dyn Bot>,
        seed: u64,
    ) -> Self {
        Self::build(state, RngPipSource::seeded(seed), config, [bot1, bot2], seed)
    }

    fn build(
        state: GameState,
        pips: RngPipSource<StdRng>,
        config: &Config,
        bots: [Box<dyn Bot>; 2],
        seed: u64,
    ) -> Self {
        Match {
            state,
            resolver: Resolver::new(config.rules.clone()),
            pips,
            bots,
            logger: MatchLogger::disabled(),
            pip_limit: config.rules.pip_limit,
            max_ticks: config.timing.max_ticks,
            pips_eaten: 0,
            tick: 0,
            seed,
            result: None,
        }
    }

    /// Attaches a match log and records the starting position
    pub fn with_logger(mut self, logger: MatchLogger) -> Self {
        logger.log_start(self.seed, &self.state);
        self.logger = logger;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    pub fn pips_eaten(&self) -> u32 {
        self.pips_eaten
    }

    /// External (keyboard) input for a side. Reversals are ignored.
    pub fn request(&mut self, id: SnakeId, direction: Direction) {
        self.state.snake_mut(id).request(direction);
    }

    /// Advances the match by one tick
    pub fn tick(&mut self) -> TickReport {
        if let Some(result) = &self.result {
            return TickReport {
                tick: self.tick,
                dir1: None,
                dir2: None,
                ate: [false, false],
                result: Some(result.clone()),
            };
        }

        let dir1 = self.bots[0].choose(&self.state, SnakeId::One);
        let dir2 = self.bots[1].choose(&self.state, SnakeId::Two);

        let resolution = self.resolver.resolve(&self.state, dir1, dir2, &mut self.pips);
        self.state = resolution.state;
        self.tick += 1;
        self.pips_eaten += resolution.ate.iter().filter(|&&a| a).count() as u32;

        debug!(
            "Tick {}: {:?}/{:?} lengths {:?} pip {:?}",
            self.tick,
            dir1,
            dir2,
            self.state.lengths(),
            self.state.pip
        );
        self.logger.log_tick(self.tick, &self.state, resolution.winner);

        let result = if let Some(winner) = resolution.winner {
            Some(self.finish(winner, EndReason::Collision))
        } else if self.pip_limit > 0 && self.pips_eaten >= self.pip_limit {
            Some(self.finish(self.leader(), EndReason::PipsExhausted))
        } else if self.tick >= self.max_ticks {
            Some(self.finish(self.leader(), EndReason::TickLimit))
        } else {
            None
        };

        self.result = result.clone();
        TickReport {
            tick: self.tick,
            dir1,
            dir2,
            ate: resolution.ate,
            result,
        }
    }

    /// Ticks as fast as possible until the match ends
    pub fn run(&mut self) -> MatchResult {
        loop {
            if let Some(result) = self.tick().result {
                return result;
            }
        }
    }

    /// Ticks once per `period` until the match ends
    pub async fn run_paced(&mut self, period: Duration) -> MatchResult {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Some(result) = self.tick().result {
                return result;
            }
        }
    }

    /// Longer snake, or the last pip owner when lengths are equal
    fn leader(&self) -> SnakeId {
        let (len1, len2) = self.state.lengths();
        match len1.cmp(&len2) {
            std::cmp::Ordering::Greater => SnakeId::One,
            std::cmp::Ordering::Less => SnakeId::Two,
            std::cmp::Ordering::Equal => self.state.last_pip_owner,
        }
    }

    fn finish(&self, winner: SnakeId, reason: EndReason) -> MatchResult {
        let result = MatchResult {
            winner,
            reason,
            ticks: self.tick,
            lengths: self.state.lengths(),
        };
        info!(
            "Match over after {} ticks: {} ({} vs {}) wins by {:?}, lengths {:?}",
            result.ticks,
            winner,
            self.bots[0].name(),
            self.bots[1].name(),
            reason,
            result.lengths
        );
        result
    }
}

/// Win counts across matches
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    wins: [u32; 2],
    by_collision: u32,
}

impl ScoreBoard {
    pub fn record(&mut self, result: &MatchResult) {
        self.wins[result.winner.index()] += 1;
        if result.reason == EndReason::Collision {
            self.by_collision += 1;
        }
    }

    pub fn wins(&self, id: SnakeId) -> u32 {
        self.wins[id.index()]
    }

    pub fn total(&self) -> u32 {
        self.wins[0] + self.wins[1]
    }

    pub fn by_collision(&self) -> u32 {
        self.by_collision
    }
}

impl fmt::Display for ScoreBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Snake 1: {}  Snake 2: {}  ({} of {} decided by collision)",
            self.wins[0],
            self.wins[1],
            self.by_collision,
            self.total()
        )
    }
}

/// Plays many independent matches on the rayon pool
pub struct Tournament {
    config: Config,
}

impl Tournament {
    pub fn new(config: Config) -> Self {
        Tournament { config }
    }

    /// Plays `matches` games seeded `seed, seed + 1, ...`
    pub fn run(&self, matches: u32, seed: u64) -> ScoreBoard {
        let board = Mutex::new(ScoreBoard::default());
        let players = &self.config.players;

        (0..matches).into_par_iter().for_each(|i| {
            let mut game = Match::new(
                &self.config,
                bot::from_kind(players.player1, &self.config),
                bot::from_kind(players.player2, &self.config),
                seed + u64::from(i),
            );
            let result = game.run();
            board.lock().record(&result);
        });

        let board = board.into_inner();
        info!("Tournament finished: {}", board);
        board
    }
}
