// Pip placement sources
//
// The resolver never touches a global RNG. Whoever drives it hands in a PipSource:
// the match owns a seeded RNG source, search branches use a deterministic one,
// and replays feed back the positions recorded in a log.

use log::warn;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::types::Position;

/// Chooses where the next pip appears
pub trait PipSource {
    /// Picks one of `free` (cells covered by neither snake).
    /// Returns None only when `free` is empty.
    fn place(&mut self, free: &[Position]) -> Option<Position>;
}

/// Uniform random placement backed by any rand RNG
#[derive(Debug, Clone)]
pub struct RngPipSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngPipSource<R> {
    pub fn new(rng: R) -> Self {
        RngPipSource { rng }
    }
}

impl RngPipSource<StdRng> {
    /// Reproducible source for a given match seed
    pub fn seeded(seed: u64) -> Self {
        RngPipSource::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PipSource for RngPipSource<R> {
    fn place(&mut self, free: &[Position]) -> Option<Position> {
        free.choose(&mut self.rng).copied()
    }
}

/// Always takes the first free cell. Used inside search so that exploring
/// branches never consumes the match RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFreeCell;

impl PipSource for FirstFreeCell {
    fn place(&mut self, free: &[Position]) -> Option<Position> {
        free.first().copied()
    }
}

/// Replays a fixed sequence of pip positions
#[derive(Debug, Clone, Default)]
pub struct ScriptedPipSource {
    queue: VecDeque<Position>,
}

impl ScriptedPipSource {
    pub fn new<I: IntoIterator<Item = Position>>(positions: I) -> Self {
        ScriptedPipSource {
            queue: positions.into_iter().collect(),
        }
    }

    pub fn push(&mut self, pos: Position) {
        self.queue.push_back(pos);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl PipSource for ScriptedPipSource {
    fn place(&mut self, free: &[Position]) -> Option<Position> {
        match self.queue.pop_front() {
            Some(pos) if free.contains(&pos) => Some(pos),
            Some(pos) => {
                warn!("Scripted pip {:?} is occupied, falling back to first free cell", pos);
                free.first().copied()
            }
            None => free.first().copied(),
        }
    }
}
