mod dungeon_builder;

pub(crate) use dungeon_builder::DungeonBuilder;
pub use dungeon_builder::{ConnectivityMode, DungeonBuilderConfig};

use rand::{
    Rng, SeedableRng,
    rngs::{StdRng, ThreadRng},
};

/// The only source of nondeterminism in a generation run. Replaying the same
/// sequence of values reproduces the same dungeon.
pub trait RandomSource {
    /// A uniform integer in `min..=max`.
    fn next_int(&mut self, min: u32, max: u32) -> u32;

    /// A uniform index into a collection of `len` items. `len` must not be zero.
    fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "Cannot pick from an empty collection");
        let max = u32::try_from(len.saturating_sub(1)).unwrap_or(u32::MAX);
        self.next_int(0, max) as usize
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_int(&mut self, min: u32, max: u32) -> u32 {
        (**self).next_int(min, max)
    }
}

/// [RandomSource] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_int(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }

        self.rng.random_range(min..=max)
    }
}

/// Replays a fixed list of values, cycling once it runs out. Each value is
/// clamped into the requested range, so `ScriptedRandom::constant(0)` always
/// answers with the lower bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedRandom {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<u32>) -> Self {
        ScriptedRandom { values, cursor: 0 }
    }

    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }

    /// How many values have been drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_int(&mut self, min: u32, max: u32) -> u32 {
        if self.values.is_empty() {
            return min;
        }

        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;

        value.clamp(min, max.max(min))
    }
}
