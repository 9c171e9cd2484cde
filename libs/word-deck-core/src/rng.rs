//! Seedable random word selection.
//!
//! The deck draws its refill words from a ChaCha8 stream so that a session
//! started with the same seed and the same gestures replays identically.

use crate::types::{StudySet, WordEntry, WordId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG used to refill deck slots.
#[derive(Clone, Debug)]
pub struct DeckRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DeckRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the thread-local generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pick a word uniformly from `set`, rejecting `exclude`.
    ///
    /// Returns `None` when no entry other than `exclude` exists. Otherwise the
    /// rejection loop terminates because at least one index is acceptable.
    pub fn pick_excluding<'a>(
        &mut self,
        set: &'a StudySet,
        exclude: Option<&WordId>,
    ) -> Option<&'a WordEntry> {
        let available = match exclude {
            Some(word) if set.contains(word) => set.len() - 1,
            _ => set.len(),
        };
        if available == 0 {
            return None;
        }

        loop {
            let entry = set.get(self.inner.gen_range(0..set.len()))?;
            if Some(&entry.word) != exclude {
                return Some(entry);
            }
        }
    }
}
