//! Memoryless player.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::AutoPlayer;
use memora_engine::snapshot::Snapshot;

/// Picks uniformly among the cards a selection would be accepted for.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: ChaCha20Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl AutoPlayer for RandomPlayer {
    fn choose(&mut self, snapshot: &Snapshot) -> Option<usize> {
        let options = snapshot.selectable();
        if options.is_empty() {
            return None;
        }
        Some(options[self.rng.random_range(0..options.len())])
    }

    fn name(&self) -> &str {
        "random"
    }
}
