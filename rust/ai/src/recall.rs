//! Player with perfect memory of every card it has seen face up.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::AutoPlayer;
use memora_engine::snapshot::Snapshot;

/// Completes a known pair whenever it can and otherwise explores cards it has
/// not seen yet. Never selects a card it knows cannot match the open one
/// unless nothing else is left.
#[derive(Debug, Clone)]
pub struct RecallPlayer {
    rng: ChaCha20Rng,
    seen: BTreeMap<usize, String>,
}

impl RecallPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seen: BTreeMap::new(),
        }
    }

    /// Positions whose kind has been observed.
    pub fn known(&self) -> usize {
        self.seen.len()
    }

    fn pick_random(&mut self, options: &[usize]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        Some(options[self.rng.random_range(0..options.len())])
    }

    fn partner_of(&self, position: usize, options: &[usize]) -> Option<usize> {
        let kind = self.seen.get(&position)?;
        options
            .iter()
            .copied()
            .find(|p| *p != position && self.seen.get(p) == Some(kind))
    }
}

impl AutoPlayer for RecallPlayer {
    fn choose(&mut self, snapshot: &Snapshot) -> Option<usize> {
        self.observe(snapshot);
        let options = snapshot.selectable();
        let unseen: Vec<usize> = options
            .iter()
            .copied()
            .filter(|p| !self.seen.contains_key(p))
            .collect();

        // one open card: finish it if its partner is known
        if let [open] = snapshot.flipped()[..] {
            if let Some(partner) = self.partner_of(open, &options) {
                return Some(partner);
            }
            return self.pick_random(&unseen).or_else(|| options.first().copied());
        }

        // nothing open (or a mismatched pair still showing): cash in a known pair first
        for &p in &options {
            if self.partner_of(p, &options).is_some() {
                return Some(p);
            }
        }
        self.pick_random(&unseen).or_else(|| options.first().copied())
    }

    fn observe(&mut self, snapshot: &Snapshot) {
        for card in &snapshot.cards {
            if card.is_inactive {
                self.seen.remove(&card.position);
            } else if let Some(kind) = card.visible_kind() {
                self.seen.insert(card.position, kind.name.clone());
            }
        }
    }

    fn reset(&mut self) {
        self.seen.clear();
    }

    fn name(&self) -> &str {
        "recall"
    }
}
