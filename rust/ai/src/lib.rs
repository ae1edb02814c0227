//! # memora-ai: Automated Players
//!
//! Strategies that pick cards from a [`Snapshot`] the same way a person would,
//! seeing only face-up cards. Used by the simulator and for tests that need
//! whole games played out.
//!
//! ## Core Components
//!
//! - [`AutoPlayer`] - Trait every strategy implements
//! - [`random`] - Picks any selectable card
//! - [`recall`] - Remembers every card it has seen
//! - [`create_ai`] - Factory by name
//! - [`play_game`] - Drives an engine to completion with a strategy
//!
//! ## Quick Start
//!
//! ```rust
//! use memora_ai::{create_ai, play_game};
//! use memora_engine::config::GameConfig;
//! use memora_engine::engine::Engine;
//!
//! let mut engine = Engine::in_memory(GameConfig::with_seed(42)).unwrap();
//! let mut ai = create_ai("recall", 7).expect("known strategy");
//! let moves = play_game(&mut engine, ai.as_mut(), 10_000).expect("finishes");
//! assert!(moves >= 6);
//! ```

use memora_engine::engine::Engine;
use memora_engine::snapshot::Snapshot;

pub mod random;
pub mod recall;

/// Names accepted by [`create_ai`].
pub const AI_TYPES: &[&str] = &["random", "recall"];

/// A card-picking strategy.
pub trait AutoPlayer: Send {
    /// Position to select next, or `None` when nothing is selectable.
    fn choose(&mut self, snapshot: &Snapshot) -> Option<usize>;

    /// Sees the board after a selection. Strategies without memory ignore it.
    fn observe(&mut self, _snapshot: &Snapshot) {}

    /// Forgets everything learned about the current board.
    fn reset(&mut self) {}

    fn name(&self) -> &str;
}

/// Creates a strategy by name, seeded for reproducible tie-breaking.
///
/// ```rust
/// use memora_ai::create_ai;
///
/// assert_eq!(create_ai("random", 1).unwrap().name(), "random");
/// assert!(create_ai("psychic", 1).is_none());
/// ```
pub fn create_ai(ai_type: &str, seed: u64) -> Option<Box<dyn AutoPlayer>> {
    match ai_type {
        "random" => Some(Box::new(random::RandomPlayer::new(seed))),
        "recall" => Some(Box::new(recall::RecallPlayer::new(seed))),
        _ => None,
    }
}

/// Plays the engine's current board until it is complete, settling every
/// timer between selections.
///
/// Returns the final move count, or `None` if the game is not finished after
/// `max_selections` selections.
pub fn play_game(
    engine: &mut Engine,
    player: &mut dyn AutoPlayer,
    max_selections: usize,
) -> Option<u32> {
    player.reset();
    for _ in 0..max_selections {
        let snapshot = engine.snapshot();
        player.observe(&snapshot);
        if snapshot.is_game_complete {
            return Some(snapshot.move_count);
        }
        let position = player.choose(&snapshot)?;
        let _ = engine.select_card(position);
        player.observe(&engine.snapshot());
        engine.settle();
    }
    engine.is_game_complete().then(|| engine.move_count())
}
