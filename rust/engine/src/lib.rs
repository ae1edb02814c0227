//! # memora-engine: Memory Matching Game Core
//!
//! Deals a shuffled board of paired cards and runs the reveal / compare /
//! conceal cycle of a concentration game, counting moves and keeping the
//! lowest move count across sessions.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card kinds and the default six-animal set
//! - [`deck`] - Board construction with an unbiased seeded shuffle
//! - [`game`] - Game state and the pure transition function
//! - [`timer`] - Virtual-clock timers for evaluation and concealment delays
//! - [`engine`] - Session owner applying transitions, timers and persistence
//! - [`snapshot`] - Read-only view for rendering
//! - [`events`] - Notifications for the presentation layer
//! - [`store`] - Best-score persistence port
//! - [`config`] - Kind set, seed and timing
//! - [`logger`] - JSONL records of completed games
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use memora_engine::config::GameConfig;
//! use memora_engine::engine::Engine;
//!
//! let mut engine = Engine::in_memory(GameConfig::with_seed(42)).unwrap();
//! assert_eq!(engine.board().len(), 12);
//!
//! // play every pair in board order
//! for kind in engine.kinds().to_vec() {
//!     let pair = engine.board().positions_of(&kind.name);
//!     engine.select_card(pair[0]).unwrap();
//!     engine.select_card(pair[1]).unwrap();
//!     engine.settle();
//! }
//! assert!(engine.is_game_complete());
//! assert_eq!(engine.best_score(), Some(6));
//! ```
//!
//! ## Deterministic Deals
//!
//! ```rust
//! use memora_engine::cards::default_kinds;
//! use memora_engine::deck::Dealer;
//!
//! let a = Dealer::new_with_seed(9).deal(&default_kinds()).unwrap();
//! let b = Dealer::new_with_seed(9).deal(&default_kinds()).unwrap();
//! assert_eq!(a, b);
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod game;
pub mod logger;
pub mod snapshot;
pub mod store;
pub mod timer;
