use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cards::{default_kinds, CardKind};
use crate::deck::validate_kinds;
use crate::errors::DeckError;

pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_CONCEAL_DELAY: Duration = Duration::from_millis(500);

/// Presentation-timing delays. Not logic-essential, so both are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Wait between the second reveal and pair evaluation
    pub reveal_delay: Duration,
    /// How long a mismatched pair stays face up
    pub conceal_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
            conceal_delay: DEFAULT_CONCEAL_DELAY,
        }
    }
}

impl Timing {
    /// Zero delays; timers still exist but fire on the next clock advance.
    pub fn instant() -> Self {
        Self {
            reveal_delay: Duration::ZERO,
            conceal_delay: Duration::ZERO,
        }
    }
}

/// Everything needed to construct an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Distinct kinds dealt in pairs
    pub kinds: Vec<CardKind>,
    /// Dealer seed; `None` seeds from entropy
    pub seed: Option<u64>,
    pub timing: Timing,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            kinds: default_kinds(),
            seed: None,
            timing: Timing::default(),
        }
    }
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), DeckError> {
        validate_kinds(&self.kinds)
    }
}
