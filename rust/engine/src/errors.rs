use thiserror::Error;

/// Invalid deck setup. Fatal at construction, never raised mid-game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("At least 2 distinct card kinds are required, got {found}")]
    TooFewKinds { found: usize },
    #[error("Card kind '{name}' is listed more than once")]
    DuplicateKind { name: String },
    #[error("Card kind '{name}' does not appear exactly twice in the layout")]
    UnpairedKind { name: String },
}

/// Failure of the best-score persistence port.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Score storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Score storage is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Score storage poisoned")]
    StoragePoisoned,
    #[error("Score storage unavailable: {0}")]
    Unavailable(String),
}

/// Why a selection or timer was ignored. These are silent no-ops for the
/// presentation layer and are only returned for diagnostics.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("Position {position} is outside the board (size {size})")]
    OutOfRange { position: usize, size: usize },
    #[error("Card at position {position} is already cleared")]
    AlreadyCleared { position: usize },
    #[error("Card at position {position} is already revealed")]
    AlreadyRevealed { position: usize },
    #[error("Input is locked while a pair is evaluated")]
    InputLocked,
    #[error("Game is already complete")]
    GameComplete,
    #[error("Timer fired outside of its phase")]
    StaleTimer,
}
