//! Terminal rendering of a game snapshot.
//!
//! Positions are shown 1-based; the engine itself is 0-based.
//!
//! ```rust
//! use memora_cli::formatters::format_board;
//! use memora_engine::config::GameConfig;
//! use memora_engine::engine::Engine;
//!
//! let engine = Engine::in_memory(GameConfig::with_seed(1)).unwrap();
//! let grid = format_board(&engine.snapshot(), 4);
//! assert_eq!(grid.lines().count(), 3);
//! assert!(grid.contains(" 1:?"));
//! ```

use memora_engine::snapshot::{CardView, Snapshot};

/// Columns used by `play` and `deal`.
pub const DEFAULT_COLUMNS: usize = 4;

const FACE_DOWN: &str = "?";
const CLEARED: &str = "--";

/// One card cell: its kind when face up, `--` once matched, `?` otherwise.
pub fn format_card(card: &CardView) -> String {
    if card.is_inactive {
        CLEARED.to_string()
    } else if let Some(kind) = card.visible_kind() {
        kind.name.clone()
    } else {
        FACE_DOWN.to_string()
    }
}

fn cell_width(snapshot: &Snapshot) -> usize {
    snapshot
        .cards
        .iter()
        .map(|c| c.kind.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(CLEARED.len())
}

/// The board as a grid of `columns` cells per row.
pub fn format_board(snapshot: &Snapshot, columns: usize) -> String {
    let columns = columns.max(1);
    let width = cell_width(snapshot);
    let label_width = snapshot.cards.len().to_string().len();
    snapshot
        .cards
        .chunks(columns)
        .map(|row| {
            row.iter()
                .map(|card| {
                    format!(
                        "{:>lw$}:{:<w$}",
                        card.position + 1,
                        format_card(card),
                        lw = label_width,
                        w = width
                    )
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every card face up, for `deal`.
pub fn format_layout(snapshot: &Snapshot, columns: usize) -> String {
    let mut open = snapshot.clone();
    for card in &mut open.cards {
        card.is_flipped = true;
        card.is_inactive = false;
    }
    format_board(&open, columns)
}

pub fn format_best(best: Option<u32>) -> String {
    best.map_or_else(|| "-".to_string(), |b| b.to_string())
}

/// `Moves: 3  Best: 6`
pub fn format_status(snapshot: &Snapshot) -> String {
    format!(
        "Moves: {}  Best: {}",
        snapshot.move_count,
        format_best(snapshot.best_score)
    )
}
