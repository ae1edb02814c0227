//! `deal`: one seeded board, printed face up.

use crate::commands::load_config;
use crate::error::CliError;
use crate::formatters::format_layout;
use memora_engine::config::Timing;
use memora_engine::deck::Dealer;
use memora_engine::game::GameState;
use memora_engine::snapshot::Snapshot;
use std::io::Write;

pub fn handle_deal_command(
    seed: Option<u64>,
    kinds: Option<String>,
    columns: usize,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = load_config(kinds.as_deref())?;
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let board = Dealer::new_with_seed(seed).deal(&cfg.card_kinds())?;
    let snapshot = Snapshot::of(&GameState::new(board, None, Timing::default()));

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "{}", format_layout(&snapshot, columns))?;
    Ok(())
}
