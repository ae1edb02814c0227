//! `best`: show or clear the stored best score.

use crate::commands::load_config;
use crate::error::CliError;
use crate::formatters::format_best;
use memora_engine::store::{FileStore, ScoreStore};
use std::io::Write;

pub fn handle_best_command(
    reset: bool,
    score_file: Option<String>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let path = match score_file {
        Some(p) => p,
        None => load_config(None)?.score_file,
    };
    let mut store = FileStore::new(&path);
    if reset {
        store.clear()?;
        writeln!(out, "Best score cleared ({})", path)?;
        return Ok(());
    }
    let best = store.load_best_score()?;
    writeln!(out, "Best: {} ({})", format_best(best), path)?;
    Ok(())
}
