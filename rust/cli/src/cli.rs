//! Command-line surface of the `memora` binary.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "memora",
    version,
    about = "Memora memory matching game",
    long_about = None
)]
pub struct MemoraCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a game in the terminal
    Play {
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the reveal and conceal delays
        #[arg(long)]
        instant: bool,
        /// Append a record of every completed game to this JSONL file
        #[arg(long)]
        log: Option<String>,
        #[arg(long)]
        score_file: Option<String>,
        /// Comma separated kind names, e.g. "owl,cat,dog"
        #[arg(long)]
        kinds: Option<String>,
    },
    /// Deal one board and print it face up
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        kinds: Option<String>,
        #[arg(long, default_value_t = crate::formatters::DEFAULT_COLUMNS)]
        columns: usize,
    },
    /// Let an automated player finish games and summarise the move counts
    Sim {
        #[arg(long, default_value_t = 100)]
        games: u32,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "recall", value_parser = clap::builder::PossibleValuesParser::new(memora_ai::AI_TYPES.iter().copied()))]
        ai: String,
        /// Write one game record per line to this JSONL file
        #[arg(long)]
        output: Option<String>,
    },
    /// Summarise a JSONL file of game records
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show or reset the stored best score
    Best {
        #[arg(long)]
        reset: bool,
        #[arg(long)]
        score_file: Option<String>,
    },
    /// Print the resolved configuration and where each value came from
    Cfg,
}

/// Subcommand names, for the usage hint printed on parse errors.
pub const COMMANDS: &[&str] = &["play", "deal", "sim", "stats", "best", "cfg"];
