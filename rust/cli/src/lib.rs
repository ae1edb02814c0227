//! # Memora CLI Library
//!
//! Command-line front end for the Memora memory matching engine: play in the
//! terminal, inspect deals, run automated players and summarise game logs.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line
//! arguments and executes the appropriate subcommand.
//!
//! ## Available Subcommands
//!
//! - `play`: Play a game interactively, one card number per line
//! - `deal`: Deal a single board face up for inspection
//! - `sim`: Let an automated player finish many games
//! - `stats`: Aggregate statistics from JSONL game records
//! - `best`: Show or reset the stored best score
//! - `cfg`: Display the resolved configuration

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
#[macro_use]
mod macros;
pub mod ui;

use cli::{COMMANDS, Commands, MemoraCli};
use commands::{
    PlayOptions, handle_best_command, handle_cfg_command, handle_deal_command,
    handle_play_command, handle_sim_command, handle_stats_command,
};

pub use error::CliError;

/// Parses `args` and runs the selected subcommand.
///
/// Returns the process exit code: [`exit_code::SUCCESS`],
/// [`exit_code::ERROR`] or [`exit_code::INTERRUPTED`].
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["memora", "deal", "--seed", "42"];
/// let code = memora_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match MemoraCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                if write!(out, "{}", e).is_err() {
                    return exit_code::ERROR;
                }
                return exit_code::SUCCESS;
            }
            write_or_exit!(err, "{}", e);
            write_or_exit!(err, "Memora memory matching game");
            write_or_exit!(err, "Usage: memora <command> [options]\n");
            write_or_exit!(err, "Commands:");
            for c in COMMANDS {
                write_or_exit!(err, "  {}", c);
            }
            write_or_exit!(err, "\nFor full help, run: memora --help");
            return exit_code::ERROR;
        }
    };

    let result = match cli.cmd {
        Commands::Play {
            seed,
            instant,
            log,
            score_file,
            kinds,
        } => {
            // Use stdin for real input (supports both TTY and piped stdin)
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            let opts = PlayOptions {
                seed,
                instant,
                log,
                score_file,
                kinds,
            };
            handle_play_command(opts, out, err, &mut stdin_lock)
        }
        Commands::Deal {
            seed,
            kinds,
            columns,
        } => handle_deal_command(seed, kinds, columns, out),
        Commands::Sim {
            games,
            seed,
            ai,
            output,
        } => handle_sim_command(games, seed, ai, output, out, err),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Best { reset, score_file } => handle_best_command(reset, score_file, out),
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(msg)) => {
            let _ = ui::display_warning(err, &msg);
            exit_code::INTERRUPTED
        }
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}
