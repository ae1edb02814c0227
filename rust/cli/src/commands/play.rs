//! # Play Command
//!
//! Interactive game in the terminal. Each line of input is one action:
//!
//! - a card number (1-based) reveals that card
//! - `r` / `restart` deals a new board, keeping the best score
//! - `q` / `quit` (or end of input) leaves the session
//!
//! Engine time follows the wall clock. After a second pick the command waits
//! out the reveal delay so the result is shown right away; a mismatched pair
//! then stays visible until the conceal delay has passed or the next pick
//! arrives, whichever comes first.

use crate::commands::load_config;
use crate::error::CliError;
use crate::formatters::{DEFAULT_COLUMNS, format_board, format_status};
use crate::io_utils::read_stdin_line;
use crate::ui;
use memora_engine::config::Timing;
use memora_engine::engine::Engine;
use memora_engine::errors::Rejection;
use memora_engine::game::Phase;
use memora_engine::logger::{GameLogger, GameRecord};
use memora_engine::store::FileStore;
use std::io::{BufRead, Write};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub seed: Option<u64>,
    /// Zero delays instead of the configured ones
    pub instant: bool,
    pub log: Option<String>,
    pub score_file: Option<String>,
    pub kinds: Option<String>,
}

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayInput {
    /// Zero-based position
    Pick(usize),
    Restart,
    Quit,
    Invalid(String),
}

/// Parses a line typed at the prompt for a board of `size` cards.
///
/// ```rust
/// use memora_cli::commands::play::{parse_play_input, PlayInput};
///
/// assert_eq!(parse_play_input("3", 12), PlayInput::Pick(2));
/// assert_eq!(parse_play_input("Q", 12), PlayInput::Quit);
/// assert!(matches!(parse_play_input("13", 12), PlayInput::Invalid(_)));
/// ```
pub fn parse_play_input(line: &str, size: usize) -> PlayInput {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "q" | "quit" | "exit" => PlayInput::Quit,
        "r" | "restart" => PlayInput::Restart,
        "" => PlayInput::Invalid("enter a card number".to_string()),
        s => match s.parse::<usize>() {
            Ok(n) if (1..=size).contains(&n) => PlayInput::Pick(n - 1),
            Ok(n) => PlayInput::Invalid(format!("card {} does not exist (1-{})", n, size)),
            Err(_) => PlayInput::Invalid(format!("unrecognised input '{}'", s)),
        },
    }
}

/// Runs an interactive session until the player quits or input ends.
pub fn handle_play_command(
    opts: PlayOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let cfg = load_config(opts.kinds.as_deref())?;
    let mut game = cfg.game_config(opts.seed);
    if opts.instant {
        game.timing = Timing::instant();
    }
    let score_file = opts.score_file.unwrap_or_else(|| cfg.score_file.clone());

    let mut engine = Engine::new(game, Box::new(FileStore::new(&score_file)))?;
    if !engine.is_store_healthy() {
        ui::display_warning(
            err,
            &format!("cannot read {}, best score will not be saved", score_file),
        )?;
    }
    let mut logger = match &opts.log {
        Some(path) => Some(GameLogger::append(path)?),
        None => None,
    };

    writeln!(
        out,
        "play: seed={} cards={} score_file={}",
        engine.seed(),
        engine.board().len(),
        score_file
    )?;
    render(&engine, out)?;

    let mut clock = Instant::now();
    loop {
        if engine.is_game_complete() {
            write!(out, "'r' to play again, 'q' to quit: ")?;
        } else {
            write!(
                out,
                "Pick a card (1-{}), 'r' to restart, 'q' to quit: ",
                engine.board().len()
            )?;
        }
        out.flush()?;

        let Some(line) = read_stdin_line(stdin) else {
            writeln!(out)?;
            break;
        };
        // a pending conceal may have come due while the player was typing
        sync_clock(&mut engine, &mut clock);

        match parse_play_input(&line, engine.board().len()) {
            PlayInput::Quit => break,
            PlayInput::Restart => {
                engine.restart()?;
                clock = Instant::now();
                writeln!(out, "Round {}", engine.round())?;
                render(&engine, out)?;
            }
            PlayInput::Invalid(msg) => ui::display_warning(err, &msg)?,
            PlayInput::Pick(position) => {
                if let Err(reason) = engine.select_card(position) {
                    ui::display_warning(err, &describe_rejection(reason))?;
                    continue;
                }
                if engine.is_input_locked() {
                    render(&engine, out)?;
                    if let Some(wait) = engine.time_until_next_timer() {
                        std::thread::sleep(wait);
                    }
                    sync_clock(&mut engine, &mut clock);
                }
                render(&engine, out)?;
                if engine.is_game_complete() {
                    announce_completion(&engine, logger.as_mut(), out)?;
                }
            }
        }
    }

    writeln!(out, "Bye.")?;
    Ok(())
}

fn sync_clock(engine: &mut Engine, clock: &mut Instant) {
    let now = Instant::now();
    engine.advance(now.duration_since(*clock));
    *clock = now;
}

fn render(engine: &Engine, out: &mut dyn Write) -> Result<(), CliError> {
    let snapshot = engine.snapshot();
    writeln!(out, "{}", format_board(&snapshot, DEFAULT_COLUMNS))?;
    writeln!(out, "{}", format_status(&snapshot))?;
    Ok(())
}

fn announce_completion(
    engine: &Engine,
    logger: Option<&mut GameLogger>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    writeln!(out, "All pairs found in {} moves!", engine.move_count())?;
    if matches!(engine.phase(), Phase::Complete { new_record: true }) {
        writeln!(out, "New best score!")?;
    }
    if let Some(logger) = logger {
        let id = logger.next_id();
        if let Some(record) = GameRecord::from_engine(engine, id) {
            logger.write(&record)?;
        }
    }
    Ok(())
}

/// Why a pick was ignored, with 1-based card numbers.
fn describe_rejection(reason: Rejection) -> String {
    match reason {
        Rejection::OutOfRange { position, size } => {
            format!("card {} does not exist (1-{})", position + 1, size)
        }
        Rejection::AlreadyCleared { position } => format!("card {} is already matched", position + 1),
        Rejection::AlreadyRevealed { position } => {
            format!("card {} is already face up", position + 1)
        }
        Rejection::InputLocked => "wait until the pair has been compared".to_string(),
        Rejection::GameComplete => "the game is over, 'r' to play again".to_string(),
        Rejection::StaleTimer => reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Cursor;

    #[test]
    fn input_parsing() {
        assert_eq!(parse_play_input(" 12 ", 12), PlayInput::Pick(11));
        assert_eq!(parse_play_input("restart", 12), PlayInput::Restart);
        assert!(matches!(parse_play_input("0", 12), PlayInput::Invalid(_)));
        assert!(matches!(parse_play_input("", 12), PlayInput::Invalid(_)));
        assert!(matches!(parse_play_input("lion", 12), PlayInput::Invalid(_)));
    }

    #[test]
    #[serial]
    fn quit_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let opts = PlayOptions {
            seed: Some(42),
            instant: true,
            score_file: Some(dir.path().join("s.json").to_string_lossy().into_owned()),
            ..PlayOptions::default()
        };
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(&b"q\n"[..]);
        handle_play_command(opts, &mut out, &mut err, &mut stdin).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("seed=42"));
        assert!(text.trim_end().ends_with("Bye."));
    }

    #[test]
    #[serial]
    fn bad_input_is_a_warning_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let opts = PlayOptions {
            seed: Some(1),
            instant: true,
            score_file: Some(dir.path().join("s.json").to_string_lossy().into_owned()),
            ..PlayOptions::default()
        };
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(&b"99\nhello\n1\n1\n"[..]);
        handle_play_command(opts, &mut out, &mut err, &mut stdin).unwrap();
        let stderr = String::from_utf8(err).unwrap();
        assert!(stderr.contains("does not exist"));
        assert!(stderr.contains("unrecognised"));
        assert!(stderr.contains("card 1 is already face up"));
    }
}
