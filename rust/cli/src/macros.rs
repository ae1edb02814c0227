//! Shorthands for the write-or-bail and skip-bad-line patterns in `run` and
//! the record-reading commands.

/// `writeln!` that returns [`crate::exit_code::ERROR`] from the enclosing
/// function when the stream is gone.
///
/// ```ignore
/// write_or_exit!(err, "Usage: memora <command> [options]");
/// ```
#[macro_export]
macro_rules! write_or_exit {
    ($dest:expr, $($arg:tt)*) => {
        if writeln!($dest, $($arg)*).is_err() {
            return $crate::exit_code::ERROR;
        }
    };
}

/// Deserializes one JSONL line, or reports it on `$err` and moves on to the
/// next loop iteration.
///
/// ```ignore
/// let record: GameRecord = parse_json_or_continue!(line, err, format!("line {}", n));
/// ```
#[macro_export]
macro_rules! parse_json_or_continue {
    ($line:expr, $err:expr, $what:expr) => {
        match serde_json::from_str($line) {
            Ok(value) => value,
            Err(e) => {
                let _ = $crate::ui::write_error($err, &format!("Failed to parse {}: {}", $what, e));
                continue;
            }
        }
    };
}
