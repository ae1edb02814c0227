//! Statistics over a JSONL file of game records (from `play --log` or
//! `sim --output`).

use crate::error::CliError;
use crate::io_utils::read_text;
use crate::parse_json_or_continue;
use crate::ui;
use memora_engine::logger::GameRecord;
use std::io::Write;

#[derive(Debug, Default)]
struct StatsState {
    games: u64,
    total_moves: u64,
    min_moves: Option<u32>,
    max_moves: Option<u32>,
    new_records: u64,
    best_score: Option<u32>,
}

impl StatsState {
    fn add(&mut self, rec: &GameRecord) {
        self.games += 1;
        self.total_moves += u64::from(rec.moves);
        self.min_moves = Some(self.min_moves.map_or(rec.moves, |m| m.min(rec.moves)));
        self.max_moves = Some(self.max_moves.map_or(rec.moves, |m| m.max(rec.moves)));
        if rec.new_record {
            self.new_records += 1;
        }
        let best = rec.best_score.unwrap_or(rec.moves).min(rec.moves);
        self.best_score = Some(self.best_score.map_or(best, |b| b.min(best)));
    }
}

pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = match read_text(&input) {
        Ok(c) => c,
        Err(e) => {
            ui::write_error(err, &e)?;
            return Err(CliError::InvalidInput(e));
        }
    };

    let mut state = StatsState::default();
    let mut lines = 0u64;
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        lines += 1;
        let rec: GameRecord = parse_json_or_continue!(line, err, format!("line {}", i + 1));
        state.add(&rec);
    }
    let skipped = lines - state.games;

    if state.games == 0 {
        ui::write_error(err, "no game records found")?;
        return Err(CliError::InvalidInput(format!(
            "{} contains no game records",
            input
        )));
    }

    let summary = serde_json::json!({
        "games": state.games,
        "moves": {
            "min": state.min_moves,
            "max": state.max_moves,
            "mean": state.total_moves as f64 / state.games as f64,
        },
        "new_records": state.new_records,
        "best_score": state.best_score,
        "skipped": skipped,
    });
    let json_str = serde_json::to_string_pretty(&summary).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    if skipped > 0 {
        ui::display_warning(err, &format!("{} line(s) skipped", skipped))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, moves: u32, best: u32, new_record: bool) -> String {
        serde_json::to_string(&GameRecord {
            game_id: id.to_string(),
            seed: Some(1),
            round: 1,
            kinds: 6,
            moves,
            best_score: Some(best),
            new_record,
            ts: None,
            meta: None,
        })
        .unwrap()
    }

    #[test]
    fn aggregates_and_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.jsonl");
        let body = [
            line("20260101-000001", 10, 10, true),
            "{not json".to_string(),
            line("20260101-000002", 7, 7, true),
            line("20260101-000003", 12, 7, false),
        ]
        .join("\n");
        std::fs::write(&path, body).unwrap();

        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_stats_command(path.to_string_lossy().into_owned(), &mut out, &mut err).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["games"], 3);
        assert_eq!(json["moves"]["min"], 7);
        assert_eq!(json["moves"]["max"], 12);
        assert_eq!(json["new_records"], 2);
        assert_eq!(json["best_score"], 7);
        assert_eq!(json["skipped"], 1);
        let stderr = String::from_utf8(err).unwrap();
        assert!(stderr.contains("Failed to parse line 2"));
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        std::fs::write(&path, "\n\n").unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let res = handle_stats_command(path.to_string_lossy().into_owned(), &mut out, &mut err);
        assert!(matches!(res, Err(CliError::InvalidInput(_))));
    }
}
