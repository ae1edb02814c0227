use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::Engine;
use crate::game::Phase;

/// Summary of one completed game, one JSON object per line in a game log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Format: YYYYMMDD-NNNNNN
    pub game_id: String,
    /// Dealer seed of the session (replays the same sequence of boards)
    pub seed: Option<u64>,
    /// Which deal of the session this game was played on
    pub round: u32,
    /// Distinct kinds on the board
    pub kinds: usize,
    pub moves: u32,
    pub best_score: Option<u32>,
    #[serde(default)]
    pub new_record: bool,
    /// RFC3339, filled in by the logger when missing
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl GameRecord {
    /// Record of the engine's current game, `None` until it is complete.
    pub fn from_engine(engine: &Engine, game_id: String) -> Option<Self> {
        let Phase::Complete { new_record } = engine.phase() else {
            return None;
        };
        Some(Self {
            game_id,
            seed: Some(engine.seed()),
            round: engine.round(),
            kinds: engine.board().kind_count(),
            moves: engine.move_count(),
            best_score: engine.best_score(),
            new_record,
            ts: None,
            meta: None,
        })
    }
}

pub fn format_game_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends [`GameRecord`]s to a JSONL file.
pub struct GameLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl GameLogger {
    /// Truncates `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        ensure_parent(path.as_ref());
        let f = File::create(path)?;
        Ok(Self::with_writer(f))
    }

    /// Keeps existing records in `path` and writes after them.
    pub fn append<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        ensure_parent(path.as_ref());
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::with_writer(f))
    }

    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    fn with_writer(f: File) -> Self {
        Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_game_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &GameRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = create_dir_all(parent);
        }
    }
}
