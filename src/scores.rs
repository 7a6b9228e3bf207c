//! High-score persistence collaborator.
//!
//! Keeps a plain text table of the ten best results, one per line:
//! total, points, level, and player name, tab separated. The file lives in
//! the XDG state directory (`$XDG_STATE_HOME/games`, falling back to
//! `$HOME/.local/state/games`). The core never touches this; the binary
//! hands over a [`ScoreReport`] once per finished game.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::core::ScoreReport;

const SCORE_FILE: &str = "gridfall.scores";
const KEPT_ENTRIES: usize = 10;

/// One line of the high-score table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub total: u64,
    pub points: u64,
    pub level: u32,
    pub name: String,
}

/// Handle on the high-score file.
#[derive(Debug, Clone)]
pub struct HighScores {
    path: PathBuf,
}

impl HighScores {
    /// Resolve the XDG state location, creating the directory if needed.
    pub fn at_default_location() -> Result<Self> {
        let dir = state_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating state directory {}", dir.display()))?;
        Ok(Self {
            path: dir.join(SCORE_FILE),
        })
    }

    /// Use an explicit file path (tests, unusual setups).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current table, best first. A missing file is an empty table.
    pub fn load(&self) -> Result<Vec<ScoreEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        Ok(text.lines().filter_map(parse_line).collect())
    }

    /// Add one game's result, keep the best ten, and return the new table.
    pub fn record(&self, report: ScoreReport) -> Result<Vec<ScoreEntry>> {
        let mut entries = self.load()?;
        entries.push(ScoreEntry {
            total: report.total,
            points: report.points,
            level: report.level,
            name: player_name(),
        });
        entries.sort_by(|a, b| b.total.cmp(&a.total));
        entries.truncate(KEPT_ENTRIES);

        let mut text = String::new();
        for entry in &entries {
            text.push_str(&format_line(entry));
        }
        fs::write(&self.path, text)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(entries)
    }
}

/// Human-readable table with a header line, for printing after the terminal
/// UI has been torn down.
pub fn format_table(entries: &[ScoreEntry]) -> String {
    let mut text = String::from("  Score\tPoints\tLevel\tName\n");
    for entry in entries {
        text.push_str(&format_line(entry));
    }
    text
}

fn state_dir() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_STATE_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("games"));
        }
    }
    if let Ok(home) = env::var("HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home).join(".local/state/games"));
        }
    }
    Err(anyhow!("neither XDG_STATE_HOME nor HOME is set"))
}

fn player_name() -> String {
    env::var("LOGNAME").unwrap_or_else(|_| "anonymous".into())
}

fn format_line(entry: &ScoreEntry) -> String {
    format!(
        "{:>7}\t{:>6}\t{:>4}\t{}\n",
        entry.total, entry.points, entry.level, entry.name
    )
}

fn parse_line(line: &str) -> Option<ScoreEntry> {
    let mut fields = line.split('\t').map(str::trim);
    let total = fields.next()?.parse().ok()?;
    let points = fields.next()?.parse().ok()?;
    let level = fields.next()?.parse().ok()?;
    let name = fields.next()?.to_string();
    Some(ScoreEntry {
        total,
        points,
        level,
        name,
    })
}
