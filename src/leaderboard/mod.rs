use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_NICKNAME_CHARS: usize = 24;
/// How many entries survive a persisted write. The in-memory collection is
/// not trimmed; this process keeps serving everything it has appended until
/// the next load.
pub const RETAINED_ENTRIES: usize = 100;

/// One recorded score. Immutable once created.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub nickname: String,
    pub score: i64,
    pub played_at: DateTime<Utc>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Nickname is required")]
    EmptyNickname,
    #[error("Nickname must be at most {MAX_NICKNAME_CHARS} characters")]
    NicknameTooLong,
    #[error("Score must be a non-negative integer")]
    NegativeScore,
}

/// Validate a submission without mutating anything. Returns the trimmed
/// nickname so callers submit exactly what was validated.
pub fn validate(nickname: &str, score: i64) -> Result<String, SubmitError> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err(SubmitError::EmptyNickname);
    }
    if trimmed.chars().count() > MAX_NICKNAME_CHARS {
        return Err(SubmitError::NicknameTooLong);
    }
    if score < 0 {
        return Err(SubmitError::NegativeScore);
    }
    Ok(trimmed.to_string())
}

/// Ranked score collection backed by a JSON file. The in-memory view is
/// authoritative for the life of the process; disk writes are best effort.
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    file: PathBuf,
}

impl Leaderboard {
    /// Load entries from the backing file, dropping anything malformed.
    /// A missing or unreadable file starts an empty collection.
    pub fn load(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let entries = match fs::read_to_string(&file) {
            Ok(raw) => parse_entries(&raw),
            Err(_) => Vec::new(),
        };
        Leaderboard { entries, file }
    }

    /// Validate, stamp `playedAt`, append, and persist the retention-
    /// truncated view. Validation failure leaves the collection untouched.
    pub fn submit(&mut self, nickname: &str, score: i64) -> Result<LeaderboardEntry, SubmitError> {
        let nickname = validate(nickname, score)?;
        let entry = LeaderboardEntry {
            nickname,
            score,
            played_at: Utc::now(),
        };
        self.entries.push(entry.clone());
        self.persist();
        Ok(entry)
    }

    /// Top entries by score descending, ties broken by most recent first.
    /// Sort-then-slice; the collection stays small enough for that.
    pub fn top_n(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut sorted = self.entries.clone();
        sort_ranked(&mut sorted);
        sorted.truncate(limit);
        sorted
    }

    fn persist(&self) {
        let mut ranked = self.entries.clone();
        sort_ranked(&mut ranked);
        ranked.truncate(RETAINED_ENTRIES);

        if let Some(dir) = self.file.parent() {
            if !dir.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(dir) {
                    warn!("Failed to create leaderboard directory: {}", e);
                    return;
                }
            }
        }
        match serde_json::to_string_pretty(&ranked) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.file, json) {
                    warn!("Failed to persist leaderboard: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize leaderboard: {}", e),
        }
    }
}

fn sort_ranked(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.played_at.cmp(&a.played_at))
    });
}

/// Per-entry parsing: one bad record drops that record, not the whole file.
fn parse_entries(raw: &str) -> Vec<LeaderboardEntry> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!("Leaderboard file is not a JSON array, starting empty: {}", e);
            return Vec::new();
        }
    };
    values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<LeaderboardEntry>(value).ok())
        .filter(|entry| validate(&entry.nickname, entry.score).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn entry(nickname: &str, score: i64, secs: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            nickname: nickname.to_string(),
            score,
            played_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn validate_trims_and_bounds_nickname() {
        assert_eq!(validate("  Ann  ", 0), Ok("Ann".to_string()));
        assert_eq!(validate("", 0), Err(SubmitError::EmptyNickname));
        assert_eq!(validate("   ", 5), Err(SubmitError::EmptyNickname));
        assert_eq!(validate(&"x".repeat(24), 0), Ok("x".repeat(24)));
        assert_eq!(
            validate(&"x".repeat(25), 0),
            Err(SubmitError::NicknameTooLong)
        );
        assert_eq!(validate("Ann", -1), Err(SubmitError::NegativeScore));
    }

    #[test]
    fn top_n_ranks_by_score_then_recency() {
        let dir = tempdir().unwrap();
        let mut board = Leaderboard::load(dir.path().join("leaderboard.json"));
        board.entries.push(entry("old_high", 10, 100));
        board.entries.push(entry("low", 3, 300));
        board.entries.push(entry("new_high", 10, 200));

        let top = board.top_n(10);
        let names: Vec<&str> = top.iter().map(|e| e.nickname.as_str()).collect();
        assert_eq!(names, ["new_high", "old_high", "low"]);

        assert_eq!(board.top_n(2).len(), 2);
        assert_eq!(board.top_n(0).len(), 0);
    }

    #[test]
    fn submit_stamps_time_and_persists() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("leaderboard.json");
        let mut board = Leaderboard::load(&file);

        let saved = board.submit("  Ann ", 5).unwrap();
        assert_eq!(saved.nickname, "Ann");
        assert_eq!(saved.score, 5);

        let reloaded = Leaderboard::load(&file);
        assert_eq!(reloaded.top_n(10), vec![saved]);
    }

    #[test]
    fn submit_rejects_invalid_input_without_appending() {
        let dir = tempdir().unwrap();
        let mut board = Leaderboard::load(dir.path().join("leaderboard.json"));
        assert_eq!(board.submit("", 5), Err(SubmitError::EmptyNickname));
        assert_eq!(board.submit("Ann", -2), Err(SubmitError::NegativeScore));
        assert!(board.top_n(10).is_empty());
    }

    #[test]
    fn persisted_file_is_truncated_but_memory_is_not() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("leaderboard.json");
        let mut board = Leaderboard::load(&file);
        for i in 0..105 {
            board.submit(&format!("player{}", i), i).unwrap();
        }

        assert_eq!(board.top_n(200).len(), 105);

        let reloaded = Leaderboard::load(&file);
        let top = reloaded.top_n(200);
        assert_eq!(top.len(), RETAINED_ENTRIES);
        // Highest scores survive the truncation.
        assert_eq!(top[0].score, 104);
        assert_eq!(top.last().unwrap().score, 5);
    }

    #[test]
    fn load_filters_malformed_entries() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("leaderboard.json");
        fs::write(
            &file,
            r#"[
                {"nickname": "Ann", "score": 5, "playedAt": "2026-08-28T10:00:00Z"},
                {"nickname": "", "score": 5, "playedAt": "2026-08-28T10:00:00Z"},
                {"nickname": "NoScore", "playedAt": "2026-08-28T10:00:00Z"},
                {"nickname": "Neg", "score": -3, "playedAt": "2026-08-28T10:00:00Z"},
                "not an object"
            ]"#,
        )
        .unwrap();

        let board = Leaderboard::load(&file);
        let top = board.top_n(10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].nickname, "Ann");
    }

    #[test]
    fn load_survives_a_corrupt_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("leaderboard.json");
        fs::write(&file, "{{{ not json").unwrap();
        assert!(Leaderboard::load(&file).top_n(10).is_empty());
    }
}
