//! High score leaderboard
//!
//! Keeps the top 10 finished runs. Stored as JSON by the shell.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::{RunOutcome, RunReport};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    pub outcome: RunOutcome,
    pub max_combo: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished run. Returns the rank achieved (1-indexed) or None.
    pub fn record(&mut self, report: &RunReport, timestamp: f64) -> Option<usize> {
        if !self.qualifies(report.score) {
            return None;
        }

        let entry = HighScoreEntry {
            score: report.score,
            outcome: report.outcome,
            max_combo: report.max_combo,
            timestamp,
        };

        // Ties keep the older entry ahead
        let pos = self.entries.iter().position(|e| report.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("High score #{rank}: {}", report.score);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut scores: Self = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a file, starting fresh if it is missing or unreadable
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt high scores in {}: {e}", path.display());
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(score: u64, outcome: RunOutcome) -> RunReport {
        RunReport {
            seed: 0,
            score,
            outcome,
            max_combo: 3,
            elapsed: 90.0,
        }
    }

    #[test]
    fn test_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&report(500, RunOutcome::Defeat), 1.0), Some(1));
        assert_eq!(scores.record(&report(900, RunOutcome::Victory), 2.0), Some(1));
        assert_eq!(scores.record(&report(700, RunOutcome::Defeat), 3.0), Some(2));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![900, 700, 500]);
        assert_eq!(scores.entries[0].outcome, RunOutcome::Victory);
        assert_eq!(scores.top_score(), Some(900));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&report(0, RunOutcome::Defeat), 1.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_capped_at_ten() {
        let mut scores = HighScores::new();
        for score in 1..=12 {
            scores.record(&report(score * 100, RunOutcome::Defeat), score as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(100));
        assert!(!scores.qualifies(300));
        assert_eq!(scores.record(&report(1250, RunOutcome::Victory), 13.0), Some(1));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(400));
    }

    #[test]
    fn test_json_round_trip_resorts() {
        let json = r#"{"entries":[
            {"score":10,"outcome":"Defeat","max_combo":1,"timestamp":0.0},
            {"score":30,"outcome":"Victory","max_combo":9,"timestamp":0.0}
        ]}"#;
        let scores = HighScores::from_json(json).unwrap();
        assert_eq!(scores.top_score(), Some(30));
        let again = HighScores::from_json(&scores.to_json().unwrap()).unwrap();
        assert_eq!(again.entries, scores.entries);
        assert!(HighScores::from_json("not json").is_err());
    }
}
