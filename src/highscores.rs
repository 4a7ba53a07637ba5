//! High score leaderboard
//!
//! Tracks the top 10 finished games by accumulated score. Storage is up to
//! the caller; the board round-trips through JSON text.

use serde::{Deserialize, Serialize};

use crate::sim::ScoreState;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Accumulated round bonuses
    pub score: u64,
    /// Rounds completed
    pub level: u32,
    #[serde(default)]
    pub targets_destroyed: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted best first
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
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished game to the leaderboard (if it qualifies)
    ///
    /// Returns the rank achieved (1-indexed). Ties rank below earlier entries.
    pub fn record(&mut self, score: &ScoreState, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score.accumulated_score) {
            return None;
        }

        let entry = HighScoreEntry {
            score: score.accumulated_score,
            level: score.level,
            targets_destroyed: score.targets_destroyed_total,
            timestamp,
        };

        let pos = self.entries.iter().position(|e| entry.score > e.score);
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
        log::info!("New high score #{}: {}", rank, score.accumulated_score);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a saved board, restoring best-first order and the size cap
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }
}
