//! Finish-time leaderboard
//!
//! Kept in memory for the lifetime of the process, tracks the top 10 times.

use serde::{Deserialize, Serialize};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Total race time (ms)
    pub time: f32,
}

/// Fastest finishes, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a time makes the board
    pub fn qualifies(&self, time: f32) -> bool {
        if !(time.is_finite() && time > 0.0) {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().is_none_or(|e| time < e.time)
    }

    /// Get the rank a time would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, time: f32) -> Option<usize> {
        if !self.qualifies(time) {
            return None;
        }
        let rank = self.entries.iter().position(|e| time < e.time);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finish time. Returns the rank achieved (1-indexed) or None.
    pub fn add_time(&mut self, name: &str, time: f32) -> Option<usize> {
        let rank = self.potential_rank(time)?;

        self.entries.insert(
            rank - 1,
            LeaderboardEntry {
                name: name.to_string(),
                time,
            },
        );
        self.entries.truncate(MAX_ENTRIES);

        log::info!("{} placed #{} on the leaderboard ({:.0} ms)", name, rank, time);
        Some(rank)
    }

    /// Fastest recorded time (if any)
    pub fn best_time(&self) -> Option<f32> {
        self.entries.first().map(|e| e.time)
    }
}
