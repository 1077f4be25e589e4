//! Change Events
//!
//! Human-readable score changes for the recent-activity feed.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::leaderboard::player::PlayerId;

/// A score change observed between two roster snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    /// Player whose score changed
    pub player_id: PlayerId,

    /// Player name at observation time
    pub player_name: String,

    /// Previously observed score
    pub old_score: u32,

    /// Current score
    pub new_score: u32,

    /// When the change was observed
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    /// Signed score difference.
    pub fn delta(&self) -> i64 {
        self.new_score as i64 - self.old_score as i64
    }

    /// Delta formatted with an explicit sign for gains (`+50`, `-20`).
    pub fn delta_label(&self) -> String {
        let delta = self.delta();
        if delta > 0 {
            format!("+{delta}")
        } else {
            delta.to_string()
        }
    }
}
