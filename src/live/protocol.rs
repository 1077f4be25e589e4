//! Update Messages
//!
//! What subscribers receive after each command or tick. Serialized as
//! tagged JSON for the presentation layer.

use serde::{Serialize, Deserialize};

use crate::leaderboard::events::ChangeEvent;
use crate::leaderboard::player::Player;
use crate::leaderboard::roster::RosterStats;

/// Point-in-time view of the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot {
    /// Roster revision this view was taken at
    pub revision: u64,
    /// Whether the live feed is running
    pub live: bool,
    /// Players in rank order
    pub players: Vec<Player>,
    /// Header figures
    pub stats: RosterStats,
}

/// Notification pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardUpdate {
    /// The roster changed; carries the new snapshot.
    RosterChanged(RosterSnapshot),

    /// A score change was observed.
    ScoreChanged(ChangeEvent),

    /// The live feed was paused or resumed.
    LiveChanged {
        /// New state
        live: bool,
    },
}

impl DashboardUpdate {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
