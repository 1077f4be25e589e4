//! Roster Store
//!
//! The single owner of all player records. Every mutation goes through
//! validation first, leaves the roster untouched on rejection, and
//! re-ranks the whole roster on success, so no caller can ever observe
//! stale ranks.

use std::sync::Arc;
use serde::{Serialize, Deserialize};
use serde_json::json;
use thiserror::Error;

use crate::core::avatar::validate_image_url;
use crate::leaderboard::audit::{event, AuditSink};
use crate::leaderboard::player::{seed_players, Player, PlayerId};
use crate::leaderboard::ranking::rank_players;
use crate::leaderboard::validate::{
    sanitize, validate_change, validate_name, validate_score, ValidationError,
};

/// Roster mutation errors.
///
/// All of these are recoverable: the roster is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No player with this id.
    #[error("Player not found: {0}")]
    NotFound(PlayerId),

    /// Another player already uses this name (case-insensitive).
    #[error("A player with this name already exists: {0}")]
    Duplicate(String),
}

impl RosterError {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::Validation(e) => e.code(),
            RosterError::NotFound(_) => "NOT_FOUND",
            RosterError::Duplicate(_) => "DUPLICATE",
        }
    }
}

/// An accepted score change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    /// Score before the change.
    pub old_score: u32,
    /// Score after the change.
    pub new_score: u32,
}

/// Aggregate figures for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStats {
    /// Number of players.
    pub total_players: usize,
    /// Number of players flagged online.
    pub online_players: usize,
    /// Mean score, rounded; 0 when empty.
    pub average_score: u32,
    /// Score of the rank-1 player; 0 when empty.
    pub top_score: u32,
    /// Sum of all scores.
    pub total_score: u64,
}

/// In-memory roster, always kept in rank order.
pub struct Roster {
    /// Players sorted by rank
    players: Vec<Player>,
    /// Bumped by every accepted mutation
    revision: u64,
    /// Audit destination
    audit: Arc<dyn AuditSink>,
}

impl Roster {
    /// Create a roster from an initial set of players.
    pub fn new(players: Vec<Player>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            players: rank_players(players),
            revision: 0,
            audit,
        }
    }

    /// Create a roster holding the standard seed players.
    pub fn seeded(audit: Arc<dyn AuditSink>) -> Self {
        Self::new(seed_players(), audit)
    }

    /// Players in rank order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Revision counter; changes whenever the roster does.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Audit destination shared with the rest of the dashboard.
    pub fn audit_sink(&self) -> &Arc<dyn AuditSink> {
        &self.audit
    }

    /// Compute header statistics.
    pub fn stats(&self) -> RosterStats {
        let total_players = self.players.len();
        let total_score: u64 = self.players.iter().map(|p| p.score as u64).sum();
        let average_score = if total_players == 0 {
            0
        } else {
            (total_score as f64 / total_players as f64).round() as u32
        };

        RosterStats {
            total_players,
            online_players: self.players.iter().filter(|p| p.is_online).count(),
            average_score,
            top_score: self.players.first().map(|p| p.score).unwrap_or(0),
            total_score,
        }
    }

    /// Add a new player with score 0.
    pub fn add_player(&mut self, raw_name: &str) -> Result<PlayerId, RosterError> {
        let sanitized = sanitize(raw_name.trim());

        if let Err(e) = validate_name(&sanitized) {
            self.audit.record(event::ADD_INVALID_NAME, json!({
                "name": raw_name,
                "error": e.to_string(),
                "code": e.code(),
            }));
            return Err(ValidationError::from(e).into());
        }

        let name = sanitized.trim().to_string();
        let lowered = name.to_lowercase();
        if self.players.iter().any(|p| p.name.to_lowercase() == lowered) {
            self.audit.record(event::ADD_DUPLICATE_NAME, json!({ "name": name }));
            return Err(RosterError::Duplicate(name));
        }

        let player = Player::new(PlayerId::generate(), name);
        if !validate_image_url(&player.avatar) {
            self.audit.record(event::INVALID_AVATAR, json!({ "url": player.avatar }));
        }

        let id = player.id.clone();
        self.audit.record(event::PLAYER_ADDED, json!({
            "playerId": id.as_str(),
            "name": player.name,
        }));

        self.players.push(player);
        self.commit();
        Ok(id)
    }

    /// Remove a player.
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Player, RosterError> {
        let Some(index) = self.players.iter().position(|p| &p.id == id) else {
            self.audit.record(event::REMOVE_NOT_FOUND, json!({ "playerId": id.as_str() }));
            return Err(RosterError::NotFound(id.clone()));
        };

        let removed = self.players.remove(index);
        self.audit.record(event::PLAYER_REMOVED, json!({
            "playerId": id.as_str(),
            "name": removed.name,
        }));

        self.commit();
        Ok(removed)
    }

    /// Set a player's score.
    pub fn update_score(&mut self, id: &PlayerId, new_score: f64) -> Result<ScoreUpdate, RosterError> {
        let current = self.player(id).map(|p| p.score);

        let score = match validate_score(new_score) {
            Ok(score) => score,
            Err(e) => {
                self.audit.record(event::SCORE_INVALID, json!({
                    "playerId": id.as_str(),
                    "currentScore": current,
                    "newScore": new_score,
                    "error": e.to_string(),
                    "code": e.code(),
                }));
                return Err(ValidationError::from(e).into());
            }
        };

        let Some(player) = self.players.iter_mut().find(|p| &p.id == id) else {
            self.audit.record(event::SCORE_NOT_FOUND, json!({
                "playerId": id.as_str(),
                "newScore": score,
            }));
            return Err(RosterError::NotFound(id.clone()));
        };

        let old_score = player.score;
        player.score = score;

        self.audit.record(event::SCORE_UPDATED, json!({
            "playerId": id.as_str(),
            "oldScore": old_score,
            "newScore": score,
        }));

        self.commit();
        Ok(ScoreUpdate { old_score, new_score: score })
    }

    /// Add a signed delta to a player's score, clamping at 0.
    pub fn apply_delta(&mut self, id: &PlayerId, delta: i64) -> Result<ScoreUpdate, RosterError> {
        let Some(current) = self.player(id).map(|p| p.score) else {
            self.audit.record(event::SCORE_NOT_FOUND, json!({
                "playerId": id.as_str(),
                "change": delta,
            }));
            return Err(RosterError::NotFound(id.clone()));
        };

        let candidate = (current as i64).saturating_add(delta).max(0);
        self.update_score(id, candidate as f64)
    }

    /// Operator score change, limited to ±10,000 per step.
    pub fn adjust_score(&mut self, id: &PlayerId, delta: i64) -> Result<ScoreUpdate, RosterError> {
        if let Err(e) = validate_change(delta) {
            self.audit.record(event::EXCESSIVE_CHANGE, json!({
                "playerId": id.as_str(),
                "change": delta,
            }));
            return Err(ValidationError::from(e).into());
        }
        self.apply_delta(id, delta)
    }

    /// Re-rank and bump the revision after an accepted mutation.
    fn commit(&mut self) {
        let players = std::mem::take(&mut self.players);
        self.players = rank_players(players);
        self.revision += 1;
    }
}

// =============================================================================
// TESTS
// =============================================================================
