//! Player Definitions
//!
//! The ranked participant record and its identifier.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::avatar::avatar_for;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique, immutable player identifier.
///
/// Seeded players use short numeric ids; players added at runtime get a
/// v4 UUID string. Ids are the keys of the previous-score cache, so they
/// must stay stable for a player's whole lifetime.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap an existing id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// A ranked participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique player ID
    pub id: PlayerId,

    /// Display name (sanitized and validated)
    pub name: String,

    /// Current score, always within `0..=MAX_SCORE`
    pub score: u32,

    /// Dense 1-based rank; derived from score order, never set directly
    pub rank: u32,

    /// Whether the player is shown as online
    pub is_online: bool,

    /// Avatar image URL
    pub avatar: String,
}

impl Player {
    /// Create a new online player with score 0.
    ///
    /// The rank is provisional until the roster re-ranks.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        let avatar = avatar_for(id.as_str());
        Self {
            id,
            name: name.into(),
            score: 0,
            rank: 0,
            is_online: true,
            avatar,
        }
    }

    /// Builder-style score override.
    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    /// Builder-style online flag override.
    pub fn with_online(mut self, is_online: bool) -> Self {
        self.is_online = is_online;
        self
    }

    /// Builder-style avatar override.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }
}

// =============================================================================
// SEED ROSTER
// =============================================================================

const SEED: [(&str, &str, u32, bool, &str); 5] = [
    ("1", "Alice Johnson", 2850, true, "photo-1494790108755-2616b612b786"),
    ("2", "Bob Smith", 2730, true, "photo-1599566150163-29194dcaad36"),
    ("3", "Carol Davis", 2680, false, "photo-1438761681033-6461ffad8d80"),
    ("4", "David Wilson", 2590, true, "photo-1472099645785-5658abf4ff4e"),
    ("5", "Eva Brown", 2510, true, "photo-1544005313-94ddf0286df2"),
];

/// The fixed set of players a fresh dashboard starts with.
pub fn seed_players() -> Vec<Player> {
    SEED.iter()
        .map(|(id, name, score, online, photo)| {
            Player::new(PlayerId::new(*id), *name)
                .with_score(*score)
                .with_online(*online)
                .with_avatar(format!(
                    "https://images.unsplash.com/{photo}?w=150&h=150&fit=crop&crop=face"
                ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::avatar::validate_image_url;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = PlayerId::generate();
        let b = PlayerId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new(PlayerId::new("p1"), "Zed");
        assert_eq!(player.score, 0);
        assert!(player.is_online);
        assert!(validate_image_url(&player.avatar));
    }

    #[test]
    fn test_seed_roster() {
        let seed = seed_players();
        assert_eq!(seed.len(), 5);
        assert_eq!(seed[0].name, "Alice Johnson");
        assert!(!seed[2].is_online);
        assert!(seed.iter().all(|p| validate_image_url(&p.avatar)));
    }

    #[test]
    fn test_player_serializes_camel_case() {
        let player = Player::new(PlayerId::new("7"), "Gus");
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["isOnline"], true);
    }
}
