//! Change Tracker
//!
//! Observes published roster snapshots and turns score differences
//! against the previous-score cache into change events. The tracker
//! only reads the roster; the cache is the only thing it writes.

use std::collections::VecDeque;
use chrono::Utc;
use tracing::warn;

use crate::leaderboard::cache::{ScoreCache, ScoreMap};
use crate::leaderboard::events::ChangeEvent;
use crate::leaderboard::player::Player;

/// Number of recent changes kept.
pub const RECENT_CHANGES_CAPACITY: usize = 10;

/// Derives change events from consecutive snapshots.
pub struct ChangeTracker {
    /// Most recent first
    recent: VecDeque<ChangeEvent>,
    /// Previous-score persistence
    cache: Box<dyn ScoreCache>,
    /// History bound
    capacity: usize,
}

impl ChangeTracker {
    /// Create a tracker over a previous-score cache.
    pub fn new(cache: Box<dyn ScoreCache>) -> Self {
        Self::with_capacity(cache, RECENT_CHANGES_CAPACITY)
    }

    /// Create a tracker with a custom history bound.
    pub fn with_capacity(cache: Box<dyn ScoreCache>, capacity: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(capacity),
            cache,
            capacity,
        }
    }

    /// Recent changes, newest first.
    pub fn recent(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.recent.iter()
    }

    /// Number of retained changes.
    pub fn len(&self) -> usize {
        self.recent.len()
    }

    /// Whether no change has been retained.
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Compare a snapshot to the previous scores and record differences.
    ///
    /// Returns the events produced by this pass in the order they were
    /// prepended. Afterwards the cache holds exactly the snapshot's scores.
    pub fn observe(&mut self, players: &[Player]) -> Vec<ChangeEvent> {
        let previous = match self.cache.load() {
            Ok(scores) => scores,
            Err(e) => {
                warn!("Previous-score cache unreadable, skipping deltas: {}", e);
                ScoreMap::new()
            }
        };

        let now = Utc::now();
        let mut produced = Vec::new();

        for player in players {
            let Some(&old_score) = previous.get(player.id.as_str()) else {
                continue;
            };
            if old_score == player.score {
                continue;
            }

            let event = ChangeEvent {
                player_id: player.id.clone(),
                player_name: player.name.clone(),
                old_score,
                new_score: player.score,
                timestamp: now,
            };
            self.recent.push_front(event.clone());
            self.recent.truncate(self.capacity);
            produced.push(event);
        }

        let current: ScoreMap = players
            .iter()
            .map(|p| (p.id.as_str().to_string(), p.score))
            .collect();
        if let Err(e) = self.cache.save(&current) {
            warn!("Failed to save previous-score cache: {}", e);
        }

        produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::cache::{CacheError, MemoryScoreCache};
    use crate::leaderboard::player::PlayerId;

    fn player(id: &str, score: u32) -> Player {
        Player::new(PlayerId::new(id), id).with_score(score)
    }

    fn tracker_with(previous: &[(&str, u32)]) -> ChangeTracker {
        let scores = previous.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        ChangeTracker::new(Box::new(MemoryScoreCache::with_scores(scores)))
    }

    #[test]
    fn test_only_known_changed_ids_produce_events() {
        let mut tracker = tracker_with(&[("p1", 100)]);
        let events = tracker.observe(&[player("p1", 150), player("p2", 10)]);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].player_id.as_str(), "p1");
        assert_eq!(events[0].delta(), 50);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_snapshot_overwritten_after_pass() {
        let mut tracker = tracker_with(&[("p1", 100)]);
        tracker.observe(&[player("p1", 150), player("p2", 10)]);

        // Same scores again: nothing new.
        assert!(tracker.observe(&[player("p1", 150), player("p2", 10)]).is_empty());

        // p2 now has a previous score.
        let events = tracker.observe(&[player("p1", 150), player("p2", 25)]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].old_score, 10);
        assert_eq!(tracker.recent().next().map(|e| e.player_id.as_str()), Some("p2"));
    }

    #[test]
    fn test_removed_players_drop_out_of_snapshot() {
        let mut tracker = tracker_with(&[]);
        tracker.observe(&[player("p1", 1), player("p2", 2)]);
        tracker.observe(&[player("p2", 2)]);

        // p1 re-appearing has no previous score any more.
        assert!(tracker.observe(&[player("p1", 99), player("p2", 2)]).is_empty());
    }

    #[test]
    fn test_history_bounded_newest_first() {
        let mut tracker = tracker_with(&[]);
        tracker.observe(&[player("p1", 0)]);

        for score in 1..=15 {
            tracker.observe(&[player("p1", score)]);
        }

        assert_eq!(tracker.len(), RECENT_CHANGES_CAPACITY);
        let newest: Vec<u32> = tracker.recent().map(|e| e.new_score).collect();
        assert_eq!(newest, (6..=15).rev().collect::<Vec<_>>());
    }

    struct BrokenCache;

    impl ScoreCache for BrokenCache {
        fn load(&self) -> Result<ScoreMap, CacheError> {
            Err(std::io::Error::other("disk gone").into())
        }

        fn save(&mut self, _scores: &ScoreMap) -> Result<(), CacheError> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    #[test]
    fn test_broken_cache_is_best_effort() {
        let mut tracker = ChangeTracker::new(Box::new(BrokenCache));
        assert!(tracker.observe(&[player("p1", 5)]).is_empty());
        assert!(tracker.is_empty());
    }
}
