//! Simulated Score Feed
//!
//! One simulation round visits every player once and, with a fixed
//! probability, applies a uniformly drawn integer delta through the
//! roster's validated `apply_delta` path. The live timer runs rounds with
//! [`SimulationProfile::TICK`]; the operator's "simulate now" action runs
//! one round with [`SimulationProfile::BULK`].

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::rng::RandomSource;
use crate::leaderboard::player::PlayerId;
use crate::leaderboard::roster::{Roster, RosterError, ScoreUpdate};

/// Parameters of one simulation round.
///
/// A selected player receives `floor(r * spread) - offset` for a uniform
/// `r` in `[0, 1)`, i.e. a delta in `[-offset, spread - offset - 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationProfile {
    /// Chance each player is touched in a round
    pub probability: f64,
    /// Number of distinct deltas
    pub spread: u32,
    /// Shift applied so the range can go negative
    pub offset: i64,
}

impl SimulationProfile {
    /// Periodic tick: 30% of players, delta in [-30, +69].
    pub const TICK: SimulationProfile = SimulationProfile {
        probability: 0.3,
        spread: 100,
        offset: 30,
    };

    /// Bulk "simulate now": 70% of players, delta in [-50, +149].
    pub const BULK: SimulationProfile = SimulationProfile {
        probability: 0.7,
        spread: 200,
        offset: 50,
    };

    /// Smallest delta this profile can draw.
    pub fn min_delta(&self) -> i64 {
        -self.offset
    }

    /// Largest delta this profile can draw.
    pub fn max_delta(&self) -> i64 {
        self.spread as i64 - 1 - self.offset
    }

    /// Map a unit value to a delta.
    #[inline]
    pub fn delta_for(&self, unit: f64) -> i64 {
        let step = (unit * self.spread as f64).floor() as i64;
        step.clamp(0, self.spread.saturating_sub(1) as i64) - self.offset
    }
}

/// Outcome of one simulation round.
#[derive(Debug, Default)]
pub struct SimulationResult {
    /// Players selected for a change
    pub attempted: usize,
    /// Accepted changes
    pub updates: Vec<(PlayerId, ScoreUpdate)>,
    /// Changes the roster refused (e.g. would exceed the maximum score)
    pub rejected: Vec<(PlayerId, RosterError)>,
}

impl SimulationResult {
    /// Whether any score was written.
    pub fn changed(&self) -> bool {
        !self.updates.is_empty()
    }
}

/// Run one simulation round over every current player.
pub fn simulate_round<R>(
    roster: &mut Roster,
    rng: &mut R,
    profile: &SimulationProfile,
) -> SimulationResult
where
    R: RandomSource + ?Sized,
{
    let mut result = SimulationResult::default();

    // Ids are collected up front: every accepted change re-ranks the roster.
    let ids: Vec<PlayerId> = roster.players().iter().map(|p| p.id.clone()).collect();

    for id in ids {
        if rng.next_unit() >= profile.probability {
            continue;
        }

        let delta = profile.delta_for(rng.next_unit());
        result.attempted += 1;

        match roster.apply_delta(&id, delta) {
            Ok(update) => result.updates.push((id, update)),
            Err(e) => {
                debug!("Simulated change for {} refused: {}", id, e);
                result.rejected.push((id, e));
            }
        }
    }

    result
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::core::rng::DeterministicRng;
    use crate::leaderboard::audit::MemoryAuditSink;
    use crate::leaderboard::player::Player;
    use crate::leaderboard::ranking::ranks_consistent;

    /// Always returns the same unit value.
    struct FixedRandom(f64);

    impl RandomSource for FixedRandom {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    fn roster(scores: &[(&str, u32)]) -> Roster {
        let players = scores
            .iter()
            .map(|(id, s)| Player::new(PlayerId::new(*id), format!("Player {id}")).with_score(*s))
            .collect();
        Roster::new(players, Arc::new(MemoryAuditSink::new()))
    }

    fn scores(roster: &Roster) -> Vec<(String, u32)> {
        let mut s: Vec<_> = roster.players().iter().map(|p| (p.id.to_string(), p.score)).collect();
        s.sort();
        s
    }

    #[test]
    fn test_profile_ranges() {
        assert_eq!(SimulationProfile::TICK.min_delta(), -30);
        assert_eq!(SimulationProfile::TICK.max_delta(), 69);
        assert_eq!(SimulationProfile::BULK.min_delta(), -50);
        assert_eq!(SimulationProfile::BULK.max_delta(), 149);

        assert_eq!(SimulationProfile::TICK.delta_for(0.0), -30);
        assert_eq!(SimulationProfile::TICK.delta_for(0.999_999), 69);
        assert_eq!(SimulationProfile::BULK.delta_for(0.5), 50);
    }

    #[test]
    fn test_probability_zero_changes_nothing() {
        let mut roster = roster(&[("a", 100), ("b", 50)]);
        let before = scores(&roster);
        let profile = SimulationProfile { probability: 0.0, ..SimulationProfile::TICK };

        let result = simulate_round(&mut roster, &mut FixedRandom(0.0), &profile);

        assert_eq!(result.attempted, 0);
        assert!(!result.changed());
        assert_eq!(scores(&roster), before);
        assert_eq!(roster.revision(), 0);
    }

    #[test]
    fn test_probability_one_applies_fixed_delta_to_all() {
        let mut roster = roster(&[("a", 100), ("b", 50), ("c", 10)]);
        let profile = SimulationProfile { probability: 1.0, ..SimulationProfile::TICK };

        // floor(0.5 * 100) - 30 = +20
        let result = simulate_round(&mut roster, &mut FixedRandom(0.5), &profile);

        assert_eq!(result.attempted, 3);
        assert_eq!(scores(&roster), [
            ("a".to_string(), 120),
            ("b".to_string(), 70),
            ("c".to_string(), 30),
        ]);
        assert!(ranks_consistent(roster.players()));
    }

    #[test]
    fn test_negative_delta_clamps() {
        let mut roster = roster(&[("a", 10)]);
        let profile = SimulationProfile { probability: 1.0, ..SimulationProfile::TICK };

        // floor(0.0 * 100) - 30 = -30
        simulate_round(&mut roster, &mut FixedRandom(0.0), &profile);
        assert_eq!(roster.players()[0].score, 0);
    }

    #[test]
    fn test_overflow_is_rejected_not_applied() {
        let mut roster = roster(&[("a", 999_990)]);
        let profile = SimulationProfile { probability: 1.0, ..SimulationProfile::BULK };

        let result = simulate_round(&mut roster, &mut FixedRandom(0.9), &profile);

        assert_eq!(result.rejected.len(), 1);
        assert_eq!(roster.players()[0].score, 999_990);
    }

    #[test]
    fn test_seeded_rounds_stay_in_range() {
        let mut roster = roster(&[("a", 500), ("b", 500), ("c", 500), ("d", 500)]);
        let mut rng = DeterministicRng::new(42);

        for _ in 0..200 {
            let before: Vec<(String, u32)> = scores(&roster);
            let result = simulate_round(&mut roster, &mut rng, &SimulationProfile::TICK);
            for (id, update) in &result.updates {
                let old = before.iter().find(|(k, _)| k == id.as_str()).map(|(_, s)| *s).unwrap();
                assert_eq!(update.old_score, old);
                let delta = update.new_score as i64 - old as i64;
                assert!(delta <= 69);
                assert!(delta >= -30 || update.new_score == 0);
            }
            assert!(ranks_consistent(roster.players()));
        }
    }
}
