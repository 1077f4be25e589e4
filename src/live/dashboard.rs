//! Dashboard
//!
//! The single owned store behind the live leaderboard. It composes the
//! roster, the change tracker and the live flag, and publishes one
//! snapshot per accepted command or simulation round. Publication happens
//! before the command returns, so subscribers never see stale ranks.

use serde_json::json;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::core::rng::RandomSource;
use crate::leaderboard::audit::event;
use crate::leaderboard::events::ChangeEvent;
use crate::leaderboard::player::{Player, PlayerId};
use crate::leaderboard::roster::{Roster, RosterError, RosterStats, ScoreUpdate};
use crate::leaderboard::simulate::{simulate_round, SimulationProfile, SimulationResult};
use crate::leaderboard::tracker::ChangeTracker;
use crate::live::protocol::{DashboardUpdate, RosterSnapshot};

/// Capacity of the update channel.
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Live flag as seen by the ticker.
///
/// `resumes` counts every Paused -> Live transition, so a pause and resume
/// that land between two reads still tell the ticker to restart its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveState {
    /// Whether periodic ticks may run
    pub live: bool,
    /// Number of resumes so far
    pub resumes: u64,
}

/// Leaderboard state plus its notification channel.
pub struct Dashboard {
    /// Authoritative roster
    roster: Roster,
    /// Observes every published snapshot
    tracker: ChangeTracker,
    /// Live flag, shared with the ticker
    live: watch::Sender<LiveState>,
    /// Randomness for simulated changes
    rng: Box<dyn RandomSource + Send>,
    /// Periodic tick parameters
    tick_profile: SimulationProfile,
    /// "Simulate now" parameters
    bulk_profile: SimulationProfile,
    /// Ticks run so far
    ticks: u64,
    /// Subscriber fan-out
    updates: broadcast::Sender<DashboardUpdate>,
}

impl Dashboard {
    /// Create a live dashboard.
    ///
    /// The tracker observes the initial roster immediately, so scores
    /// cached by a previous run show up as changes.
    pub fn new(roster: Roster, tracker: ChangeTracker, rng: Box<dyn RandomSource + Send>) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let (live, _) = watch::channel(LiveState { live: true, resumes: 0 });

        let mut dashboard = Self {
            roster,
            tracker,
            live,
            rng,
            tick_profile: SimulationProfile::TICK,
            bulk_profile: SimulationProfile::BULK,
            ticks: 0,
            updates,
        };
        dashboard.tracker.observe(dashboard.roster.players());
        dashboard
    }

    /// Override the simulation profiles.
    pub fn with_profiles(mut self, tick: SimulationProfile, bulk: SimulationProfile) -> Self {
        self.tick_profile = tick;
        self.bulk_profile = bulk;
        self
    }

    /// Override the initial live state.
    pub fn with_live(self, live: bool) -> Self {
        self.live.send_modify(|state| state.live = live);
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Subscribe to updates published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardUpdate> {
        self.updates.subscribe()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            revision: self.roster.revision(),
            live: self.is_live(),
            players: self.roster.players().to_vec(),
            stats: self.roster.stats(),
        }
    }

    /// Players in rank order.
    pub fn players(&self) -> &[Player] {
        self.roster.players()
    }

    /// Header figures.
    pub fn stats(&self) -> RosterStats {
        self.roster.stats()
    }

    /// Recent score changes, newest first.
    pub fn recent_changes(&self) -> Vec<ChangeEvent> {
        self.tracker.recent().cloned().collect()
    }

    /// Whether periodic ticks may run.
    pub fn is_live(&self) -> bool {
        self.live.borrow().live
    }

    /// Watch the live flag.
    pub fn watch_live(&self) -> watch::Receiver<LiveState> {
        self.live.subscribe()
    }

    /// Number of ticks run.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Add a player.
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, RosterError> {
        let id = self.roster.add_player(name)?;
        self.publish();
        Ok(id)
    }

    /// Remove a player.
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Player, RosterError> {
        let removed = self.roster.remove_player(id)?;
        self.publish();
        Ok(removed)
    }

    /// Set a player's score.
    pub fn update_score(&mut self, id: &PlayerId, new_score: f64) -> Result<ScoreUpdate, RosterError> {
        let update = self.roster.update_score(id, new_score)?;
        self.publish();
        Ok(update)
    }

    /// Apply a signed delta, clamping at 0.
    pub fn apply_delta(&mut self, id: &PlayerId, delta: i64) -> Result<ScoreUpdate, RosterError> {
        let update = self.roster.apply_delta(id, delta)?;
        self.publish();
        Ok(update)
    }

    /// Operator score change, limited to ±10,000 per step.
    pub fn adjust_score(&mut self, id: &PlayerId, delta: i64) -> Result<ScoreUpdate, RosterError> {
        let update = self.roster.adjust_score(id, delta)?;
        self.publish();
        Ok(update)
    }

    /// Pause or resume periodic ticks. Returns whether the state changed.
    pub fn set_live(&mut self, live: bool) -> bool {
        if self.is_live() == live {
            return false;
        }
        self.live.send_modify(|state| {
            state.live = live;
            if live {
                state.resumes += 1;
            }
        });
        info!("Live updates {}", if live { "resumed" } else { "paused" });
        let _ = self.updates.send(DashboardUpdate::LiveChanged { live });
        true
    }

    /// Run one periodic tick. Does nothing while paused.
    pub fn run_tick(&mut self) -> Option<SimulationResult> {
        if !self.is_live() {
            return None;
        }

        self.ticks += 1;
        let result = simulate_round(&mut self.roster, &mut *self.rng, &self.tick_profile);
        debug!("Tick {}: {} of {} players changed", self.ticks, result.updates.len(), self.roster.len());

        if result.changed() {
            self.publish();
        }
        Some(result)
    }

    /// Run one bulk simulation round, regardless of the live state.
    pub fn simulate_now(&mut self) -> SimulationResult {
        let result = simulate_round(&mut self.roster, &mut *self.rng, &self.bulk_profile);

        self.roster.audit_sink().record(event::SIMULATION_COMPLETED, json!({
            "playersUpdated": result.attempted,
        }));

        if result.changed() {
            self.publish();
        }
        result
    }

    /// Publish the current snapshot and any score changes it reveals.
    fn publish(&mut self) {
        let snapshot = self.snapshot();
        let changes = self.tracker.observe(&snapshot.players);

        // Sending only fails when nobody is subscribed.
        let _ = self.updates.send(DashboardUpdate::RosterChanged(snapshot));
        for change in changes {
            let _ = self.updates.send(DashboardUpdate::ScoreChanged(change));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
