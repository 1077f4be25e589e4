//! Leaderboard Logic
//!
//! Everything that decides what the roster looks like. Synchronous and
//! free of timers; the `live` module drives it.
//!
//! ## Module Structure
//!
//! - `validate`: Name/score validation and sanitizing
//! - `player`: Player record, ids, seed roster
//! - `ranking`: Stable descending-score ranking
//! - `roster`: The roster store and its mutations
//! - `simulate`: One round of the simulated score feed
//! - `events`: Score change events
//! - `tracker`: Change detection against previous scores
//! - `cache`: Previous-score persistence
//! - `audit`: Audit sink for accepted and rejected mutations

pub mod validate;
pub mod player;
pub mod ranking;
pub mod roster;
pub mod simulate;
pub mod events;
pub mod tracker;
pub mod cache;
pub mod audit;

// Re-export key types
pub use validate::{NameError, ScoreError, ValidationError, MAX_SCORE};
pub use player::{Player, PlayerId};
pub use roster::{Roster, RosterError, RosterStats, ScoreUpdate};
pub use simulate::{SimulationProfile, SimulationResult};
pub use events::ChangeEvent;
pub use tracker::ChangeTracker;
pub use cache::{ScoreCache, ScoreMap, MemoryScoreCache, JsonFileScoreCache, CacheError};
pub use audit::{AuditSink, TracingAuditSink, MemoryAuditSink};
