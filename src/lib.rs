//! # Live Rank Arena
//!
//! Core of a live leaderboard dashboard: a validated in-memory roster,
//! deterministic ranking, a simulated score feed and change tracking.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     LIVE RANK ARENA                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Primitives                               │
//! │  ├── rng.rs       - Xorshift128+ PRNG, RandomSource trait    │
//! │  └── avatar.rs    - Avatar derivation and URL allowlist      │
//! │                                                              │
//! │  leaderboard/     - Roster logic (synchronous)               │
//! │  ├── validate.rs  - Name/score validation                    │
//! │  ├── player.rs    - Player record and seed roster            │
//! │  ├── ranking.rs   - Stable descending ranking                │
//! │  ├── roster.rs    - Roster store and mutations               │
//! │  ├── simulate.rs  - Simulated score rounds                   │
//! │  ├── events.rs    - Score change events                      │
//! │  ├── tracker.rs   - Change detection                         │
//! │  ├── cache.rs     - Previous-score persistence               │
//! │  └── audit.rs     - Audit sink                               │
//! │                                                              │
//! │  live/            - Time-driven layer (async)                │
//! │  ├── dashboard.rs - Owned store + update channel             │
//! │  ├── session.rs   - Cancellable tick timer                   │
//! │  └── protocol.rs  - Subscriber messages                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Guarantee
//!
//! Every accepted mutation re-ranks the roster before anything is
//! published:
//! - Ranks are always exactly `1..=n` in display order
//! - Ties keep their previous relative order
//! - Rejected mutations leave the roster untouched and publish nothing
//!
//! The simulated feed goes through the same validated path as operator
//! edits, so it can never produce a score outside `0..=1_000_000`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod leaderboard;
pub mod live;

// Re-export commonly used types
pub use core::rng::{DeterministicRng, RandomSource};
pub use leaderboard::player::{Player, PlayerId};
pub use leaderboard::roster::{Roster, RosterError, RosterStats};
pub use leaderboard::events::ChangeEvent;
pub use live::dashboard::Dashboard;
pub use live::protocol::{DashboardUpdate, RosterSnapshot};
pub use live::session::{LiveSession, SessionConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Live tick period (ms)
pub const TICK_PERIOD_MS: u64 = 3000;

/// Maximum retained score changes
pub const RECENT_CHANGES: usize = leaderboard::tracker::RECENT_CHANGES_CAPACITY;
