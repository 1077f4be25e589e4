//! Live Layer
//!
//! Drives the leaderboard over time: the dashboard store with its update
//! channel, the cancellable tick timer, and the messages subscribers see.
//! This layer is **non-deterministic** (timers, wall-clock timestamps); all
//! ranking and validation runs through `leaderboard/`.

pub mod dashboard;
pub mod protocol;
pub mod session;

pub use dashboard::{Dashboard, LiveState};
pub use protocol::{DashboardUpdate, RosterSnapshot};
pub use session::{LiveSession, SessionConfig};
