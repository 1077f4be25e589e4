//! Live Session
//!
//! Owns the background ticker that drives the simulated score feed.
//!
//! ## Lifecycle
//!
//! ```text
//! start() ──► Live ◄──── set_live(true) ────┐
//!              │                             │
//!              └──── set_live(false) ──► Paused
//!
//! stop() / drop ──► ticker cancelled (from any state)
//! ```
//!
//! The period restarts on resume, and no tick runs while paused or after
//! the session is stopped.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::core::rng::{DeterministicRng, RandomSource};
use crate::leaderboard::audit::TracingAuditSink;
use crate::leaderboard::cache::{JsonFileScoreCache, MemoryScoreCache, ScoreCache};
use crate::leaderboard::roster::Roster;
use crate::leaderboard::simulate::{SimulationProfile, SimulationResult};
use crate::leaderboard::tracker::ChangeTracker;
use crate::live::dashboard::{Dashboard, LiveState};
use crate::live::protocol::{DashboardUpdate, RosterSnapshot};

/// Default tick period.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(crate::TICK_PERIOD_MS);

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Time between periodic ticks
    pub tick_period: Duration,
    /// Whether the feed starts live
    pub start_live: bool,
    /// Fixed seed for the simulated feed (random when unset)
    pub rng_seed: Option<u64>,
    /// JSON file for previous scores (in-memory when unset)
    pub cache_path: Option<PathBuf>,
    /// Periodic tick parameters
    pub tick_profile: SimulationProfile,
    /// "Simulate now" parameters
    pub bulk_profile: SimulationProfile,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            start_live: true,
            rng_seed: None,
            cache_path: None,
            tick_profile: SimulationProfile::TICK,
            bulk_profile: SimulationProfile::BULK,
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables.
    ///
    /// - `LIVE_RANK_TICK_MS`: tick period in milliseconds
    /// - `LIVE_RANK_START_PAUSED`: `true`/`1` to start paused
    /// - `LIVE_RANK_SEED`: fixed RNG seed
    /// - `LIVE_RANK_CACHE_PATH`: previous-score cache file
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let tick_period = match std::env::var("LIVE_RANK_TICK_MS") {
            Ok(v) => match v.parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    warn!("Ignoring invalid LIVE_RANK_TICK_MS={:?}", v);
                    defaults.tick_period
                }
            },
            Err(_) => defaults.tick_period,
        };

        let rng_seed = std::env::var("LIVE_RANK_SEED").ok().and_then(|v| match v.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!("Ignoring invalid LIVE_RANK_SEED={:?}", v);
                None
            }
        });

        Self {
            tick_period,
            start_live: !std::env::var("LIVE_RANK_START_PAUSED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            rng_seed,
            cache_path: std::env::var("LIVE_RANK_CACHE_PATH").ok().map(PathBuf::from),
            ..defaults
        }
    }

    /// Build a dashboard over the seed roster.
    pub fn build_dashboard(&self) -> Dashboard {
        let roster = Roster::seeded(Arc::new(TracingAuditSink));

        let cache: Box<dyn ScoreCache> = match &self.cache_path {
            Some(path) => Box::new(JsonFileScoreCache::new(path.clone())),
            None => Box::new(MemoryScoreCache::new()),
        };

        let rng: Box<dyn RandomSource + Send> = match self.rng_seed {
            Some(seed) => Box::new(DeterministicRng::new(seed)),
            None => Box::new(DeterministicRng::from_entropy()),
        };

        Dashboard::new(roster, ChangeTracker::new(cache), rng)
            .with_profiles(self.tick_profile, self.bulk_profile)
            .with_live(self.start_live)
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// A dashboard with its background ticker.
pub struct LiveSession {
    /// Shared dashboard
    dashboard: Arc<Mutex<Dashboard>>,
    /// Shutdown signal
    shutdown_tx: broadcast::Sender<()>,
    /// Ticker task
    ticker: Option<JoinHandle<()>>,
}

impl LiveSession {
    /// Build a dashboard from config and start ticking.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::start(config.build_dashboard(), config.tick_period)
    }

    /// Start ticking the given dashboard every `period`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(dashboard: Dashboard, period: Duration) -> Self {
        let live = dashboard.is_live();
        let live_rx = dashboard.watch_live();
        let resumes = live_rx.borrow().resumes;
        let dashboard = Arc::new(Mutex::new(dashboard));
        let (shutdown_tx, _) = broadcast::channel(1);

        // Schedule from now, not from the task's first poll.
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let ticker = tokio::spawn(run_ticker(
            dashboard.clone(),
            interval,
            resumes,
            live_rx,
            shutdown_tx.subscribe(),
        ));

        info!("Live session started ({} ms period, {})", period.as_millis(), if live { "live" } else { "paused" });

        Self {
            dashboard,
            shutdown_tx,
            ticker: Some(ticker),
        }
    }

    /// Shared handle for issuing commands directly.
    pub fn handle(&self) -> Arc<Mutex<Dashboard>> {
        self.dashboard.clone()
    }

    /// Subscribe to dashboard updates.
    pub async fn subscribe(&self) -> broadcast::Receiver<DashboardUpdate> {
        self.dashboard.lock().await.subscribe()
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> RosterSnapshot {
        self.dashboard.lock().await.snapshot()
    }

    /// Pause or resume the feed. Returns whether the state changed.
    pub async fn set_live(&self, live: bool) -> bool {
        self.dashboard.lock().await.set_live(live)
    }

    /// Run one bulk simulation round now.
    pub async fn simulate_now(&self) -> SimulationResult {
        self.dashboard.lock().await.simulate_now()
    }

    /// Whether the ticker is still running.
    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the ticker and wait for it to exit.
    pub async fn stop(&mut self) {
        let _ = self.shutdown_tx.send(());

        if let Some(ticker) = self.ticker.take() {
            if let Err(e) = ticker.await {
                warn!("Ticker task ended abnormally: {}", e);
            }
        }
        info!("Live session stopped");
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

/// Ticker loop: tick on the period while live, wait for resume while paused.
async fn run_ticker(
    dashboard: Arc<Mutex<Dashboard>>,
    mut interval: Interval,
    mut resumes: u64,
    mut live_rx: watch::Receiver<LiveState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut state = *live_rx.borrow_and_update();

    loop {
        // A resume restarts the period even if the pause was never seen.
        if state.resumes != resumes {
            resumes = state.resumes;
            interval.reset();
        }

        if state.live {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                changed = live_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    state = *live_rx.borrow_and_update();
                }
                _ = interval.tick() => {
                    // The flag is re-checked under the lock by run_tick.
                    dashboard.lock().await.run_tick();
                }
            }
        } else {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                changed = live_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    state = *live_rx.borrow_and_update();
                }
            }
        }
    }

    debug!("Ticker exited");
}

// =============================================================================
// TESTS
// =============================================================================
