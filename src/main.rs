//! Live Rank Arena
//!
//! Demo driver for the live leaderboard core. Seeds the roster, applies a
//! few operator commands, lets the live feed tick, then prints standings.

use anyhow::Result;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use live_rank::{
    VERSION, DashboardUpdate, LiveSession, SessionConfig, RosterSnapshot,
};

/// Ticks to let run before the bulk simulation.
const DEMO_TICKS: u32 = 3;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Live Rank Arena v{}", VERSION);

    let config = SessionConfig::from_env();
    info!("Tick period: {} ms", config.tick_period.as_millis());
    if let Some(path) = &config.cache_path {
        info!("Previous-score cache: {}", path.display());
    }

    let mut session = LiveSession::from_config(&config);
    let mut updates = session.subscribe().await;

    demo_commands(&session).await;

    // Let the live feed run
    if !session.snapshot().await.live {
        session.set_live(true).await;
    }
    info!("=== Live Feed ({} ticks) ===", DEMO_TICKS);
    tokio::time::sleep(config.tick_period * DEMO_TICKS + config.tick_period / 10).await;

    // Pause and run one bulk round
    session.set_live(false).await;
    let result = session.simulate_now().await;
    info!("Simulated {} players ({} changed, {} refused)",
          result.attempted, result.updates.len(), result.rejected.len());

    session.stop().await;

    let (mut rosters, mut changes) = (0, 0);
    loop {
        match updates.try_recv() {
            Ok(DashboardUpdate::RosterChanged(_)) => rosters += 1,
            Ok(DashboardUpdate::ScoreChanged(_)) => changes += 1,
            Ok(DashboardUpdate::LiveChanged { live }) => info!("Feed is now {}", if live { "live" } else { "paused" }),
            Err(TryRecvError::Lagged(n)) => warn!("Missed {} updates", n),
            Err(_) => break,
        }
    }
    info!("Received {} roster updates and {} score changes", rosters, changes);

    let dashboard = session.handle();
    let dashboard = dashboard.lock().await;
    print_standings(&dashboard.snapshot());

    info!("=== Recent Changes ===");
    for change in dashboard.recent_changes() {
        info!("{} {} ({} -> {}) at {}",
              change.player_name, change.delta_label(),
              change.old_score, change.new_score,
              change.timestamp.format("%H:%M:%S"));
    }

    let last = DashboardUpdate::RosterChanged(dashboard.snapshot());
    info!("Final update payload: {} bytes of JSON", last.to_json()?.len());

    Ok(())
}

/// Exercise the operator commands, including rejected ones.
async fn demo_commands(session: &LiveSession) {
    let dashboard = session.handle();
    let mut dashboard = dashboard.lock().await;

    info!("=== Operator Commands ===");

    for name in ["Frank Green", "alice johnson", "X", "Bad!Name"] {
        match dashboard.add_player(name) {
            Ok(id) => info!("Added {:?} as {}", name, id),
            Err(e) => warn!("Add {:?} rejected [{}]: {}", name, e.code(), e),
        }
    }

    let Some(last) = dashboard.players().last().map(|p| p.id.clone()) else {
        return;
    };

    match dashboard.adjust_score(&last, 2_600) {
        Ok(update) => info!("Adjusted {}: {} -> {}", last, update.old_score, update.new_score),
        Err(e) => warn!("Adjust rejected: {}", e),
    }

    if let Err(e) = dashboard.adjust_score(&last, 50_000) {
        warn!("Adjust rejected [{}]: {}", e.code(), e);
    }
    if let Err(e) = dashboard.update_score(&last, -5.0) {
        warn!("Update rejected [{}]: {}", e.code(), e);
    }

    print_standings(&dashboard.snapshot());
}

fn print_standings(snapshot: &RosterSnapshot) {
    info!("=== Standings (revision {}) ===", snapshot.revision);
    for player in &snapshot.players {
        info!("#{}: {} - {}{}", player.rank, player.name, player.score,
              if player.is_online { "" } else { " (offline)" });
    }
    let stats = &snapshot.stats;
    info!("{} players, {} online, average {}, top {}",
          stats.total_players, stats.online_players, stats.average_score, stats.top_score);
}
