//! Audit Trail
//!
//! Every accepted and rejected roster mutation is reported as an
//! `(event, details)` pair. The default sink writes warning-level
//! tracing records tagged `[SECURITY]`.

use std::sync::{Arc, Mutex};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

/// Tag attached to every audit record.
pub const AUDIT_TAG: &str = "[SECURITY]";

/// Audit event names.
pub mod event {
    /// Player added.
    pub const PLAYER_ADDED: &str = "Player added successfully";
    /// Add rejected by the name validator.
    pub const ADD_INVALID_NAME: &str = "Failed to add player - validation error";
    /// Add rejected as a duplicate name.
    pub const ADD_DUPLICATE_NAME: &str = "Failed to add player - duplicate name";
    /// Generated avatar failed the trusted-host check.
    pub const INVALID_AVATAR: &str = "Invalid avatar URL generated";
    /// Player removed.
    pub const PLAYER_REMOVED: &str = "Player removed";
    /// Remove of an unknown id.
    pub const REMOVE_NOT_FOUND: &str = "Failed to remove player - not found";
    /// Score changed.
    pub const SCORE_UPDATED: &str = "Score updated";
    /// Score update rejected by validation.
    pub const SCORE_INVALID: &str = "Invalid score update attempt";
    /// Score update for an unknown id.
    pub const SCORE_NOT_FOUND: &str = "Failed to update score - player not found";
    /// Manual change above the per-step limit.
    pub const EXCESSIVE_CHANGE: &str = "Excessive score change attempt";
    /// Bulk simulation finished.
    pub const SIMULATION_COMPLETED: &str = "Random score simulation completed";
}

/// Destination for audit records.
pub trait AuditSink: Send + Sync {
    /// Record one audit event.
    fn record(&self, event: &str, details: Value);
}

/// Writes audit records as `warn!` tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &str, details: Value) {
        let timestamp = Utc::now().to_rfc3339();
        warn!(target: "live_rank::audit", "{} {}: {} {}", AUDIT_TAG, timestamp, event, details);
    }
}

/// A captured audit record.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// When the record was captured
    pub timestamp: DateTime<Utc>,
    /// Event name
    pub event: String,
    /// Structured context
    pub details: Value,
}

/// Keeps audit records in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// roster and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl MemoryAuditSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all records so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Names of all events so far, oldest first.
    pub fn events(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.event).collect()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &str, details: Value) {
        if let Ok(mut records) = self.records.lock() {
            records.push(AuditRecord {
                timestamp: Utc::now(),
                event: event.to_string(),
                details,
            });
        }
    }
}
