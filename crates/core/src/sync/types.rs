//! Types for the catalog sync orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::listing::FetchError;

/// Errors that end a sync pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Another sync pass holds the lock.
    #[error("a sync is already running")]
    AlreadyRunning,

    /// Dropping or recreating the games table failed.
    #[error("schema reset failed: {0}")]
    SchemaReset(#[source] CatalogError),

    /// Fetching a system's listing page failed.
    #[error("fetching {system} listing from {url} failed: {source}")]
    Fetch {
        system: String,
        url: String,
        #[source]
        source: FetchError,
    },

    /// Inserting a system's entries failed.
    #[error("inserting {system} entries failed: {source}")]
    Insert {
        system: String,
        #[source]
        source: CatalogError,
    },

    /// The task running the pass panicked or was aborted.
    #[error("sync task ended unexpectedly: {0}")]
    Interrupted(String),
}

impl SyncError {
    /// Which step of the pass failed.
    pub fn step(&self) -> SyncStep {
        match self {
            SyncError::AlreadyRunning | SyncError::Interrupted(_) => SyncStep::Start,
            SyncError::SchemaReset(_) => SyncStep::SchemaReset,
            SyncError::Fetch { .. } => SyncStep::Fetch,
            SyncError::Insert { .. } => SyncStep::Insert,
        }
    }

    /// The system being synced when the pass failed, if any.
    pub fn system(&self) -> Option<&str> {
        match self {
            SyncError::Fetch { system, .. } | SyncError::Insert { system, .. } => Some(system),
            _ => None,
        }
    }

    /// Short description of the failed step for API responses.
    pub fn summary(&self) -> String {
        match self {
            SyncError::AlreadyRunning => "A sync is already running".to_string(),
            SyncError::SchemaReset(_) => "Failed to reset schema".to_string(),
            SyncError::Fetch { system, .. } => format!("Failed to fetch listing for {}", system),
            SyncError::Insert { system, .. } => format!("Failed to insert data for {}", system),
            SyncError::Interrupted(_) => "Sync did not complete".to_string(),
        }
    }
}

/// Steps of a sync pass that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStep {
    Start,
    SchemaReset,
    Fetch,
    Insert,
}

/// What the orchestrator is doing right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SyncPhase {
    #[default]
    Idle,
    ResettingSchema,
    Fetching {
        system: String,
    },
    Extracting {
        system: String,
    },
    Inserting {
        system: String,
    },
}

/// Per-system result of a sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSyncReport {
    pub system: String,
    pub url: String,
    pub entries: usize,
}

/// Result of a completed sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub systems: Vec<SystemSyncReport>,
    pub total_entries: usize,
}

/// How the last sync pass ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SyncOutcome {
    Succeeded {
        report: SyncReport,
    },
    Failed {
        step: SyncStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        system: Option<String>,
        error: String,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        /// Systems fully inserted before the failure; their entries remain.
        completed_systems: Vec<SystemSyncReport>,
    },
}

/// Current status of the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Whether a sync pass is running.
    pub running: bool,
    /// Current phase (Idle when not running).
    pub phase: SyncPhase,
    /// Outcome of the most recent finished pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<SyncOutcome>,
}
