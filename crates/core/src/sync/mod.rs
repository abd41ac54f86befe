//! Catalog synchronization.
//!
//! The orchestrator rebuilds the whole catalog on each pass:
//! - **Reset**: drop and recreate the games table
//! - **Per system**: fetch listing -> extract entries -> insert, strictly sequential
//! - **Failure**: the pass stops; systems already inserted stay in the catalog

mod orchestrator;
mod types;

pub use orchestrator::SyncOrchestrator;
pub use types::{
    SyncError, SyncOutcome, SyncPhase, SyncReport, SyncStatus, SyncStep, SystemSyncReport,
};
