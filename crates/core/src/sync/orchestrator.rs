//! Catalog sync orchestrator implementation.
//!
//! One pass: reset the schema, then for each configured system fetch its
//! listing, extract the archive anchors and insert them. The pass stops at
//! the first failing system; systems inserted before it are not rolled back.
//!
//! A pass runs on its own task. Dropping the future returned by
//! [`SyncOrchestrator::run`] does not cancel it.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::catalog::{CatalogError, GameCatalog, NewGameEntry};
use crate::config::SourceConfig;
use crate::listing::{extract_entries, ListingFetcher};
use crate::metrics;

use super::types::{
    SyncError, SyncOutcome, SyncPhase, SyncReport, SyncStatus, SyncStep, SystemSyncReport,
};

/// Drives full catalog synchronizations. At most one pass runs at a time.
pub struct SyncOrchestrator {
    pass: SyncPass,
    run_lock: Arc<Mutex<()>>,
}

impl SyncOrchestrator {
    pub fn new(
        catalog: Arc<dyn GameCatalog>,
        fetcher: Arc<dyn ListingFetcher>,
        source: SourceConfig,
    ) -> Self {
        Self {
            pass: SyncPass {
                catalog,
                fetcher,
                source: Arc::new(source),
                status: Arc::new(RwLock::new(SyncStatus::default())),
            },
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Configured system keys, in sync order.
    pub fn systems(&self) -> Vec<String> {
        self.pass.source.system_keys()
    }

    /// Snapshot of the current status.
    pub async fn status(&self) -> SyncStatus {
        self.pass.status.read().await.clone()
    }

    /// Run a full sync pass and wait for it to finish.
    ///
    /// Returns [`SyncError::AlreadyRunning`] immediately if another pass is
    /// in progress; callers are rejected, not queued.
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let lock = match Arc::clone(&self.run_lock).try_lock_owned() {
            Ok(lock) => lock,
            Err(_) => {
                warn!("Sync requested while another sync is running");
                metrics::SYNC_RUNS.with_label_values(&["rejected"]).inc();
                return Err(SyncError::AlreadyRunning);
            }
        };

        let pass = self.pass.clone();
        let handle = tokio::spawn(async move {
            let _lock = lock;
            pass.execute().await
        });

        handle.await.map_err(|e| {
            error!("Sync task failed: {}", e);
            SyncError::Interrupted(e.to_string())
        })?
    }
}

/// Everything a pass needs, owned so it can run on a spawned task.
#[derive(Clone)]
struct SyncPass {
    catalog: Arc<dyn GameCatalog>,
    fetcher: Arc<dyn ListingFetcher>,
    source: Arc<SourceConfig>,
    status: Arc<RwLock<SyncStatus>>,
}

impl SyncPass {
    async fn execute(self) -> Result<SyncReport, SyncError> {
        let started = Instant::now();
        let started_at = Utc::now();
        let mut guard = StatusGuard::new(Arc::clone(&self.status), started_at);
        {
            let mut status = self.status.write().await;
            status.running = true;
        }
        info!(systems = self.source.systems.len(), "Starting catalog sync");

        let result = self.run_pass(started_at, &mut guard.completed).await;

        metrics::SYNC_DURATION.observe(started.elapsed().as_secs_f64());

        let outcome = match &result {
            Ok(report) => {
                info!(
                    total_entries = report.total_entries,
                    "Catalog sync completed"
                );
                metrics::SYNC_RUNS.with_label_values(&["success"]).inc();
                SyncOutcome::Succeeded {
                    report: report.clone(),
                }
            }
            Err(e) => {
                error!(
                    step = ?e.step(),
                    completed_systems = guard.completed.len(),
                    "Catalog sync failed: {}",
                    e
                );
                metrics::SYNC_RUNS.with_label_values(&["failed"]).inc();
                SyncOutcome::Failed {
                    step: e.step(),
                    system: e.system().map(str::to_string),
                    error: e.to_string(),
                    started_at,
                    finished_at: Utc::now(),
                    completed_systems: std::mem::take(&mut guard.completed),
                }
            }
        };

        guard.finish(outcome).await;
        result
    }

    async fn run_pass(
        &self,
        started_at: DateTime<Utc>,
        completed: &mut Vec<SystemSyncReport>,
    ) -> Result<SyncReport, SyncError> {
        self.set_phase(SyncPhase::ResettingSchema).await;
        let catalog = Arc::clone(&self.catalog);
        blocking(move || catalog.reset_schema())
            .await
            .map_err(SyncError::SchemaReset)?;

        for (system, url) in self.source.listings() {
            let entries = self.sync_system(system, &url).await?;
            completed.push(SystemSyncReport {
                system: system.to_string(),
                url,
                entries,
            });
        }

        let total_entries = completed.iter().map(|s| s.entries).sum();
        Ok(SyncReport {
            started_at,
            finished_at: Utc::now(),
            systems: completed.clone(),
            total_entries,
        })
    }

    async fn sync_system(&self, system: &str, url: &str) -> Result<usize, SyncError> {
        info!(system = system, "Scraping {}", system);

        self.set_phase(SyncPhase::Fetching {
            system: system.to_string(),
        })
        .await;
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => {
                metrics::LISTING_FETCHES
                    .with_label_values(&[system, "success"])
                    .inc();
                html
            }
            Err(source) => {
                metrics::LISTING_FETCHES
                    .with_label_values(&[system, "error"])
                    .inc();
                return Err(SyncError::Fetch {
                    system: system.to_string(),
                    url: url.to_string(),
                    source,
                });
            }
        };

        self.set_phase(SyncPhase::Extracting {
            system: system.to_string(),
        })
        .await;
        let entries: Vec<NewGameEntry> = extract_entries(&html, url)
            .into_iter()
            .map(|entry| entry.into_new_entry(system))
            .collect();
        debug!(system = system, entries = entries.len(), "Extracted entries");

        self.set_phase(SyncPhase::Inserting {
            system: system.to_string(),
        })
        .await;
        let catalog = Arc::clone(&self.catalog);
        let inserted = blocking(move || catalog.insert_all(&entries))
            .await
            .map_err(|source| SyncError::Insert {
                system: system.to_string(),
                source,
            })?;

        metrics::ENTRIES_INSERTED
            .with_label_values(&[system])
            .inc_by(inserted as u64);
        info!(system = system, entries = inserted, "Inserted entries");

        Ok(inserted)
    }

    async fn set_phase(&self, phase: SyncPhase) {
        self.status.write().await.phase = phase;
    }
}

/// Run blocking catalog work off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, CatalogError>
where
    F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CatalogError::Internal(format!("catalog task failed: {}", e)))?
}

/// Writes a final status when a pass ends without recording its outcome.
///
/// Covers a panicking pass and a task torn down with its runtime; the
/// outcome is a failure at the step the phase last pointed to.
struct StatusGuard {
    status: Arc<RwLock<SyncStatus>>,
    started_at: DateTime<Utc>,
    completed: Vec<SystemSyncReport>,
    finished: bool,
}

impl StatusGuard {
    fn new(status: Arc<RwLock<SyncStatus>>, started_at: DateTime<Utc>) -> Self {
        Self {
            status,
            started_at,
            completed: Vec::new(),
            finished: false,
        }
    }

    async fn finish(mut self, outcome: SyncOutcome) {
        let mut status = self.status.write().await;
        status.running = false;
        status.phase = SyncPhase::Idle;
        status.last_outcome = Some(outcome);
        drop(status);
        self.finished = true;
    }
}

impl Drop for StatusGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        warn!("Sync pass ended before recording its outcome");
        metrics::SYNC_RUNS.with_label_values(&["failed"]).inc();

        let started_at = self.started_at;
        let completed = std::mem::take(&mut self.completed);
        let finalize = move |status: &mut SyncStatus| {
            let (step, system) = interrupted_at(&status.phase);
            status.running = false;
            status.phase = SyncPhase::Idle;
            status.last_outcome = Some(SyncOutcome::Failed {
                step,
                system,
                error: "sync pass ended before completing".to_string(),
                started_at,
                finished_at: Utc::now(),
                completed_systems: completed,
            });
        };

        match self.status.try_write() {
            Ok(mut status) => finalize(&mut *status),
            Err(_) => {
                let status = Arc::clone(&self.status);
                match tokio::runtime::Handle::try_current() {
                    Ok(runtime) => {
                        runtime.spawn(async move {
                            finalize(&mut *status.write().await);
                        });
                    }
                    Err(_) => warn!("tokio runtime unavailable; sync status could not be reset"),
                }
            }
        }
    }
}

/// The failed step and system implied by the phase a pass stopped in.
fn interrupted_at(phase: &SyncPhase) -> (SyncStep, Option<String>) {
    match phase {
        SyncPhase::Idle => (SyncStep::Start, None),
        SyncPhase::ResettingSchema => (SyncStep::SchemaReset, None),
        SyncPhase::Fetching { system } | SyncPhase::Extracting { system } => {
            (SyncStep::Fetch, Some(system.clone()))
        }
        SyncPhase::Inserting { system } => (SyncStep::Insert, Some(system.clone())),
    }
}
