//! Batched sync of location statuses against the warehouse server.
//!
//! Locations are checked in fixed-size batches. Every lookup in a batch
//! runs concurrently; batches themselves run strictly in sequence, which
//! bounds outstanding requests and keeps progress monotonic. Results are
//! applied after each batch, so partial progress survives.

use futures_util::future::join_all;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::SyncConfig;
use crate::document::Document;
use crate::item::{ItemId, Status};
use crate::warehouse::{LocationCheck, StockItem};

/// Locations checked per batch, also the concurrency bound.
pub const SYNC_BATCH_SIZE: usize = 10;

/// Cached per-location stock lists from the last sync pass, keyed by
/// item id. Entries are overwritten wholesale, never merged.
pub type ResultCache = HashMap<ItemId, Vec<StockItem>>;

/// Why a sync pass could not start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    /// Configuration is incomplete; the user is sent to settings.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
    /// No locations in the document, nothing to do.
    #[error("no locations to sync")]
    NoLocations,
    /// A pass is already running; re-entry is refused, not interleaved.
    #[error("sync already in progress")]
    AlreadyRunning,
}

/// One location to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub id: ItemId,
    pub name: String,
}

/// Everything learned from one completed batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Status patches for the document.
    pub statuses: HashMap<ItemId, Status>,
    /// Full per-location stock lists for the result cache.
    pub results: Vec<(ItemId, Vec<StockItem>)>,
    /// Locations checked so far, including this batch.
    pub checked: usize,
    /// Total locations in this pass.
    pub total: usize,
}

/// Progress and the re-entrancy guard, owned by the app shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncState {
    running: bool,
    checked: usize,
    total: usize,
}

impl SyncState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.checked, self.total)
    }

    pub fn start(&mut self, total: usize) -> Result<(), SyncError> {
        if self.running {
            return Err(SyncError::AlreadyRunning);
        }
        self.running = true;
        self.checked = 0;
        self.total = total;
        Ok(())
    }

    pub fn advance(&mut self, checked: usize) {
        self.checked = checked;
    }

    /// Clear the running flag and reset counters. Called on every
    /// completion path, including failures.
    pub fn finish(&mut self) {
        self.running = false;
        self.checked = 0;
        self.total = 0;
    }
}

/// Validate configuration and collect the locations to check.
pub fn preflight(config: &SyncConfig, document: &Document) -> Result<Vec<SyncTarget>, SyncError> {
    if let Some(field) = config.missing() {
        return Err(SyncError::MissingConfig(field));
    }
    let targets: Vec<SyncTarget> = document
        .locations()
        .map(|loc| SyncTarget { id: loc.id, name: loc.name.clone() })
        .collect();
    if targets.is_empty() {
        return Err(SyncError::NoLocations);
    }
    Ok(targets)
}

/// Run one sync pass. `on_batch` fires after each batch completes, with
/// results ready to apply; the caller patches the document, overwrites
/// the cache, and reports progress.
pub async fn run_sync<C>(targets: &[SyncTarget], checker: &C, mut on_batch: impl FnMut(BatchOutcome))
where
    C: LocationCheck + ?Sized,
{
    let total = targets.len();
    let mut checked = 0;
    for batch in targets.chunks(SYNC_BATCH_SIZE) {
        let lookups = batch.iter().map(|target| checker.check(&target.name));
        let outcomes = join_all(lookups).await;
        checked += batch.len();
        let mut statuses = HashMap::new();
        let mut results = Vec::new();
        for (target, outcome) in batch.iter().zip(outcomes) {
            statuses.insert(target.id, outcome.status);
            results.push((target.id, outcome.items));
        }
        log::debug!("sync batch applied, {checked}/{total} locations checked");
        on_batch(BatchOutcome { statuses, results, checked, total });
    }
}
