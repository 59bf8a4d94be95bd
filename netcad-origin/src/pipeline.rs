//! Concurrent fetch → construct → save → register over a batch of keys.
//!
//! One task is spawned per distinct key. Each task sends exactly one
//! `(key, outcome)` pair on a shared channel, and [`sync`] drains the
//! channel in completion order. A failure for one key never aborts the
//! others.
//!
//! Dropping the future returned by [`sync`] stops draining but does not
//! cancel tasks already spawned; entries they have written stay valid.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::mpsc;

use netcad_core::{
    CacheStore, FromPayload, OriginKind, OriginRecord, RegistryContext, TypedRegistry,
};

use crate::client::SharedClient;
use crate::error::SyncError;
pub use crate::report::{SyncOutcome, SyncReport};

/// Sync `keys` of record kind `R` from `client` into `cache` and `ctx`.
///
/// Duplicate keys collapse to a single fetch. The only batch-level error is
/// an empty key set; everything else is reported per key.
pub async fn sync<R, I, S>(
    ctx: Arc<RegistryContext>,
    client: SharedClient,
    cache: CacheStore,
    keys: I,
) -> Result<SyncReport, SyncError>
where
    R: FromPayload,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let keys: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
    if keys.is_empty() {
        return Err(SyncError::EmptyBatch);
    }

    let kind = R::kind();
    let registry = ctx.origins(&kind);
    let started = Instant::now();
    tracing::info!(origin = %kind, keys = keys.len(), "sync started");

    let (tx, mut rx) = mpsc::unbounded_channel::<(String, SyncOutcome)>();
    for key in &keys {
        let tx = tx.clone();
        let client = Arc::clone(&client);
        let cache = cache.clone();
        let registry = Arc::clone(&registry);
        let key = key.clone();
        tokio::spawn(async move {
            let outcome = sync_one::<R>(client, cache, &registry, &key).await;
            // The receiver only goes away if the caller stopped waiting.
            let _ = tx.send((key, outcome));
        });
    }
    drop(tx);

    let mut report = SyncReport::new(kind.clone());
    while let Some((key, outcome)) = rx.recv().await {
        log_outcome(&kind, &key, &outcome);
        report.record(key, outcome);
    }

    // A task that panicked dropped its sender without reporting.
    for key in keys {
        if !report.outcomes.contains_key(&key) {
            let outcome = SyncOutcome::error("sync task ended without reporting");
            log_outcome(&kind, &key, &outcome);
            report.record(key, outcome);
        }
    }

    report.duration_ms = started.elapsed().as_millis();
    tracing::info!(
        origin = %kind,
        saved = report.saved().len(),
        not_found = report.not_found().len(),
        failed = report.failed().len(),
        duration_ms = report.duration_ms as u64,
        "sync finished"
    );
    Ok(report)
}

async fn sync_one<R: FromPayload>(
    client: SharedClient,
    cache: CacheStore,
    registry: &TypedRegistry<dyn OriginRecord>,
    key: &str,
) -> SyncOutcome {
    let payload = match client.fetch(key).await {
        Ok(Some(payload)) if !is_empty_payload(&payload) => payload,
        Ok(_) => return SyncOutcome::NotFound,
        Err(err) => return SyncOutcome::error(format!("fetch failed: {err}")),
    };

    let record = match R::from_payload(payload) {
        Ok(record) => Arc::new(record),
        Err(err) => return SyncOutcome::error(err.to_string()),
    };
    if record.key() != key {
        tracing::warn!(key, record_key = record.key(), "origin returned a different key");
    }

    let to_save = Arc::clone(&record);
    let written = match tokio::task::spawn_blocking(move || to_save.save(&cache)).await {
        Ok(Ok(written)) => written,
        Ok(Err(err)) => return SyncOutcome::error(err.to_string()),
        Err(err) => return SyncOutcome::error(format!("cache write task failed: {err}")),
    };

    let record: Arc<dyn OriginRecord> = record;
    if let Err(err) = registry.register(record) {
        return SyncOutcome::error(err.to_string());
    }

    SyncOutcome::Saved {
        path: written.path().to_path_buf(),
        changed: written.changed(),
    }
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn log_outcome(kind: &OriginKind, key: &str, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Saved { path, changed } => {
            tracing::info!(origin = %kind, key, changed, path = %path.display(), "saved");
        }
        SyncOutcome::NotFound => {
            tracing::error!(origin = %kind, key, "not found in origin");
        }
        SyncOutcome::Error { detail } => {
            tracing::error!(origin = %kind, key, %detail, "sync failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
