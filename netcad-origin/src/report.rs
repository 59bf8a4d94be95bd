//! Per-key results of a sync call.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use netcad_core::OriginKind;

/// What happened to one requested key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SyncOutcome {
    /// Fetched, cached, and installed in the registry. `changed` is false
    /// when the cache already held an identical payload.
    Saved { path: PathBuf, changed: bool },
    /// The origin has no record for the key.
    NotFound,
    /// Fetching, parsing, or saving failed.
    Error { detail: String },
}

impl SyncOutcome {
    pub fn error(detail: impl Into<String>) -> Self {
        SyncOutcome::Error {
            detail: detail.into(),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SyncOutcome::Saved { .. })
    }

    /// Short status word for tables and logs.
    pub fn label(&self) -> &'static str {
        match self {
            SyncOutcome::Saved { changed: true, .. } => "saved",
            SyncOutcome::Saved { changed: false, .. } => "unchanged",
            SyncOutcome::NotFound => "not-found",
            SyncOutcome::Error { .. } => "error",
        }
    }
}

/// Outcome of every requested key, plus the order in which they completed.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub origin: OriginKind,
    pub outcomes: BTreeMap<String, SyncOutcome>,
    /// Keys in the order their outcomes arrived.
    pub completion_order: Vec<String>,
    pub duration_ms: u128,
}

impl SyncReport {
    pub(crate) fn new(origin: OriginKind) -> Self {
        Self {
            origin,
            outcomes: BTreeMap::new(),
            completion_order: Vec::new(),
            duration_ms: 0,
        }
    }

    pub(crate) fn record(&mut self, key: String, outcome: SyncOutcome) {
        self.completion_order.push(key.clone());
        self.outcomes.insert(key, outcome);
    }

    pub fn outcome(&self, key: &str) -> Option<&SyncOutcome> {
        self.outcomes.get(key)
    }

    pub fn saved(&self) -> Vec<&str> {
        self.keys_where(SyncOutcome::is_saved)
    }

    pub fn not_found(&self) -> Vec<&str> {
        self.keys_where(|o| matches!(o, SyncOutcome::NotFound))
    }

    pub fn failed(&self) -> Vec<&str> {
        self.keys_where(|o| matches!(o, SyncOutcome::Error { .. }))
    }

    pub fn all_saved(&self) -> bool {
        self.outcomes.values().all(SyncOutcome::is_saved)
    }

    fn keys_where(&self, pred: impl Fn(&SyncOutcome) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| pred(o))
            .map(|(k, _)| k.as_str())
            .collect()
    }
}
