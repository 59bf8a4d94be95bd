//! The boundary to an external source of record.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ClientError;

/// Fetches one record payload by key.
///
/// Implementations are shared across every task of a sync call and must be
/// safe for concurrent use; their own connection limits bound parallelism.
#[async_trait]
pub trait OriginClient: Send + Sync {
    /// `Ok(None)` when the origin has no record for `key`.
    async fn fetch(&self, key: &str) -> Result<Option<Value>, ClientError>;
}

/// Shared client handle for use across sync tasks.
pub type SharedClient = Arc<dyn OriginClient>;
