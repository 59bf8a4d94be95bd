//! Origin records: definitions fetched from an external source of record.
//!
//! A record kind implements [`OriginRecord`] for querying and
//! [`FromPayload`] for construction from a fetched (or cached) payload.
//! Derived fields are built once in `from_payload` and never lazily.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{CacheStore, CacheWrite};
use crate::context::RegistryContext;
use crate::error::{CacheError, OriginError};
use crate::registry::{category, Registrant};

/// Which external source produced a record, and what kind of entity it is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OriginKind {
    pub source: String,
    pub entity: String,
}

impl OriginKind {
    pub fn new(source: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            entity: entity.into(),
        }
    }

    /// Registry category holding records of this kind.
    pub fn category(&self) -> String {
        format!("{}:{self}", category::ORIGINS_PREFIX)
    }
}

impl fmt::Display for OriginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.entity)
    }
}

/// Interface definition as reported by the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSpec {
    pub if_name: String,
    pub if_type: String,
    pub if_type_label: String,
}

/// Query surface shared by every origin record kind.
///
/// [`Nameable::name`](crate::registry::Nameable::name) must return the
/// same value as [`key`](Self::key).
pub trait OriginRecord: Registrant {
    fn origin_kind(&self) -> &OriginKind;

    /// Product/model identifier, unique within the origin kind.
    fn key(&self) -> &str;

    /// Payload exactly as received from the origin.
    fn raw_payload(&self) -> &Value;

    /// Sub-component (interface) names in payload order.
    fn subcomponent_names(&self) -> Vec<&str>;

    /// Indexed lookup; [`OriginError::NotFound`] if the payload has no
    /// sub-component called `name`.
    fn get_subcomponent(&self, name: &str) -> Result<InterfaceSpec, OriginError>;

    /// Write this record to the cache, replacing any previous entry.
    fn save(&self, cache: &CacheStore) -> Result<CacheWrite, CacheError> {
        cache.write(self.origin_kind(), self.key(), self.raw_payload())
    }
}

/// Construction of a record kind from its payload.
pub trait FromPayload: OriginRecord + Sized + 'static {
    fn kind() -> OriginKind;

    /// Parse `payload`, failing with [`OriginError::MalformedPayload`] if
    /// the key or a derived field is absent.
    fn from_payload(payload: Value) -> Result<Self, OriginError>;

    /// Rebuild a record from its cache entry; `None` if never cached.
    fn load(cache: &CacheStore, key: &str) -> Result<Option<Self>, OriginError> {
        match cache.load(&Self::kind(), key)? {
            Some(entry) => Ok(Some(Self::from_payload(entry.payload)?)),
            None => Ok(None),
        }
    }
}

/// Read-through lookup: registry first, then cache.
///
/// A record loaded from the cache is installed in the registry so later
/// lookups skip the disk.
pub fn resolve<R: FromPayload>(
    ctx: &RegistryContext,
    cache: &CacheStore,
    key: &str,
) -> Result<Option<Arc<dyn OriginRecord>>, OriginError> {
    let registry = ctx.origins(&R::kind());
    if let Some(record) = registry.get(key) {
        return Ok(Some(record));
    }
    let Some(record) = R::load(cache, key)? else {
        return Ok(None);
    };
    let record: Arc<dyn OriginRecord> = Arc::new(record);
    Ok(Some(registry.register(record)?))
}
