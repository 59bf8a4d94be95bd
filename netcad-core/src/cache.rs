//! Filesystem cache of origin records.
//!
//! # Storage layout
//!
//! ```text
//! <cache_dir>/
//!   <entity>/            e.g. device-types
//!     <source>/          e.g. netbox
//!       <key>.json       one CacheEntry per record key
//! ```
//!
//! Keys are percent-encoded so that each key maps to exactly one file name;
//! a leading `.` is encoded as `%2E` as well, so no entry is hidden or
//! collides with `.` and `..`.
//!
//! Writes go to a uniquely named temporary file in the same directory which
//! is then renamed over the target, so readers see either the previous entry
//! or the new one, never a partial file, even with concurrent writers of the
//! same key. A write whose payload digest matches the stored entry is
//! skipped.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::{cache_io_err, CacheError};
use crate::origin::OriginKind;

/// One cached record, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub origin: OriginKind,
    pub key: String,
    pub cached_at: DateTime<Utc>,
    /// SHA-256 hex digest of the compact JSON encoding of `payload`.
    pub sha256: String,
    pub payload: Value,
}

/// Outcome of [`CacheStore::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWrite {
    /// Entry created or replaced.
    Written { path: PathBuf },
    /// Stored entry already held an identical payload; file untouched.
    Unchanged { path: PathBuf },
}

impl CacheWrite {
    pub fn path(&self) -> &Path {
        match self {
            CacheWrite::Written { path } | CacheWrite::Unchanged { path } => path,
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self, CacheWrite::Written { .. })
    }
}

/// Handle on a cache directory. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<entity>/<source>/`: pure, no I/O.
    pub fn kind_dir(&self, kind: &OriginKind) -> PathBuf {
        self.root.join(&kind.entity).join(&kind.source)
    }

    /// `<root>/<entity>/<source>/<escaped key>.json`: pure, no I/O.
    pub fn entry_path(&self, kind: &OriginKind, key: &str) -> Result<PathBuf, CacheError> {
        if key.trim().is_empty() {
            return Err(CacheError::InvalidKey {
                key: key.to_owned(),
            });
        }
        Ok(self
            .kind_dir(kind)
            .join(format!("{}.json", encode_key(key))))
    }

    /// Create or replace the entry for `(kind, key)`.
    pub fn write(
        &self,
        kind: &OriginKind,
        key: &str,
        payload: &Value,
    ) -> Result<CacheWrite, CacheError> {
        let path = self.entry_path(kind, key)?;
        let digest = payload_digest(payload, &path)?;

        match self.load_at(&path) {
            Ok(Some(existing)) if existing.sha256 == digest => {
                tracing::debug!(origin = %kind, key, "cache entry unchanged");
                return Ok(CacheWrite::Unchanged { path });
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(origin = %kind, key, error = %err, "replacing unreadable cache entry");
            }
        }

        let entry = CacheEntry {
            origin: kind.clone(),
            key: key.to_owned(),
            cached_at: Utc::now(),
            sha256: digest,
            payload: payload.clone(),
        };
        let json = serde_json::to_string_pretty(&entry).map_err(|source| CacheError::Json {
            path: path.clone(),
            source,
        })?;

        let dir = self.kind_dir(kind);
        std::fs::create_dir_all(&dir).map_err(|e| cache_io_err(&dir, e))?;

        // Dropping an unpersisted temp file removes it.
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| cache_io_err(&dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| cache_io_err(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| cache_io_err(&path, e.error))?;

        tracing::debug!(origin = %kind, key, path = %path.display(), "cache entry written");
        Ok(CacheWrite::Written { path })
    }

    /// Read the entry for `(kind, key)`; `None` if it was never written.
    pub fn load(&self, kind: &OriginKind, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.entry_path(kind, key)?;
        self.load_at(&path)
    }

    /// Keys cached for `kind`, sorted. Empty if nothing was cached yet.
    pub fn list_keys(&self, kind: &OriginKind) -> Result<Vec<String>, CacheError> {
        let dir = self.kind_dir(kind);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(cache_io_err(&dir, e)),
        };

        let mut keys: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let fname = e.file_name();
                let name = fname.to_str()?;
                name.strip_suffix(".json").and_then(decode_key)
            })
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn load_at(&self, path: &Path) -> Result<Option<CacheEntry>, CacheError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(cache_io_err(path, e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| CacheError::Json {
                path: path.to_path_buf(),
                source,
            })
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn payload_digest(payload: &Value, path: &Path) -> Result<String, CacheError> {
    let bytes = serde_json::to_vec(payload).map_err(|source| CacheError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let mut h = Sha256::new();
    h.update(&bytes);
    Ok(hex::encode(h.finalize()))
}

fn encode_key(key: &str) -> String {
    let encoded = urlencoding::encode(key);
    match encoded.strip_prefix('.') {
        Some(rest) => format!("%2E{rest}"),
        None => encoded.into_owned(),
    }
}

/// `None` for file names that do not decode to UTF-8.
fn decode_key(encoded: &str) -> Option<String> {
    urlencoding::decode(encoded).ok().map(|k| k.into_owned())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
