//! Error types for netcad-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by registries, registration facades, and inventory lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry name is empty or blank.
    #[error("invalid registry key {name:?} in category '{category}'")]
    InvalidKey { category: String, name: String },

    /// The candidate object does not satisfy the category's shape contract.
    #[error("invalid registration in '{category}': {type_name} is missing {requirement}")]
    InvalidRegistration {
        category: String,
        type_name: &'static str,
        requirement: String,
    },

    /// `registry_add_unique` found an existing entry under the same name.
    #[error("duplicate name '{name}' in category '{category}'")]
    DuplicateName { category: String, name: String },

    /// A lookup the caller treats as mandatory found no match.
    #[error("{category} not found: {name}")]
    NotFound { category: String, name: String },

    /// A cable planner exists but groups no devices.
    #[error("no devices found in network: {name}")]
    EmptyNetwork { name: String },

    /// A bracket name specification could not be expanded.
    #[error("invalid name spec '{spec}': {reason}")]
    InvalidNameSpec { spec: String, reason: String },
}

/// A port type name outside the [`crate::types::PhyPortType`] catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown port type '{0}'")]
pub struct UnknownPortType(pub String);

/// Errors from the on-disk origin cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache entry JSON could not be encoded or decoded.
    #[error("cache JSON error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The record key cannot be mapped to a cache file.
    #[error("invalid cache key {key:?}")]
    InvalidKey { key: String },
}

/// Errors from building or querying an origin record.
#[derive(Debug, Error)]
pub enum OriginError {
    /// The payload lacks a field the record kind requires.
    #[error("malformed {origin} payload: missing or invalid `{key_path}`")]
    MalformedPayload { origin: String, key_path: String },

    /// No sub-component with this name exists in the record.
    #[error("{record}: interface not found: {name}")]
    NotFound { record: String, name: String },

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Errors from loading [`crate::config::NetcadConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with the offending file path.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// A setting required by the requested operation is not configured.
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

pub(crate) fn cache_io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.into(),
        source,
    }
}
