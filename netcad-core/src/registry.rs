//! Name-keyed object registries.
//!
//! A [`Registry`] is the storage half: one map per category, last write wins,
//! absence reported as `None`. A [`TypedRegistry`] is the registration half:
//! it checks the category's shape contract ([`Registrant`]) before anything
//! reaches the underlying map.
//!
//! Both are safe to share across tasks. Writes take a short exclusive lock on
//! the category map and never block on I/O.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::RegistryError;

/// Category names used by [`crate::context::RegistryContext`].
pub mod category {
    pub const DEVICES: &str = "devices";
    pub const DEVICE_TYPES: &str = "device-types";
    pub const DESIGNS: &str = "designs";
    pub const CHECK_COLLECTIONS: &str = "check-collections";
    pub const CABLE_PLANNERS: &str = "cable-planners";
    pub const ORIGINS_PREFIX: &str = "origins";
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Anything addressable by name inside a registry category.
pub trait Nameable {
    fn name(&self) -> &str;
}

/// Shape contract checked by [`TypedRegistry::register`].
pub trait Registrant: Nameable + Send + Sync {
    /// Category-specific checks beyond a non-empty name.
    ///
    /// On failure returns the violated requirement, phrased to follow
    /// "is missing", e.g. ``"a non-empty `product_model`"``.
    fn check_shape(&self) -> Result<(), String> {
        Ok(())
    }

    /// Concrete type name used in registration errors.
    fn type_label(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Generic named-object directory for one category.
pub struct Registry<T: ?Sized> {
    category: String,
    entries: RwLock<HashMap<String, Arc<T>>>,
}

impl<T: ?Sized> Registry<T> {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Store `obj` under `name`, replacing any prior entry.
    ///
    /// Fails with [`RegistryError::InvalidKey`] for an empty or blank name.
    pub fn registry_add(&self, name: &str, obj: Arc<T>) -> Result<(), RegistryError> {
        self.check_key(name)?;
        let replaced = self.write().insert(name.to_owned(), obj).is_some();
        if replaced {
            tracing::debug!(category = %self.category, name, "registry entry replaced");
        }
        Ok(())
    }

    /// Store `obj` under `name` only if the name is not yet taken.
    pub fn registry_add_unique(&self, name: &str, obj: Arc<T>) -> Result<(), RegistryError> {
        self.check_key(name)?;
        let mut entries = self.write();
        if entries.contains_key(name) {
            return Err(RegistryError::DuplicateName {
                category: self.category.clone(),
                name: name.to_owned(),
            });
        }
        entries.insert(name.to_owned(), obj);
        Ok(())
    }

    /// Look up `name`; `None` when it was never registered.
    pub fn registry_get(&self, name: &str) -> Option<Arc<T>> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn check_key(&self, name: &str) -> Result<(), RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidKey {
                category: self.category.clone(),
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    // A panic while holding the lock cannot leave a half-written HashMap
    // entry, so a poisoned map is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<T>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<T>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// TypedRegistry
// ---------------------------------------------------------------------------

/// Registration facade guarding one [`Registry`] category.
pub struct TypedRegistry<T: ?Sized> {
    inner: Registry<T>,
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("category", &self.category)
            .field("len", &self.len())
            .finish()
    }
}

impl<T: ?Sized> fmt::Debug for TypedRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedRegistry").field(&self.inner).finish()
    }
}

impl<T: ?Sized + Registrant> TypedRegistry<T> {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            inner: Registry::new(category),
        }
    }

    /// Validate `obj` and register it under its own name.
    ///
    /// Returns the object unchanged so callers can keep using the handle.
    pub fn register(&self, obj: Arc<T>) -> Result<Arc<T>, RegistryError> {
        self.validate(&obj)?;
        self.inner.registry_add(obj.name(), Arc::clone(&obj))?;
        Ok(obj)
    }

    /// Validate `obj` and register it under `name` instead of its own name.
    pub fn register_as(&self, name: &str, obj: Arc<T>) -> Result<Arc<T>, RegistryError> {
        self.validate(&obj)?;
        self.inner.registry_add(name, Arc::clone(&obj))?;
        Ok(obj)
    }

    /// Like [`register`](Self::register) but refuses to replace an entry.
    pub fn register_unique(&self, obj: Arc<T>) -> Result<Arc<T>, RegistryError> {
        self.validate(&obj)?;
        self.inner.registry_add_unique(obj.name(), Arc::clone(&obj))?;
        Ok(obj)
    }

    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.inner.registry_get(name)
    }

    pub fn category(&self) -> &str {
        self.inner.category()
    }

    /// The underlying storage, for callers that need the untyped surface.
    pub fn registry(&self) -> &Registry<T> {
        &self.inner
    }

    fn validate(&self, obj: &T) -> Result<(), RegistryError> {
        let invalid = |requirement: String| RegistryError::InvalidRegistration {
            category: self.inner.category().to_owned(),
            type_name: obj.type_label(),
            requirement,
        };
        if obj.name().trim().is_empty() {
            return Err(invalid("a non-empty `name`".to_owned()));
        }
        obj.check_shape().map_err(invalid)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
