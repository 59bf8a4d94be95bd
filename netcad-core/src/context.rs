//! [`RegistryContext`], the set of registries one process (or one test)
//! works against.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::origin::{OriginKind, OriginRecord};
use crate::registry::{category, TypedRegistry};
use crate::types::{CablePlanner, CheckCollection, Design, Device, DeviceType};

/// Owns one typed registry per entity category.
///
/// Origin registries are created on first use, one per [`OriginKind`].
#[derive(Debug)]
pub struct RegistryContext {
    pub devices: TypedRegistry<Device>,
    pub device_types: TypedRegistry<DeviceType>,
    pub designs: TypedRegistry<Design>,
    pub check_collections: TypedRegistry<dyn CheckCollection>,
    pub cable_planners: TypedRegistry<CablePlanner>,
    origins: RwLock<HashMap<OriginKind, Arc<TypedRegistry<dyn OriginRecord>>>>,
}

impl RegistryContext {
    pub fn new() -> Self {
        Self {
            devices: TypedRegistry::new(category::DEVICES),
            device_types: TypedRegistry::new(category::DEVICE_TYPES),
            designs: TypedRegistry::new(category::DESIGNS),
            check_collections: TypedRegistry::new(category::CHECK_COLLECTIONS),
            cable_planners: TypedRegistry::new(category::CABLE_PLANNERS),
            origins: RwLock::new(HashMap::new()),
        }
    }

    /// Registry for records of `kind`, created empty if absent.
    pub fn origins(&self, kind: &OriginKind) -> Arc<TypedRegistry<dyn OriginRecord>> {
        if let Some(existing) = self
            .origins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
        {
            return Arc::clone(existing);
        }
        let mut origins = self.origins.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            origins
                .entry(kind.clone())
                .or_insert_with(|| Arc::new(TypedRegistry::new(kind.category()))),
        )
    }

    /// Origin kinds with a registry, sorted.
    pub fn origin_kinds(&self) -> Vec<OriginKind> {
        let mut kinds: Vec<OriginKind> = self
            .origins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        kinds.sort();
        kinds
    }
}

impl Default for RegistryContext {
    fn default() -> Self {
        Self::new()
    }
}
