//! netcad core library: registries, design entities, origin records,
//! the origin cache, and configuration.
//!
//! - [`registry`]: [`Registry`] storage and [`TypedRegistry`] registration
//! - [`context`]: [`RegistryContext`], one registry per entity category
//! - [`types`]: devices, device types, designs, cable planners, checks
//! - [`factory`]: [`DeviceTypeFactory`] builder with name-spec expansion
//! - [`inventory`]: device lookups by name or network
//! - [`origin`]: [`OriginRecord`] abstraction and read-through [`resolve`]
//! - [`cache`]: [`CacheStore`], one JSON file per record key
//! - [`config`]: [`NetcadConfig`] from file and environment
//! - [`error`]: error enums

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod inventory;
pub mod origin;
pub mod registry;
pub mod types;

pub use cache::{CacheEntry, CacheStore, CacheWrite};
pub use config::{NetboxSettings, NetcadConfig};
pub use context::RegistryContext;
pub use error::{CacheError, ConfigError, OriginError, RegistryError, UnknownPortType};
pub use factory::DeviceTypeFactory;
pub use origin::{resolve, FromPayload, InterfaceSpec, OriginKind, OriginRecord};
pub use registry::{Nameable, Registrant, Registry, TypedRegistry};
pub use types::{
    CablePlanner, CheckCollection, Design, Device, DeviceType, PhyPortType, PortSpec,
};
