//! Device lookups by host name or by network, for command and report code.
//!
//! Registry absence becomes [`RegistryError::NotFound`] here because these
//! callers treat an unknown name as a user-facing error.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::context::RegistryContext;
use crate::error::RegistryError;
use crate::registry::category;
use crate::types::Device;

/// Resolve host names to devices, in the given order, without duplicates.
pub fn get_devices<S: AsRef<str>>(
    ctx: &RegistryContext,
    names: &[S],
) -> Result<Vec<Arc<Device>>, RegistryError> {
    let mut found: Vec<Arc<Device>> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        let device = ctx.devices.get(name).ok_or_else(|| not_found(category::DEVICES, name))?;
        if !found.iter().any(|d| d.name == device.name) {
            found.push(device);
        }
    }
    Ok(found)
}

/// All devices that are members of any of the named networks, sorted by name.
pub fn get_network_devices<S: AsRef<str>>(
    ctx: &RegistryContext,
    networks: &[S],
) -> Result<Vec<Arc<Device>>, RegistryError> {
    let mut found: BTreeMap<String, Arc<Device>> = BTreeMap::new();
    for network in networks {
        let network = network.as_ref();
        let planner = ctx
            .cable_planners
            .get(network)
            .ok_or_else(|| not_found(category::CABLE_PLANNERS, network))?;

        if planner.devices.is_empty() {
            return Err(RegistryError::EmptyNetwork {
                name: network.to_owned(),
            });
        }

        for dev_name in &planner.devices {
            let device = ctx
                .devices
                .get(dev_name)
                .ok_or_else(|| not_found(category::DEVICES, dev_name))?;
            found.insert(dev_name.clone(), device);
        }
    }
    Ok(found.into_values().collect())
}

fn not_found(category: &str, name: &str) -> RegistryError {
    RegistryError::NotFound {
        category: category.to_owned(),
        name: name.to_owned(),
    }
}
