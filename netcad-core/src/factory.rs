//! Builder for [`DeviceType`] templates.
//!
//! ```
//! use netcad_core::{DeviceTypeFactory, PhyPortType, RegistryContext};
//!
//! let ctx = RegistryContext::new();
//! let dt = DeviceTypeFactory::new("DCS-7050SX3-48YC8")
//!     .suffix("-F")
//!     .interfaces("Ethernet[1-48]", PhyPortType::Type25GBaseSr)
//!     .interfaces("Ethernet[49-56]/1", PhyPortType::Type100GBaseSr4)
//!     .console("console")
//!     .build(&ctx.device_types, None)
//!     .unwrap();
//! assert_eq!(dt.product_model, "DCS-7050SX3-48YC8-F");
//! assert_eq!(dt.interfaces.len(), 56);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::registry::TypedRegistry;
use crate::types::{DeviceType, PhyPortType, PortSpec};

/// Accumulates ports, then builds and registers a [`DeviceType`].
#[derive(Debug, Clone)]
pub struct DeviceTypeFactory {
    model: String,
    suffix: Option<String>,
    product_model: Option<String>,
    interfaces: BTreeMap<String, PortSpec>,
    consoles: BTreeMap<String, PortSpec>,
    errors: Vec<RegistryError>,
}

impl DeviceTypeFactory {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            suffix: None,
            product_model: None,
            interfaces: BTreeMap::new(),
            consoles: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// Product model becomes `model + suffix` unless set explicitly.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn product_model(mut self, product_model: impl Into<String>) -> Self {
        self.product_model = Some(product_model.into());
        self
    }

    /// Add one interface per name in the expanded `namespec`.
    pub fn interfaces(mut self, namespec: &str, port_type: PhyPortType) -> Self {
        match expand(namespec) {
            Ok(names) => {
                for name in names {
                    let mut spec = PortSpec::new(name.clone());
                    spec.port_type = Some(port_type);
                    self.interfaces.insert(name, spec);
                }
            }
            Err(err) => self.errors.push(err),
        }
        self
    }

    /// Add one console port per name in the expanded `namespec`.
    pub fn console(mut self, namespec: &str) -> Self {
        match expand(namespec) {
            Ok(names) => {
                for name in names {
                    self.consoles.insert(name.clone(), PortSpec::new(name));
                }
            }
            Err(err) => self.errors.push(err),
        }
        self
    }

    /// Build the device type and register it under `name`, or under the
    /// product model when `name` is `None`.
    ///
    /// The first name-spec error recorded while building is returned
    /// instead.
    pub fn build(
        self,
        registry: &TypedRegistry<DeviceType>,
        name: Option<&str>,
    ) -> Result<Arc<DeviceType>, RegistryError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        let product_model = match (self.product_model, self.suffix) {
            (Some(pm), _) => pm,
            (None, Some(suffix)) => format!("{}{suffix}", self.model),
            (None, None) => self.model.clone(),
        };
        let dt = Arc::new(DeviceType {
            model: self.model,
            product_model,
            interfaces: self.interfaces,
            consoles: self.consoles,
        });
        match name {
            Some(name) => registry.register_as(name, dt),
            None => registry.register(dt),
        }
    }

    /// Copy `src` as a variant with a different suffix, e.g. a front-to-back
    /// airflow model `-F` copied to the back-to-front `-R`.
    pub fn copy(
        registry: &TypedRegistry<DeviceType>,
        src: &DeviceType,
        suffix: &str,
    ) -> Result<Arc<DeviceType>, RegistryError> {
        let mut dst = src.clone();
        dst.product_model = format!("{}{suffix}", src.model);
        registry.register(Arc::new(dst))
    }
}

// ---------------------------------------------------------------------------
// Name expansion
// ---------------------------------------------------------------------------

/// Expand bracket ranges in an interface name spec.
///
/// `Ethernet[1-3]` → `Ethernet1 Ethernet2 Ethernet3`; groups may hold
/// comma-separated items (`mgmt[0,1]`), numeric ranges keep zero padding
/// (`et[01-03]` → `et01 et02 et03`), and several groups multiply out.
pub fn expand(namespec: &str) -> Result<Vec<String>, RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidNameSpec {
        spec: namespec.to_owned(),
        reason: reason.to_owned(),
    };

    let Some(open) = namespec.find('[') else {
        if namespec.contains(']') {
            return Err(invalid("unmatched ']'"));
        }
        if namespec.trim().is_empty() {
            return Err(invalid("empty name"));
        }
        return Ok(vec![namespec.to_owned()]);
    };
    let close = namespec[open..]
        .find(']')
        .map(|i| open + i)
        .ok_or_else(|| invalid("unmatched '['"))?;

    let prefix = &namespec[..open];
    let group = &namespec[open + 1..close];
    let tails = match &namespec[close + 1..] {
        "" => vec![String::new()],
        rest => expand(rest).map_err(|e| match e {
            RegistryError::InvalidNameSpec { reason, .. } => invalid(&reason),
            other => other,
        })?,
    };

    if group.trim().is_empty() {
        return Err(invalid("empty bracket group"));
    }

    let mut items = Vec::new();
    for item in group.split(',') {
        let item = item.trim();
        match item.split_once('-') {
            Some((lo, hi)) => items.extend(expand_range(lo, hi).map_err(|r| invalid(&r))?),
            None if item.is_empty() => return Err(invalid("empty item in bracket group")),
            None => items.push(item.to_owned()),
        }
    }

    Ok(items
        .iter()
        .flat_map(|item| tails.iter().map(move |tail| format!("{prefix}{item}{tail}")))
        .collect())
}

fn expand_range(lo: &str, hi: &str) -> Result<Vec<String>, String> {
    let start: u32 = lo
        .parse()
        .map_err(|_| format!("range start '{lo}' is not a number"))?;
    let end: u32 = hi
        .parse()
        .map_err(|_| format!("range end '{hi}' is not a number"))?;
    if start > end {
        return Err(format!("range {lo}-{hi} is descending"));
    }
    let width = if lo.len() > 1 && lo.starts_with('0') {
        lo.len()
    } else {
        0
    };
    Ok((start..=end).map(|n| format!("{n:0width$}")).collect())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
