//! Domain types for network designs.
//!
//! Every type that lives in a registry implements [`Nameable`] and
//! [`Registrant`]; the shape checks here are the per-category contracts
//! enforced by [`crate::registry::TypedRegistry`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownPortType;
use crate::registry::{Nameable, Registrant};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

macro_rules! phy_port_types {
    ($($variant:ident => $name:literal,)+) => {
        /// Physical port (transceiver or copper) types a device-type
        /// interface can be built with. Serialized as the standard name,
        /// e.g. `"100GBASE-SR4"`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum PhyPortType {
            $(#[serde(rename = $name)] $variant,)+
        }

        impl PhyPortType {
            pub const ALL: &'static [PhyPortType] = &[$(PhyPortType::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(PhyPortType::$variant => $name,)+
                }
            }
        }
    };
}

phy_port_types! {
    // 1 Gig
    Type1000BaseT => "1000BASE-T",
    Type1000BaseSx => "1000BASE-SX",
    Type1000BaseLx => "1000BASE-LX",

    // 10 Gig
    Type10GBaseT => "10GBASE-T",
    Type10GBaseCr => "10GBASE-CR",
    Type10GBaseAoc => "10GBASE-AOC",
    Type10GBaseSr => "10GBASE-SR",
    Type10GBaseSrl => "10GBASE-SRL",
    Type10GBaseLr => "10GBASE-LR",
    Type10GBaseLrl => "10GBASE-LRL",
    Type10GBaseEr => "10GBASE-ER",
    Type10GBaseErlbd => "10GBASE-ERLBD",
    Type10GBaseErbd => "10GBASE-ERBD",
    Type10GBaseZr => "10GBASE-ZR",
    Type10GBaseDwdm => "10GBASE-DWDM",

    // 25 Gig
    Type25GBaseCr => "25GBASE-CR",
    Type25GBaseAoc => "25GBASE-AOC",
    Type25GBaseSr => "25GBASE-SR",
    Type25GBaseMrSr => "25GBASE-MR-SR",
    Type25GBaseMrXsr => "25GBASE-MR-XSR",
    Type25GBaseLr => "25GBASE-LR",
    Type25GBaseMrLr => "25GBASE-MR-LR",

    // 40 Gig
    Type40GBaseCr4 => "40GBASE-CR4",
    Type40GBaseAoc => "40GBASE-AOC",
    Type40GBaseSr4 => "40GBASE-SR4",
    Type40GBaseXsr4 => "40GBASE-XSR4",
    Type40GBaseBidi => "40GBASE-BIDI",
    Type40GBaseUniv => "40GBASE-UNIV",
    Type40GBaseLr4 => "40GBASE-LR4",
    Type40GBaseLrl4 => "40GBASE-LRL4",
    Type40GBasePlrl4 => "40GBASE-PLRL4",
    Type40GBasePlr4 => "40GBASE-PLR4",
    Type40GBaseEr4 => "40GBASE-ER4",

    // 100 Gig
    Type100GBaseCr4 => "100GBASE-CR4",
    Type100GBaseAoc => "100GBASE-AOC",
    Type100GBaseSr4 => "100GBASE-SR4",
    Type100GBaseXsr4 => "100GBASE-XSR4",
    Type100GBaseSwdm => "100GBASE-SWDM",
    Type100GBaseBid => "100GBASE-BID",
    Type100GBasePsm4 => "100GBASE-PSM4",
    Type100GBaseLr4 => "100GBASE-LR4",
    Type100GBaseLrl4 => "100GBASE-LRL4",
    Type100GBaseCwdm4 => "100GBASE-CWDM4",
    Type100GBaseXcwdm4 => "100GBASE-XCWDM4",
    Type100GBaseErl4 => "100GBASE-ERL4",
    Type100GBaseZr4 => "100GBASE-ZR4",
    Type100GBaseDr => "100GBASE-DR",
    Type100GBaseFr => "100GBASE-FR",
    Type100GBaseLr => "100GBASE-LR",
}

impl fmt::Display for PhyPortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhyPortType {
    type Err = UnknownPortType;

    /// Case-insensitive match on the standard name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PhyPortType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPortType(s.to_owned()))
    }
}

/// One physical port on a device-type template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_type: Option<PhyPortType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PortSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            port_type: None,
            description: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Device types
// ---------------------------------------------------------------------------

/// A device-type template, e.g. a switch model with its port layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceType {
    /// Base model name shared by airflow/feature variants.
    pub model: String,
    /// Orderable product model; registry name unless overridden.
    pub product_model: String,
    #[serde(default)]
    pub interfaces: BTreeMap<String, PortSpec>,
    #[serde(default)]
    pub consoles: BTreeMap<String, PortSpec>,
}

impl DeviceType {
    pub fn interface(&self, name: &str) -> Option<&PortSpec> {
        self.interfaces.get(name)
    }
}

impl Nameable for DeviceType {
    fn name(&self) -> &str {
        &self.product_model
    }
}

impl Registrant for DeviceType {
    fn check_shape(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("a non-empty `model`".to_owned());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// A device instance in a design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    /// Product model of the device type this device is built from.
    pub product_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
}

impl Device {
    pub fn new(name: impl Into<String>, product_model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product_model: product_model.into(),
            design: None,
        }
    }

    pub fn in_design(mut self, design: impl Into<String>) -> Self {
        self.design = Some(design.into());
        self
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

impl Nameable for Device {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Registrant for Device {
    fn check_shape(&self) -> Result<(), String> {
        if self.product_model.trim().is_empty() {
            return Err("a non-empty `product_model`".to_owned());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Designs
// ---------------------------------------------------------------------------

/// All elements of one named design.
///
/// `config` is the design's section of the user configuration file, copied
/// at construction so later edits to the source do not leak in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    pub name: String,
    #[serde(default)]
    pub config: serde_yaml::Mapping,
    #[serde(default)]
    pub devices: BTreeSet<String>,
}

impl Design {
    pub fn new(name: impl Into<String>, config: Option<&serde_yaml::Mapping>) -> Self {
        Self {
            name: name.into(),
            config: config.cloned().unwrap_or_default(),
            devices: BTreeSet::new(),
        }
    }

    pub fn with_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.devices.extend(devices.into_iter().map(Into::into));
        self
    }
}

impl Nameable for Design {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Registrant for Design {}

// ---------------------------------------------------------------------------
// Cable planners
// ---------------------------------------------------------------------------

/// A named network: the set of devices cabled together by one planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CablePlanner {
    pub name: String,
    #[serde(default)]
    pub devices: BTreeSet<String>,
}

impl CablePlanner {
    pub fn new<I, S>(name: impl Into<String>, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            devices: devices.into_iter().map(Into::into).collect(),
        }
    }
}

impl Nameable for CablePlanner {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Registrant for CablePlanner {}

// ---------------------------------------------------------------------------
// Check collections
// ---------------------------------------------------------------------------

/// A named collection of design checks, looked up by name when building
/// check plans for devices.
pub trait CheckCollection: Registrant {
    fn description(&self) -> &str {
        ""
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PhyPortType::Type1000BaseT, "1000BASE-T")]
    #[case(PhyPortType::Type10GBaseErlbd, "10GBASE-ERLBD")]
    #[case(PhyPortType::Type25GBaseMrSr, "25GBASE-MR-SR")]
    #[case(PhyPortType::Type40GBaseSr4, "40GBASE-SR4")]
    #[case(PhyPortType::Type100GBaseCwdm4, "100GBASE-CWDM4")]
    fn port_type_names(#[case] port_type: PhyPortType, #[case] name: &str) {
        assert_eq!(port_type.to_string(), name);
        assert_eq!(name.parse::<PhyPortType>().unwrap(), port_type);
        assert_eq!(name.to_lowercase().parse::<PhyPortType>().unwrap(), port_type);
        assert_eq!(serde_json::to_value(port_type).unwrap(), name);
        assert_eq!(
            serde_json::from_value::<PhyPortType>(serde_json::json!(name)).unwrap(),
            port_type
        );
    }

    #[test]
    fn port_type_names_are_unique() {
        let names: BTreeSet<&str> = PhyPortType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names.len(), PhyPortType::ALL.len());
    }

    #[test]
    fn unknown_port_type_is_rejected() {
        let err = "25GBASE".parse::<PhyPortType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown port type '25GBASE'");
        assert!(serde_json::from_value::<PhyPortType>(serde_json::json!("copper")).is_err());
    }

    #[test]
    fn device_type_is_named_by_product_model() {
        let dt = DeviceType {
            model: "DCS-7050SX3-48YC8".into(),
            product_model: "DCS-7050SX3-48YC8-F".into(),
            interfaces: BTreeMap::new(),
            consoles: BTreeMap::new(),
        };
        assert_eq!(dt.name(), "DCS-7050SX3-48YC8-F");
        assert!(dt.check_shape().is_ok());
    }

    #[test]
    fn device_without_product_model_fails_shape() {
        let dev = Device::new("sw1", "");
        assert!(dev.check_shape().unwrap_err().contains("product_model"));
    }

    #[test]
    fn design_copies_config() {
        let mut config = serde_yaml::Mapping::new();
        config.insert("site".into(), "nyc1".into());
        let design = Design::new("dc1", Some(&config));
        config.insert("site".into(), "sfo1".into());
        assert_eq!(
            design.config.get("site").and_then(|v| v.as_str()),
            Some("nyc1")
        );
    }

    #[test]
    fn device_display_is_name() {
        assert_eq!(Device::new("leaf1", "m").to_string(), "leaf1");
    }
}
