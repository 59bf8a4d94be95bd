//! Device-type definitions sourced from NetBox.
//!
//! Payload shape, as assembled by
//! [`NetboxClient::fetch_device_template`](super::NetboxClient::fetch_device_template):
//!
//! ```json
//! {
//!   "device_type": { "id": 7, "model": "DCS-7050SX3-48YC8", "manufacturer": { "name": "Arista" } },
//!   "interfaces": [ { "name": "Ethernet1", "type": { "value": "25gbase-x-sfp28", "label": "SFP28 (25GE)" } } ],
//!   "console_ports": [ { "name": "console" } ]
//! }
//! ```

use std::collections::HashMap;

use serde_json::Value;

use netcad_core::{
    FromPayload, InterfaceSpec, Nameable, OriginError, OriginKind, OriginRecord, Registrant,
};

pub const NETBOX_SOURCE: &str = "netbox";
pub const DEVICE_TYPES_ENTITY: &str = "device-types";

/// A NetBox device-type template, keyed by its model name.
#[derive(Debug, Clone)]
pub struct NetboxOriginDeviceType {
    kind: OriginKind,
    key: String,
    payload: Value,
    if_order: Vec<String>,
    if_index: HashMap<String, InterfaceSpec>,
}

impl NetboxOriginDeviceType {
    pub fn model(&self) -> &str {
        &self.key
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.payload
            .pointer("/device_type/manufacturer/name")
            .and_then(Value::as_str)
    }

    /// Console port names in payload order. Entries without a name are skipped.
    pub fn console_port_names(&self) -> Vec<&str> {
        self.payload
            .get("console_ports")
            .and_then(Value::as_array)
            .map(|ports| {
                ports
                    .iter()
                    .filter_map(|p| p.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_interface(&self, if_name: &str) -> Result<InterfaceSpec, OriginError> {
        self.get_subcomponent(if_name)
    }
}

impl Nameable for NetboxOriginDeviceType {
    fn name(&self) -> &str {
        &self.key
    }
}

impl Registrant for NetboxOriginDeviceType {
    fn type_label(&self) -> &'static str {
        "NetboxOriginDeviceType"
    }
}

impl OriginRecord for NetboxOriginDeviceType {
    fn origin_kind(&self) -> &OriginKind {
        &self.kind
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn raw_payload(&self) -> &Value {
        &self.payload
    }

    fn subcomponent_names(&self) -> Vec<&str> {
        self.if_order.iter().map(String::as_str).collect()
    }

    fn get_subcomponent(&self, name: &str) -> Result<InterfaceSpec, OriginError> {
        self.if_index
            .get(name)
            .cloned()
            .ok_or_else(|| OriginError::NotFound {
                record: self.key.clone(),
                name: name.to_owned(),
            })
    }
}

impl FromPayload for NetboxOriginDeviceType {
    fn kind() -> OriginKind {
        OriginKind::new(NETBOX_SOURCE, DEVICE_TYPES_ENTITY)
    }

    fn from_payload(payload: Value) -> Result<Self, OriginError> {
        let kind = Self::kind();
        let malformed = |key_path: String| OriginError::MalformedPayload {
            origin: kind.to_string(),
            key_path,
        };

        let key = payload
            .pointer("/device_type/model")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| malformed("device_type.model".into()))?
            .to_owned();

        let interfaces = payload
            .get("interfaces")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("interfaces".into()))?;

        let mut if_order = Vec::with_capacity(interfaces.len());
        let mut if_index = HashMap::with_capacity(interfaces.len());
        for (i, iface) in interfaces.iter().enumerate() {
            let field = |path: &str, label: &str| {
                iface
                    .pointer(path)
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .ok_or_else(|| malformed(format!("interfaces[{i}].{label}")))
            };
            let if_name = field("/name", "name")?;
            let spec = InterfaceSpec {
                if_name: if_name.clone(),
                if_type: field("/type/value", "type.value")?,
                if_type_label: field("/type/label", "type.label")?,
            };
            if if_index.insert(if_name.clone(), spec).is_none() {
                if_order.push(if_name);
            }
        }

        Ok(Self {
            kind,
            key,
            payload,
            if_order,
            if_index,
        })
    }
}
