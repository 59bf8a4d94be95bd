//! Registry contract tests: overwrite semantics, absence, shape validation,
//! and concurrent registration through a shared context.

use std::sync::Arc;

use netcad_core::{
    CablePlanner, CheckCollection, Design, Device, DeviceTypeFactory, Nameable, PhyPortType,
    Registrant, Registry, RegistryContext, RegistryError,
};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct InterfaceChecks {
    name: String,
}

impl Nameable for InterfaceChecks {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Registrant for InterfaceChecks {}

impl CheckCollection for InterfaceChecks {
    fn description(&self) -> &str {
        "interface state checks"
    }
}

// ---------------------------------------------------------------------------
// 1. Overwrite and absence
// ---------------------------------------------------------------------------

#[rstest]
#[case("devices")]
#[case("designs")]
#[case("origins:netbox:device-types")]
fn add_get_overwrite_in_any_category(#[case] category: &str) {
    let reg: Registry<String> = Registry::new(category);
    reg.registry_add("n", Arc::new("x".to_string())).expect("add x");
    assert_eq!(reg.registry_get("n").as_deref().map(String::as_str), Some("x"));

    reg.registry_add("n", Arc::new("y".to_string())).expect("add y");
    assert_eq!(reg.registry_get("n").as_deref().map(String::as_str), Some("y"));
    assert_eq!(reg.len(), 1, "overwrite must not keep both entries");
}

#[test]
fn never_registered_name_is_absent() {
    let ctx = RegistryContext::new();
    assert!(ctx.devices.get("leaf1").is_none());
    assert!(ctx.designs.get("dc1").is_none());
    assert!(ctx.check_collections.get("interfaces").is_none());
}

#[test]
fn invalid_key_does_not_affect_other_entries() {
    let reg: Registry<u32> = Registry::new("numbers");
    reg.registry_add("one", Arc::new(1)).expect("add");
    let err = reg.registry_add("", Arc::new(2)).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidKey { .. }));
    assert_eq!(reg.names(), vec!["one"]);
}

// ---------------------------------------------------------------------------
// 2. Shape validation
// ---------------------------------------------------------------------------

#[test]
fn check_collection_without_name_never_reaches_registry() {
    let ctx = RegistryContext::new();
    let nameless: Arc<dyn CheckCollection> = Arc::new(InterfaceChecks {
        name: String::new(),
    });
    let err = ctx.check_collections.register(nameless).err().unwrap();
    match &err {
        RegistryError::InvalidRegistration {
            category,
            type_name,
            ..
        } => {
            assert_eq!(category, "check-collections");
            assert!(type_name.ends_with("InterfaceChecks"), "got: {type_name}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(ctx.check_collections.registry().is_empty());
}

#[test]
fn device_without_product_model_is_invalid_registration() {
    let ctx = RegistryContext::new();
    let err = ctx
        .devices
        .register(Arc::new(Device::new("leaf1", " ")))
        .unwrap_err();
    assert!(err.to_string().contains("product_model"), "got: {err}");
    assert!(ctx.devices.get("leaf1").is_none());
}

#[test]
fn register_returns_object_for_further_use() {
    let ctx = RegistryContext::new();
    let checks: Arc<dyn CheckCollection> = Arc::new(InterfaceChecks {
        name: "interfaces".into(),
    });
    let handle = ctx.check_collections.register(Arc::clone(&checks)).expect("register");
    assert!(Arc::ptr_eq(&handle, &checks));
    assert_eq!(handle.description(), "interface state checks");
}

// ---------------------------------------------------------------------------
// 3. Duplicate policy
// ---------------------------------------------------------------------------

#[test]
fn designs_overwrite_by_default_and_can_opt_into_unique() {
    let ctx = RegistryContext::new();
    ctx.designs
        .register(Arc::new(Design::new("dc1", None).with_devices(["a"])))
        .expect("first");
    ctx.designs
        .register(Arc::new(Design::new("dc1", None).with_devices(["b"])))
        .expect("second");
    let current = ctx.designs.get("dc1").expect("dc1");
    assert!(current.devices.contains("b"));

    let err = ctx
        .designs
        .register_unique(Arc::new(Design::new("dc1", None)))
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateName { .. }));
    assert!(ctx.designs.get("dc1").expect("dc1").devices.contains("b"));
}

// ---------------------------------------------------------------------------
// 4. Concurrency and end-to-end lookup
// ---------------------------------------------------------------------------

#[test]
fn concurrent_registration_through_shared_context() {
    let ctx = Arc::new(RegistryContext::new());
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let ctx = Arc::clone(&ctx);
            std::thread::spawn(move || {
                ctx.devices
                    .register(Arc::new(Device::new(format!("leaf{i}"), "7050SX3")))
                    .expect("register");
            })
        })
        .collect();
    for h in handles {
        h.join().expect("join");
    }
    assert_eq!(ctx.devices.registry().len(), 16);
}

#[test]
fn device_resolves_its_device_type() {
    let ctx = RegistryContext::new();
    DeviceTypeFactory::new("7050SX3")
        .suffix("-F")
        .interfaces("Ethernet[1-48]", PhyPortType::Type25GBaseSr)
        .build(&ctx.device_types, None)
        .expect("device type");
    ctx.devices
        .register(Arc::new(Device::new("leaf1", "7050SX3-F").in_design("dc1")))
        .expect("device");
    ctx.cable_planners
        .register(Arc::new(CablePlanner::new("fabric", ["leaf1"])))
        .expect("planner");

    let devices = netcad_core::inventory::get_network_devices(&ctx, &["fabric"]).expect("lookup");
    let dt = ctx
        .device_types
        .get(&devices[0].product_model)
        .expect("device type registered");
    assert_eq!(dt.interfaces.len(), 48);
    assert_eq!(
        dt.interface("Ethernet48").and_then(|p| p.port_type),
        Some(PhyPortType::Type25GBaseSr)
    );
}
