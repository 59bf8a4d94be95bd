use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netcad_core::{
    resolve, CacheStore, FromPayload, NetboxSettings, OriginRecord, RegistryContext,
};
use netcad_origin::netbox::sync_device_types;
use netcad_origin::{NetboxClient, NetboxOriginDeviceType, SyncOutcome};

const TOKEN: &str = "0123456789abcdef";

fn settings(server: &MockServer) -> NetboxSettings {
    NetboxSettings {
        url: format!("{}/", server.uri()),
        token: TOKEN.to_owned(),
        timeout_secs: 5,
    }
}

fn page(results: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "count": results.as_array().map_or(0, Vec::len),
        "next": null,
        "previous": null,
        "results": results,
    }))
}

async fn mount_device_type(server: &MockServer, id: u64, model: &str, ifaces: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/api/dcim/device-types/"))
        .and(query_param("model", model))
        .and(header("authorization", format!("Token {TOKEN}").as_str()))
        .respond_with(page(json!([{
            "id": id,
            "model": model,
            "manufacturer": {"name": "Arista"},
        }])))
        .mount(server)
        .await;

    let interfaces: Vec<Value> = ifaces
        .iter()
        .map(|name| json!({"name": name, "type": {"value": "1000base-t", "label": "1000BASE-T (1GE)"}}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/dcim/interface-templates/"))
        .and(query_param("devicetype_id", id.to_string().as_str()))
        .and(query_param("limit", "0"))
        .respond_with(page(Value::Array(interfaces)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/dcim/console-port-templates/"))
        .and(query_param("devicetype_id", id.to_string().as_str()))
        .respond_with(page(json!([{"name": "console"}])))
        .mount(server)
        .await;
}

async fn mount_absent(server: &MockServer, model: &str) {
    Mock::given(method("GET"))
        .and(path("/api/dcim/device-types/"))
        .and(query_param("model", model))
        .respond_with(page(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn client_combines_templates() {
    let server = MockServer::start().await;
    mount_device_type(&server, 7, "DCS-7050SX3", &["Ethernet1", "Management1"]).await;

    let client = NetboxClient::new(&settings(&server)).unwrap();
    let payload = client
        .fetch_device_template("DCS-7050SX3")
        .await
        .unwrap()
        .expect("device type present");

    assert_eq!(payload["device_type"]["id"], 7);
    assert_eq!(payload["interfaces"].as_array().unwrap().len(), 2);
    assert_eq!(payload["console_ports"][0]["name"], "console");
}

#[tokio::test]
async fn client_reports_absent_model() {
    let server = MockServer::start().await;
    mount_absent(&server, "nope").await;
    let client = NetboxClient::new(&settings(&server)).unwrap();
    assert!(client.fetch_device_template("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn server_error_is_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let client = NetboxClient::new(&settings(&server)).unwrap();
    let err = client.fetch_device_template("m").await.unwrap_err();
    assert!(err.to_string().contains("503"), "got: {err}");
}

#[tokio::test]
async fn sync_saves_found_models_and_reports_missing() {
    let server = MockServer::start().await;
    mount_device_type(&server, 1, "modelA", &["eth0", "eth1"]).await;
    mount_device_type(&server, 2, "modelB", &["eth0"]).await;
    mount_absent(&server, "modelMissing").await;

    let tmp = TempDir::new().unwrap();
    let cache = CacheStore::new(tmp.path());
    let ctx = Arc::new(RegistryContext::new());

    let report = sync_device_types(
        &settings(&server),
        Arc::clone(&ctx),
        cache.clone(),
        ["modelA", "modelB", "modelMissing"],
    )
    .await
    .unwrap();

    assert!(matches!(report.outcome("modelA"), Some(SyncOutcome::Saved { changed: true, .. })));
    assert!(matches!(report.outcome("modelB"), Some(SyncOutcome::Saved { changed: true, .. })));
    assert_eq!(report.outcome("modelMissing"), Some(&SyncOutcome::NotFound));
    assert!(!report.all_saved());

    let kind = NetboxOriginDeviceType::kind();
    assert_eq!(cache.list_keys(&kind).unwrap(), vec!["modelA", "modelB"]);
    let entry = cache.load(&kind, "modelA").unwrap().expect("cached");
    assert_eq!(entry.payload["device_type"]["model"], "modelA");

    // A fresh context resolves the record from the cache alone.
    let fresh = RegistryContext::new();
    let record = resolve::<NetboxOriginDeviceType>(&fresh, &cache, "modelA")
        .unwrap()
        .expect("resolved from cache");
    assert_eq!(record.subcomponent_names(), vec!["eth0", "eth1"]);
    assert_eq!(
        record.get_subcomponent("eth1").unwrap().if_type_label,
        "1000BASE-T (1GE)"
    );
    assert!(ctx.origins(&kind).get("modelB").is_some());
}
