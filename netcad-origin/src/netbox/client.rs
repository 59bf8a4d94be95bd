use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::{json, Value};

use netcad_core::NetboxSettings;

use crate::client::OriginClient;
use crate::error::ClientError;

const DEVICE_TYPES_PATH: &str = "/api/dcim/device-types/";
const INTERFACE_TEMPLATES_PATH: &str = "/api/dcim/interface-templates/";
const CONSOLE_PORT_TEMPLATES_PATH: &str = "/api/dcim/console-port-templates/";

/// NetBox REST client for device-type templates.
///
/// Wraps one `reqwest::Client`, whose connection pool is shared by every
/// concurrent fetch issued through this handle.
#[derive(Debug, Clone)]
pub struct NetboxClient {
    http: reqwest::Client,
    base_url: String,
}

impl NetboxClient {
    pub fn new(settings: &NetboxSettings) -> Result<Self, ClientError> {
        let token = HeaderValue::from_str(&format!("Token {}", settings.token))
            .map_err(|_| ClientError::Decode("NetBox token is not a valid header value".into()))?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_owned(),
        })
    }

    /// Device-type record for `model` together with its interface and
    /// console-port templates, or `None` if NetBox has no such model.
    pub async fn fetch_device_template(&self, model: &str) -> Result<Option<Value>, ClientError> {
        let found = self
            .get_json(DEVICE_TYPES_PATH, &[("model", model.to_owned())])
            .await?;
        let Some(device_type) = found
            .get("results")
            .and_then(Value::as_array)
            .and_then(|r| r.first())
            .cloned()
        else {
            return Ok(None);
        };

        let id = device_type
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| ClientError::Decode(format!("device type {model} has no numeric id")))?;

        let (interfaces, console_ports) = tokio::try_join!(
            self.list_templates(INTERFACE_TEMPLATES_PATH, id),
            self.list_templates(CONSOLE_PORT_TEMPLATES_PATH, id),
        )?;

        Ok(Some(json!({
            "device_type": device_type,
            "interfaces": interfaces,
            "console_ports": console_ports,
        })))
    }

    async fn list_templates(&self, path: &str, devicetype_id: u64) -> Result<Value, ClientError> {
        let page = self
            .get_json(
                path,
                &[
                    ("devicetype_id", devicetype_id.to_string()),
                    ("limit", "0".to_owned()),
                ],
            )
            .await?;
        page.get("results")
            .and_then(Value::as_array)
            .map(|results| Value::Array(results.clone()))
            .ok_or_else(|| ClientError::Decode(format!("{path} response has no results list")))
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ClientError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, ?query, "netbox GET");
        let resp = self.http.get(&url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl OriginClient for NetboxClient {
    async fn fetch(&self, key: &str) -> Result<Option<Value>, ClientError> {
        self.fetch_device_template(key).await
    }
}
