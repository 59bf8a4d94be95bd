//! NetBox as an origin for device-type definitions.

mod client;
mod device_type;

use std::sync::Arc;

use netcad_core::{CacheStore, NetboxSettings, RegistryContext};

pub use client::NetboxClient;
pub use device_type::{NetboxOriginDeviceType, DEVICE_TYPES_ENTITY, NETBOX_SOURCE};

use crate::error::SyncError;
use crate::pipeline::{sync, SyncReport};

/// Fetch `models` from NetBox, cache them, and install them in `ctx`.
///
/// The client lives for this call only.
pub async fn sync_device_types<I, S>(
    settings: &NetboxSettings,
    ctx: Arc<RegistryContext>,
    cache: CacheStore,
    models: I,
) -> Result<SyncReport, SyncError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let client = Arc::new(NetboxClient::new(settings)?);
    sync::<NetboxOriginDeviceType, _, _>(ctx, client, cache, models).await
}
