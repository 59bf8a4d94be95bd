//! # netcad-origin
//!
//! Fetches definitions from external sources of record and persists them
//! as origin records.
//!
//! Call [`sync`] with any [`OriginClient`] and record kind, or
//! [`netbox::sync_device_types`] to pull device types from NetBox.

pub mod client;
pub mod error;
pub mod netbox;
pub mod pipeline;
pub mod report;

pub use client::{OriginClient, SharedClient};
pub use error::{ClientError, SyncError};
pub use netbox::{NetboxClient, NetboxOriginDeviceType};
pub use pipeline::sync;
pub use report::{SyncOutcome, SyncReport};
