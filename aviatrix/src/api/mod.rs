//! Controller API surface
//!
//! Resources only see the [`ControllerApi`] trait. How a handle is obtained is
//! the [`ControllerConnector`]'s business; [`fake::InMemoryController`] is the
//! in-process implementation used by tests.

mod attachment;
mod client;
mod error;
pub mod fake;
mod firewall;

pub use attachment::{DeviceTransitGatewayAttachment, ROUTING_PROTOCOL_BGP};
pub use client::{ControllerApi, ControllerConfig, ControllerConnector};
pub use error::ApiError;
pub use firewall::{CloudType, FirewallInstance, AVAILABILITY_SET, AZURE_ARM_VENDOR};
