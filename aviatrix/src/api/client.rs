use super::attachment::DeviceTransitGatewayAttachment;
use super::error::ApiError;
use super::firewall::{CloudType, FirewallInstance};
use async_trait::async_trait;
use std::sync::Arc;
use tfplug::Sensitive;

/// Calls the resources make against the controller
#[async_trait]
pub trait ControllerApi: Send + Sync {
    async fn create_device_transit_gateway_attachment(
        &self,
        attachment: &DeviceTransitGatewayAttachment,
    ) -> Result<(), ApiError>;

    async fn get_device_transit_gateway_attachment(
        &self,
        connection_name: &str,
    ) -> Result<DeviceTransitGatewayAttachment, ApiError>;

    async fn delete_device_attachment(&self, connection_name: &str) -> Result<(), ApiError>;

    async fn get_vpc_cloud_type_by_id(&self, vpc_id: &str) -> Result<CloudType, ApiError>;

    /// Returns the new instance ID
    async fn create_firewall_instance(&self, instance: &FirewallInstance)
        -> Result<String, ApiError>;

    async fn get_firewall_instance(&self, instance_id: &str) -> Result<FirewallInstance, ApiError>;

    /// Only `vpc_id` and `instance_id` are used
    async fn delete_firewall_instance(&self, instance: &FirewallInstance) -> Result<(), ApiError>;
}

/// Connection settings from the provider block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub controller_ip: String,
    pub username: String,
    pub password: Sensitive,
    pub verify_ssl_certificate: bool,
}

/// Builds a client handle once the provider is configured
#[async_trait]
pub trait ControllerConnector: Send + Sync {
    async fn connect(&self, config: &ControllerConfig) -> Result<Arc<dyn ControllerApi>, ApiError>;
}
