//! In-memory controller
//!
//! Answers the calls resources make the way the controller does: attachments
//! get tunnel addresses assigned when none were requested, firewall subnets
//! have their zone suffix moved into `availability_zone`, and missing objects
//! come back as [`ApiError::NotFound`]. Every call is recorded, and any call
//! can be made to fail.

use super::{
    ApiError, CloudType, ControllerApi, ControllerConfig, ControllerConnector,
    DeviceTransitGatewayAttachment, FirewallInstance, AVAILABILITY_SET, ROUTING_PROTOCOL_BGP,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Names under which calls are recorded and failures injected
pub mod call {
    pub const CREATE_ATTACHMENT: &str = "create_device_transit_gateway_attachment";
    pub const GET_ATTACHMENT: &str = "get_device_transit_gateway_attachment";
    pub const DELETE_ATTACHMENT: &str = "delete_device_attachment";
    pub const GET_VPC_CLOUD_TYPE: &str = "get_vpc_cloud_type_by_id";
    pub const CREATE_FIREWALL: &str = "create_firewall_instance";
    pub const GET_FIREWALL: &str = "get_firewall_instance";
    pub const DELETE_FIREWALL: &str = "delete_firewall_instance";
}

/// Image version the controller picks when none is requested
pub const DEFAULT_FIREWALL_IMAGE_VERSION: &str = "10.1.4";

#[derive(Default)]
struct ControllerState {
    attachments: HashMap<String, DeviceTransitGatewayAttachment>,
    vpcs: HashMap<String, CloudType>,
    firewalls: HashMap<String, FirewallInstance>,
    next_id: u32,
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, ApiError>,
}

impl ControllerState {
    fn begin(&mut self, call: &'static str) -> Result<(), ApiError> {
        self.calls.push(call);
        match self.failures.get(call) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn allocate_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryController {
    state: Mutex<ControllerState>,
}

impl InMemoryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_vpc(&self, vpc_id: &str, cloud_type: CloudType) {
        self.state
            .lock()
            .await
            .vpcs
            .insert(vpc_id.to_string(), cloud_type);
    }

    /// Stores an attachment as-is, bypassing create
    pub async fn insert_attachment(&self, attachment: DeviceTransitGatewayAttachment) {
        self.state
            .lock()
            .await
            .attachments
            .insert(attachment.connection_name.clone(), attachment);
    }

    pub async fn attachment(&self, connection_name: &str) -> Option<DeviceTransitGatewayAttachment> {
        self.state.lock().await.attachments.get(connection_name).cloned()
    }

    pub async fn firewall_instance(&self, instance_id: &str) -> Option<FirewallInstance> {
        self.state.lock().await.firewalls.get(instance_id).cloned()
    }

    /// Makes every later `call` fail with `error`
    pub async fn fail_on(&self, call: &'static str, error: ApiError) {
        self.state.lock().await.failures.insert(call, error);
    }

    pub async fn clear_failures(&self) {
        self.state.lock().await.failures.clear();
    }

    pub async fn calls(&self) -> Vec<&'static str> {
        self.state.lock().await.calls.clone()
    }

    pub async fn call_count(&self, call: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| **c == call)
            .count()
    }
}

/// Splits `"<subnet>~~<zone>~~"` into its parts
fn split_zone_suffix(subnet: &str) -> (String, Option<String>) {
    match subnet
        .strip_suffix("~~")
        .and_then(|rest| rest.split_once("~~"))
    {
        Some((subnet, zone)) => (subnet.to_string(), Some(zone.to_string())),
        None => (subnet.to_string(), None),
    }
}

#[async_trait]
impl ControllerApi for InMemoryController {
    async fn create_device_transit_gateway_attachment(
        &self,
        attachment: &DeviceTransitGatewayAttachment,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock().await;
        state.begin(call::CREATE_ATTACHMENT)?;

        if attachment.routing_protocol != ROUTING_PROTOCOL_BGP {
            return Err(ApiError::rejected(
                call::CREATE_ATTACHMENT,
                format!("unsupported routing protocol '{}'", attachment.routing_protocol),
            ));
        }
        if state.attachments.contains_key(&attachment.connection_name) {
            return Err(ApiError::rejected(
                call::CREATE_ATTACHMENT,
                format!("connection '{}' already exists", attachment.connection_name),
            ));
        }

        let mut stored = attachment.clone();
        if stored.local_tunnel_ip.is_empty() && stored.remote_tunnel_ip.is_empty() {
            let n = state.allocate_id();
            stored.local_tunnel_ip = format!("169.254.{}.1/30", n);
            stored.remote_tunnel_ip = format!("169.254.{}.2/30", n);
        }
        state
            .attachments
            .insert(stored.connection_name.clone(), stored);
        Ok(())
    }

    async fn get_device_transit_gateway_attachment(
        &self,
        connection_name: &str,
    ) -> Result<DeviceTransitGatewayAttachment, ApiError> {
        let mut state = self.state.lock().await;
        state.begin(call::GET_ATTACHMENT)?;
        state
            .attachments
            .get(connection_name)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn delete_device_attachment(&self, connection_name: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().await;
        state.begin(call::DELETE_ATTACHMENT)?;
        state
            .attachments
            .remove(connection_name)
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }

    async fn get_vpc_cloud_type_by_id(&self, vpc_id: &str) -> Result<CloudType, ApiError> {
        let mut state = self.state.lock().await;
        state.begin(call::GET_VPC_CLOUD_TYPE)?;
        state.vpcs.get(vpc_id).copied().ok_or(ApiError::NotFound)
    }

    async fn create_firewall_instance(
        &self,
        instance: &FirewallInstance,
    ) -> Result<String, ApiError> {
        let mut state = self.state.lock().await;
        state.begin(call::CREATE_FIREWALL)?;

        let cloud_type = state.vpcs.get(&instance.vpc_id).copied().ok_or_else(|| {
            ApiError::rejected(
                call::CREATE_FIREWALL,
                format!("vpc '{}' does not exist", instance.vpc_id),
            )
        })?;

        let (egress_subnet, egress_zone) = split_zone_suffix(&instance.egress_subnet);
        let (management_subnet, management_zone) = split_zone_suffix(&instance.management_subnet);
        if egress_zone != management_zone {
            return Err(ApiError::rejected(
                call::CREATE_FIREWALL,
                "egress and management subnets are in different zones",
            ));
        }

        let availability_zone = match egress_zone {
            Some(zone) => zone.trim_start_matches("az-").to_string(),
            None if cloud_type == CloudType::Azure => AVAILABILITY_SET.to_string(),
            None => String::new(),
        };

        let n = state.allocate_id();
        let instance_id = format!("i-{:017x}", n);
        let image_version = if instance.firewall_image_version.is_empty() {
            DEFAULT_FIREWALL_IMAGE_VERSION.to_string()
        } else {
            instance.firewall_image_version.clone()
        };

        let stored = FirewallInstance {
            instance_id: instance_id.clone(),
            egress_subnet,
            management_subnet,
            firewall_image_version: image_version,
            password: Default::default(),
            lan_interface: format!("eni-{:08x}-lan", n),
            management_interface: format!("eni-{:08x}-mgmt", n),
            egress_interface: format!("eni-{:08x}-egress", n),
            management_public_ip: format!("198.51.100.{}", n % 255),
            availability_zone,
            cloud_vendor: cloud_type.vendor().to_string(),
            ..instance.clone()
        };
        state.firewalls.insert(instance_id.clone(), stored);
        Ok(instance_id)
    }

    async fn get_firewall_instance(&self, instance_id: &str) -> Result<FirewallInstance, ApiError> {
        let mut state = self.state.lock().await;
        state.begin(call::GET_FIREWALL)?;
        state
            .firewalls
            .get(instance_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn delete_firewall_instance(&self, instance: &FirewallInstance) -> Result<(), ApiError> {
        let mut state = self.state.lock().await;
        state.begin(call::DELETE_FIREWALL)?;

        let stored = state
            .firewalls
            .get(&instance.instance_id)
            .ok_or(ApiError::NotFound)?;
        if stored.vpc_id != instance.vpc_id {
            return Err(ApiError::rejected(
                call::DELETE_FIREWALL,
                format!(
                    "instance '{}' is not in vpc '{}'",
                    instance.instance_id, instance.vpc_id
                ),
            ));
        }
        state.firewalls.remove(&instance.instance_id);
        Ok(())
    }
}

/// Connector handing out one shared [`InMemoryController`]
pub struct InMemoryConnector {
    controller: Arc<InMemoryController>,
    last_config: Mutex<Option<ControllerConfig>>,
}

impl InMemoryConnector {
    pub fn new(controller: Arc<InMemoryController>) -> Self {
        Self {
            controller,
            last_config: Mutex::new(None),
        }
    }

    /// Settings of the most recent successful connect
    pub async fn last_config(&self) -> Option<ControllerConfig> {
        self.last_config.lock().await.clone()
    }
}

#[async_trait]
impl ControllerConnector for InMemoryConnector {
    async fn connect(
        &self,
        config: &ControllerConfig,
    ) -> Result<Arc<dyn ControllerApi>, ApiError> {
        if config.controller_ip.is_empty() {
            return Err(ApiError::Unavailable("no controller address".to_string()));
        }
        if config.username.is_empty() || config.password.is_empty() {
            return Err(ApiError::AuthError);
        }
        *self.last_config.lock().await = Some(config.clone());
        let controller: Arc<dyn ControllerApi> = self.controller.clone();
        Ok(controller)
    }
}
