//! aviatrix_device_transit_gateway_attachment
//!
//! Attaches a branch device to a transit gateway over an IPsec/BGP connection.
//! The connection name is the record's identity. Every argument is ForceNew.

use super::{desired_state, ResourceError};
use crate::api::{ControllerApi, DeviceTransitGatewayAttachment, ROUTING_PROTOCOL_BGP};
use crate::convert::{format_bool, format_int, non_empty, parse_bool, parse_int};
use async_trait::async_trait;
use std::sync::Arc;
use tfplug::defaults::StaticDefault;
use tfplug::plan_modifier::UseStateForUnknown;
use tfplug::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::{
    import_state_passthrough_id, AttributeBuilder, AttributePath, AttributeType, DynamicValue,
    Resource, ResourceWithImportState, Schema, SchemaBuilder, Sensitive,
};

pub const TYPE_NAME: &str = "aviatrix_device_transit_gateway_attachment";

const RESOURCE: &str = "device transit gateway attachment";

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceTransitGatewayAttachmentModel {
    pub device_name: String,
    pub transit_gateway_name: String,
    pub connection_name: String,
    pub transit_gateway_bgp_asn: i64,
    pub device_bgp_asn: i64,
    pub phase1_authentication: String,
    pub phase1_dh_groups: i64,
    pub phase1_encryption: String,
    pub phase2_authentication: String,
    pub phase2_dh_groups: i64,
    pub phase2_encryption: String,
    pub enable_global_accelerator: bool,
    pub pre_shared_key: Option<Sensitive>,
    pub local_tunnel_ip: Option<String>,
    pub remote_tunnel_ip: Option<String>,
}

impl DeviceTransitGatewayAttachmentModel {
    /// Reads a defaults-applied configuration or a stored state
    pub fn from_state(state: &DynamicValue) -> tfplug::Result<Self> {
        Ok(Self {
            device_name: state.get_string(&AttributePath::new("device_name"))?,
            transit_gateway_name: state.get_string(&AttributePath::new("transit_gateway_name"))?,
            connection_name: state.get_string(&AttributePath::new("connection_name"))?,
            transit_gateway_bgp_asn: state.get_int(&AttributePath::new("transit_gateway_bgp_asn"))?,
            device_bgp_asn: state.get_int(&AttributePath::new("device_bgp_asn"))?,
            phase1_authentication: state.get_string(&AttributePath::new("phase1_authentication"))?,
            phase1_dh_groups: state.get_int(&AttributePath::new("phase1_dh_groups"))?,
            phase1_encryption: state.get_string(&AttributePath::new("phase1_encryption"))?,
            phase2_authentication: state.get_string(&AttributePath::new("phase2_authentication"))?,
            phase2_dh_groups: state.get_int(&AttributePath::new("phase2_dh_groups"))?,
            phase2_encryption: state.get_string(&AttributePath::new("phase2_encryption"))?,
            enable_global_accelerator: state
                .get_bool(&AttributePath::new("enable_global_accelerator"))?,
            pre_shared_key: state
                .get_optional_string(&AttributePath::new("pre_shared_key"))?
                .map(Sensitive::from),
            local_tunnel_ip: state.get_optional_string(&AttributePath::new("local_tunnel_ip"))?,
            remote_tunnel_ip: state.get_optional_string(&AttributePath::new("remote_tunnel_ip"))?,
        })
    }

    pub fn to_state(&self) -> tfplug::Result<DynamicValue> {
        let mut state = DynamicValue::object();
        state.set_string(&AttributePath::new("id"), &self.connection_name)?;
        state.set_string(&AttributePath::new("device_name"), &self.device_name)?;
        state.set_string(&AttributePath::new("transit_gateway_name"), &self.transit_gateway_name)?;
        state.set_string(&AttributePath::new("connection_name"), &self.connection_name)?;
        state.set_int(&AttributePath::new("transit_gateway_bgp_asn"), self.transit_gateway_bgp_asn)?;
        state.set_int(&AttributePath::new("device_bgp_asn"), self.device_bgp_asn)?;
        state.set_string(&AttributePath::new("phase1_authentication"), &self.phase1_authentication)?;
        state.set_int(&AttributePath::new("phase1_dh_groups"), self.phase1_dh_groups)?;
        state.set_string(&AttributePath::new("phase1_encryption"), &self.phase1_encryption)?;
        state.set_string(&AttributePath::new("phase2_authentication"), &self.phase2_authentication)?;
        state.set_int(&AttributePath::new("phase2_dh_groups"), self.phase2_dh_groups)?;
        state.set_string(&AttributePath::new("phase2_encryption"), &self.phase2_encryption)?;
        state.set_bool(
            &AttributePath::new("enable_global_accelerator"),
            self.enable_global_accelerator,
        )?;
        state.set_optional_string(
            &AttributePath::new("pre_shared_key"),
            self.pre_shared_key.as_ref().map(|k| k.expose().to_string()),
        )?;
        state.set_optional_string(&AttributePath::new("local_tunnel_ip"), self.local_tunnel_ip.clone())?;
        state.set_optional_string(&AttributePath::new("remote_tunnel_ip"), self.remote_tunnel_ip.clone())?;
        Ok(state)
    }

    fn to_remote(&self) -> DeviceTransitGatewayAttachment {
        DeviceTransitGatewayAttachment {
            device_name: self.device_name.clone(),
            transit_gateway_name: self.transit_gateway_name.clone(),
            connection_name: self.connection_name.clone(),
            routing_protocol: ROUTING_PROTOCOL_BGP.to_string(),
            transit_gateway_bgp_asn: format_int(self.transit_gateway_bgp_asn),
            device_bgp_asn: format_int(self.device_bgp_asn),
            phase1_authentication: self.phase1_authentication.clone(),
            phase1_dh_groups: format_int(self.phase1_dh_groups),
            phase1_encryption: self.phase1_encryption.clone(),
            phase2_authentication: self.phase2_authentication.clone(),
            phase2_dh_groups: format_int(self.phase2_dh_groups),
            phase2_encryption: self.phase2_encryption.clone(),
            enable_global_accelerator: format_bool(self.enable_global_accelerator),
            pre_shared_key: self.pre_shared_key.clone().unwrap_or_default(),
            local_tunnel_ip: self.local_tunnel_ip.clone().unwrap_or_default(),
            remote_tunnel_ip: self.remote_tunnel_ip.clone().unwrap_or_default(),
        }
    }

    /// Builds the model from the controller's view. `prior` is `None` on import.
    ///
    /// Tunnel addresses are only taken from the controller when they were set
    /// before or the read is an import. The pre-shared key is never returned
    /// by the controller, so the prior value is kept.
    fn from_remote(
        remote: &DeviceTransitGatewayAttachment,
        prior: Option<&Self>,
    ) -> Result<Self, crate::convert::ConversionError> {
        Ok(Self {
            device_name: remote.device_name.clone(),
            transit_gateway_name: remote.transit_gateway_name.clone(),
            connection_name: remote.connection_name.clone(),
            transit_gateway_bgp_asn: parse_int(
                "transit_gateway_bgp_asn",
                &remote.transit_gateway_bgp_asn,
            )?,
            device_bgp_asn: parse_int("device_bgp_asn", &remote.device_bgp_asn)?,
            phase1_authentication: remote.phase1_authentication.clone(),
            phase1_dh_groups: parse_int("phase1_dh_groups", &remote.phase1_dh_groups)?,
            phase1_encryption: remote.phase1_encryption.clone(),
            phase2_authentication: remote.phase2_authentication.clone(),
            phase2_dh_groups: parse_int("phase2_dh_groups", &remote.phase2_dh_groups)?,
            phase2_encryption: remote.phase2_encryption.clone(),
            enable_global_accelerator: parse_bool(
                "enable_global_accelerator",
                &remote.enable_global_accelerator,
            )?,
            pre_shared_key: prior.and_then(|p| p.pre_shared_key.clone()),
            local_tunnel_ip: refresh_tunnel_ip(
                prior.map(|p| &p.local_tunnel_ip),
                &remote.local_tunnel_ip,
            ),
            remote_tunnel_ip: refresh_tunnel_ip(
                prior.map(|p| &p.remote_tunnel_ip),
                &remote.remote_tunnel_ip,
            ),
        })
    }
}

/// `prior` is `None` on import
fn refresh_tunnel_ip(prior: Option<&Option<String>>, remote: &str) -> Option<String> {
    match prior {
        Some(None) => None,
        Some(Some(_)) | None => non_empty(remote),
    }
}

pub struct DeviceTransitGatewayAttachmentResource {
    client: Arc<dyn ControllerApi>,
}

impl DeviceTransitGatewayAttachmentResource {
    pub fn new(client: Arc<dyn ControllerApi>) -> Self {
        Self { client }
    }

    /// Returns the connection name, which identifies the attachment from now on
    pub async fn create_attachment(
        &self,
        desired: &DeviceTransitGatewayAttachmentModel,
    ) -> Result<String, ResourceError> {
        tracing::debug!(
            "Creating device transit gateway attachment {}",
            desired.connection_name
        );
        self.client
            .create_device_transit_gateway_attachment(&desired.to_remote())
            .await
            .map_err(|e| ResourceError::remote("create", RESOURCE, &desired.connection_name, e))?;
        Ok(desired.connection_name.clone())
    }

    /// `Ok(None)` when the controller no longer has the attachment
    pub async fn read_attachment(
        &self,
        connection_name: &str,
        prior: Option<&DeviceTransitGatewayAttachmentModel>,
    ) -> Result<Option<DeviceTransitGatewayAttachmentModel>, ResourceError> {
        match self
            .client
            .get_device_transit_gateway_attachment(connection_name)
            .await
        {
            Ok(remote) => {
                tracing::info!("Found device transit gateway attachment {}", connection_name);
                Ok(Some(DeviceTransitGatewayAttachmentModel::from_remote(
                    &remote, prior,
                )?))
            }
            Err(e) if e.is_not_found() => {
                tracing::info!(
                    "Device transit gateway attachment {} not found, removing from state",
                    connection_name
                );
                Ok(None)
            }
            Err(e) => Err(ResourceError::remote("read", RESOURCE, connection_name, e)),
        }
    }

    pub async fn delete_attachment(&self, connection_name: &str) -> Result<(), ResourceError> {
        tracing::debug!("Deleting device transit gateway attachment {}", connection_name);
        self.client
            .delete_device_attachment(connection_name)
            .await
            .map_err(|e| ResourceError::remote("delete", RESOURCE, connection_name, e))?;
        tracing::info!("Deleted device transit gateway attachment {}", connection_name);
        Ok(())
    }
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Attaches a branch device to a transit gateway over IPsec with BGP")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("Same as connection_name")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("device_name", AttributeType::String)
                .description("Name of the device")
                .required()
                .force_new()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("transit_gateway_name", AttributeType::String)
                .description("Name of the transit gateway")
                .required()
                .force_new()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("connection_name", AttributeType::String)
                .description("Connection name, unique across the controller")
                .required()
                .force_new()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("transit_gateway_bgp_asn", AttributeType::Number)
                .description("BGP AS number of the transit gateway")
                .required()
                .force_new()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("device_bgp_asn", AttributeType::Number)
                .description("BGP AS number of the device")
                .required()
                .force_new()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("phase1_authentication", AttributeType::String)
                .description("Phase 1 authentication algorithm")
                .optional()
                .force_new()
                .default(StaticDefault::string("SHA-256"))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("phase1_dh_groups", AttributeType::Number)
                .description("Phase 1 Diffie-Hellman group")
                .optional()
                .force_new()
                .default(StaticDefault::number(14.0))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("phase1_encryption", AttributeType::String)
                .description("Phase 1 encryption algorithm")
                .optional()
                .force_new()
                .default(StaticDefault::string("AES-256-CBC"))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("phase2_authentication", AttributeType::String)
                .description("Phase 2 authentication algorithm")
                .optional()
                .force_new()
                .default(StaticDefault::string("HMAC-SHA-256"))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("phase2_dh_groups", AttributeType::Number)
                .description("Phase 2 Diffie-Hellman group")
                .optional()
                .force_new()
                .default(StaticDefault::number(14.0))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("phase2_encryption", AttributeType::String)
                .description("Phase 2 encryption algorithm")
                .optional()
                .force_new()
                .default(StaticDefault::string("AES-256-CBC"))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("enable_global_accelerator", AttributeType::Bool)
                .description("Route the connection through AWS Global Accelerator")
                .optional()
                .force_new()
                .default(StaticDefault::bool(false))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("pre_shared_key", AttributeType::String)
                .description("IPsec pre-shared key")
                .optional()
                .sensitive()
                .force_new()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("local_tunnel_ip", AttributeType::String)
                .description("Local tunnel interface address in CIDR form")
                .optional()
                .force_new()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("remote_tunnel_ip", AttributeType::String)
                .description("Remote tunnel interface address in CIDR form")
                .optional()
                .force_new()
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for DeviceTransitGatewayAttachmentResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn validate(
        &self,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: schema().validate_config(&request.config),
        }
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = match desired_state(&schema(), &request) {
            Ok(desired) => self.create_from_state(&desired).await.map_err(|e| {
                e.into_diagnostics("Failed to create device transit gateway attachment")
            }),
            Err(diagnostics) => Err(diagnostics),
        };

        match result {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diagnostics) => CreateResourceResponse {
                new_state: DynamicValue::null(),
                diagnostics,
            },
        }
    }

    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_state(&request.current_state).await;
        match result {
            Ok(new_state) => ReadResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(e) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics: e.into_diagnostics("Failed to read device transit gateway attachment"),
            },
        }
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let diagnostics = match self.delete_state(&request.prior_state).await {
            Ok(()) => vec![],
            Err(e) => e.into_diagnostics("Failed to delete device transit gateway attachment"),
        };
        DeleteResourceResponse { diagnostics }
    }
}

impl DeviceTransitGatewayAttachmentResource {
    async fn create_from_state(&self, desired: &DynamicValue) -> Result<DynamicValue, ResourceError> {
        let model = DeviceTransitGatewayAttachmentModel::from_state(desired)?;
        self.create_attachment(&model).await?;
        Ok(model.to_state()?)
    }

    /// An empty connection_name means the state came from an import and only
    /// `id` is known
    async fn read_state(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, ResourceError> {
        let (connection_name, prior) = if state.is_set(&AttributePath::new("connection_name")) {
            let prior = DeviceTransitGatewayAttachmentModel::from_state(state)?;
            (prior.connection_name.clone(), Some(prior))
        } else {
            let id = state.get_string(&AttributePath::new("id"))?;
            tracing::debug!(
                "Looks like an import, no connection_name received. Import Id is {}",
                id
            );
            (id, None)
        };

        match self.read_attachment(&connection_name, prior.as_ref()).await? {
            Some(model) => Ok(Some(model.to_state()?)),
            None => Ok(None),
        }
    }

    async fn delete_state(&self, state: &DynamicValue) -> Result<(), ResourceError> {
        let connection_name = state.get_string(&AttributePath::new("connection_name"))?;
        self.delete_attachment(&connection_name).await
    }
}

#[async_trait]
impl ResourceWithImportState for DeviceTransitGatewayAttachmentResource {
    async fn import_state(&self, request: ImportResourceStateRequest) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(AttributePath::new("id"), &request, &mut response);
        response
    }
}
