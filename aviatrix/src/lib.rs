//! Aviatrix provider for tfplug
//!
//! Manages device to transit gateway attachments and FireNet firewall
//! instances through an Aviatrix controller.

pub mod api;
pub mod convert;
pub mod provider_data;
pub mod resources;

pub use provider_data::AviatrixProviderData;

use api::{ControllerConfig, ControllerConnector};
use async_trait::async_trait;
use resources::device_transit_gateway_attachment::{self, DeviceTransitGatewayAttachmentResource};
use resources::firewall_instance::{self, FirewallInstanceResource};
use std::sync::Arc;
use tfplug::defaults::StaticDefault;
use tfplug::types::has_errors;
use tfplug::{
    AttributeBuilder, AttributePath, AttributeType, ConfigureProviderRequest,
    ConfigureProviderResponse, Diagnostic, DynamicValue, Provider, Resource, Schema,
    SchemaBuilder, Sensitive, TfplugError,
};

pub struct AviatrixProvider {
    connector: Arc<dyn ControllerConnector>,
    provider_data: Option<AviatrixProviderData>,
}

impl AviatrixProvider {
    pub fn new(connector: Arc<dyn ControllerConnector>) -> Self {
        Self {
            connector,
            provider_data: None,
        }
    }

    pub fn provider_data(&self) -> Option<&AviatrixProviderData> {
        self.provider_data.as_ref()
    }
}

fn string_setting(config: &DynamicValue, name: &str, env_var: &str) -> Option<String> {
    config
        .get_optional_string(&AttributePath::new(name))
        .ok()
        .flatten()
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.is_empty()))
}

fn bool_setting(
    config: &DynamicValue,
    name: &'static str,
    env_var: &str,
) -> Result<Option<bool>, Diagnostic> {
    if let Ok(Some(value)) = config.get_optional_bool(&AttributePath::new(name)) {
        return Ok(Some(value));
    }
    match std::env::var(env_var) {
        Ok(value) if !value.is_empty() => convert::parse_bool(name, &value)
            .map(Some)
            .map_err(|e| Diagnostic::error(format!("Invalid {} value", env_var), e.to_string())),
        _ => Ok(None),
    }
}

#[async_trait]
impl Provider for AviatrixProvider {
    fn type_name(&self) -> &str {
        "aviatrix"
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Aviatrix controller connection settings")
            .attribute(
                AttributeBuilder::new("controller_ip", AttributeType::String)
                    .description("Controller address (or AVIATRIX_CONTROLLER_IP)")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("username", AttributeType::String)
                    .description("Controller username (or AVIATRIX_USERNAME)")
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("password", AttributeType::String)
                    .description("Controller password (or AVIATRIX_PASSWORD)")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("verify_ssl_certificate", AttributeType::Bool)
                    .description("Verify the controller's TLS certificate (or AVIATRIX_VERIFY_SSL_CERTIFICATE)")
                    .optional()
                    .default(StaticDefault::bool(false))
                    .build(),
            )
            .build()
    }

    async fn configure(&mut self, request: ConfigureProviderRequest) -> ConfigureProviderResponse {
        let mut diagnostics = self.schema().validate_config(&request.config);
        if has_errors(&diagnostics) {
            return ConfigureProviderResponse { diagnostics };
        }

        let config = &request.config;
        let controller_ip = string_setting(config, "controller_ip", "AVIATRIX_CONTROLLER_IP");
        let username = string_setting(config, "username", "AVIATRIX_USERNAME");
        let password = string_setting(config, "password", "AVIATRIX_PASSWORD");
        let verify_ssl_certificate =
            match bool_setting(config, "verify_ssl_certificate", "AVIATRIX_VERIFY_SSL_CERTIFICATE") {
                Ok(value) => value.unwrap_or(false),
                Err(diag) => {
                    diagnostics.push(diag);
                    false
                }
            };

        for (value, name, env_var) in [
            (&controller_ip, "controller_ip", "AVIATRIX_CONTROLLER_IP"),
            (&username, "username", "AVIATRIX_USERNAME"),
            (&password, "password", "AVIATRIX_PASSWORD"),
        ] {
            if value.is_none() {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} is required (set in provider config or {} env var)", name, env_var),
                        format!("The provider cannot reach the controller without {}", name),
                    )
                    .with_attribute(AttributePath::new(name)),
                );
            }
        }

        let (Some(controller_ip), Some(username), Some(password)) = (controller_ip, username, password)
        else {
            return ConfigureProviderResponse { diagnostics };
        };
        if has_errors(&diagnostics) {
            return ConfigureProviderResponse { diagnostics };
        }

        let controller_config = ControllerConfig {
            controller_ip,
            username,
            password: Sensitive::from(password),
            verify_ssl_certificate,
        };
        tracing::debug!(
            "Connecting to controller {} as {}",
            controller_config.controller_ip,
            controller_config.username
        );

        match self.connector.connect(&controller_config).await {
            Ok(client) => {
                self.provider_data = Some(AviatrixProviderData::new(
                    client,
                    controller_config.controller_ip,
                ));
            }
            Err(e) => diagnostics.push(Diagnostic::error(
                "Failed to connect to the Aviatrix controller",
                e.to_string(),
            )),
        }

        ConfigureProviderResponse { diagnostics }
    }

    fn resource_types(&self) -> Vec<String> {
        vec![
            device_transit_gateway_attachment::TYPE_NAME.to_string(),
            firewall_instance::TYPE_NAME.to_string(),
        ]
    }

    async fn create_resource(&self, type_name: &str) -> tfplug::Result<Box<dyn Resource>> {
        let data = self
            .provider_data
            .as_ref()
            .ok_or(TfplugError::ProviderNotConfigured)?;
        let client = data.client.clone();
        tracing::debug!(
            "Creating {} resource for controller {}",
            type_name,
            data.controller_ip
        );

        match type_name {
            device_transit_gateway_attachment::TYPE_NAME => {
                Ok(Box::new(DeviceTransitGatewayAttachmentResource::new(client)))
            }
            firewall_instance::TYPE_NAME => Ok(Box::new(FirewallInstanceResource::new(client))),
            _ => Err(TfplugError::ResourceNotFound(type_name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::fake::{InMemoryConnector, InMemoryController};
    use serial_test::serial;

    const ENV_VARS: [&str; 4] = [
        "AVIATRIX_CONTROLLER_IP",
        "AVIATRIX_USERNAME",
        "AVIATRIX_PASSWORD",
        "AVIATRIX_VERIFY_SSL_CERTIFICATE",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    fn connector() -> Arc<InMemoryConnector> {
        Arc::new(InMemoryConnector::new(Arc::new(InMemoryController::new())))
    }

    fn request(config: DynamicValue) -> ConfigureProviderRequest {
        ConfigureProviderRequest {
            terraform_version: "1.9.0".to_string(),
            config,
        }
    }

    fn full_config() -> DynamicValue {
        let mut config = DynamicValue::object();
        config.set_string(&AttributePath::new("controller_ip"), "10.1.1.1").unwrap();
        config.set_string(&AttributePath::new("username"), "admin").unwrap();
        config.set_string(&AttributePath::new("password"), "controller-pw").unwrap();
        config
    }

    #[tokio::test]
    #[serial]
    async fn configure_uses_provider_block_settings() {
        clear_env();
        let connector = connector();
        let mut provider = AviatrixProvider::new(connector.clone());

        let response = provider.configure(request(full_config())).await;
        assert!(response.diagnostics.is_empty());
        assert!(provider.provider_data().is_some());

        let config = connector.last_config().await.unwrap();
        assert_eq!(config.controller_ip, "10.1.1.1");
        assert_eq!(config.password.expose(), "controller-pw");
        assert!(!config.verify_ssl_certificate);
    }

    #[tokio::test]
    #[serial]
    async fn configure_falls_back_to_environment() {
        clear_env();
        std::env::set_var("AVIATRIX_CONTROLLER_IP", "10.2.2.2");
        std::env::set_var("AVIATRIX_USERNAME", "operator");
        std::env::set_var("AVIATRIX_PASSWORD", "env-pw");
        std::env::set_var("AVIATRIX_VERIFY_SSL_CERTIFICATE", "true");

        let connector = connector();
        let mut provider = AviatrixProvider::new(connector.clone());
        let response = provider.configure(request(DynamicValue::object())).await;
        clear_env();

        assert!(response.diagnostics.is_empty());
        let config = connector.last_config().await.unwrap();
        assert_eq!(config.controller_ip, "10.2.2.2");
        assert_eq!(config.username, "operator");
        assert!(config.verify_ssl_certificate);
    }

    #[tokio::test]
    #[serial]
    async fn configure_reports_each_missing_setting() {
        clear_env();
        let mut provider = AviatrixProvider::new(connector());

        let response = provider.configure(request(DynamicValue::object())).await;
        assert_eq!(response.diagnostics.len(), 3);
        assert!(response.diagnostics[0].summary.contains("AVIATRIX_CONTROLLER_IP"));
        assert!(provider.provider_data().is_none());
    }

    #[tokio::test]
    #[serial]
    async fn configure_rejects_malformed_verify_flag() {
        clear_env();
        std::env::set_var("AVIATRIX_VERIFY_SSL_CERTIFICATE", "maybe");
        let mut provider = AviatrixProvider::new(connector());

        let response = provider.configure(request(full_config())).await;
        clear_env();

        assert_eq!(response.diagnostics.len(), 1);
        assert!(provider.provider_data().is_none());
    }

    #[tokio::test]
    #[serial]
    async fn resources_require_a_configured_provider() {
        clear_env();
        let mut provider = AviatrixProvider::new(connector());
        assert!(matches!(
            provider.create_resource(firewall_instance::TYPE_NAME).await,
            Err(TfplugError::ProviderNotConfigured)
        ));

        provider.configure(request(full_config())).await;
        for type_name in provider.resource_types() {
            let resource = provider.create_resource(&type_name).await.unwrap();
            assert_eq!(resource.type_name(), type_name);
        }
        assert!(matches!(
            provider.create_resource("aviatrix_gateway").await,
            Err(TfplugError::ResourceNotFound(_))
        ));
    }
}
