//! aviatrix_firewall_instance
//!
//! Launches a firewall VM attached to a FireNet gateway. The controller assigns
//! the instance ID, which becomes the record's identity; deleting needs the
//! VPC ID as well. Every argument is ForceNew.

use super::{desired_state, ResourceError};
use crate::api::{
    ApiError, CloudType, ControllerApi, FirewallInstance, AVAILABILITY_SET, AZURE_ARM_VENDOR,
};
use crate::convert::non_empty;
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tfplug::constraint::{check_conditional_attributes, ConditionalAttribute};
use tfplug::plan_modifier::UseStateForUnknown;
use tfplug::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::validator::{StringNoneOfValidator, StringPatternValidator};
use tfplug::{
    import_state_passthrough_id, AttributeBuilder, AttributePath, AttributeType, DynamicValue,
    Diagnostic, Resource, ResourceWithImportState, Schema, SchemaBuilder, Sensitive,
};

pub const TYPE_NAME: &str = "aviatrix_firewall_instance";

const RESOURCE: &str = "firewall instance";

fn is_azure(cloud_type: &CloudType) -> bool {
    *cloud_type == CloudType::Azure
}

/// Attributes whose legality depends on the VPC's cloud
pub const FIREWALL_CONSTRAINTS: &[ConditionalAttribute<CloudType>] = &[ConditionalAttribute {
    attribute: "zone",
    allowed: is_azure,
    requirement: "only valid for AZURE",
}];

fn zone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^az-\d+$").expect("zone pattern is a valid regex"))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FirewallInstanceModel {
    pub vpc_id: String,
    pub firenet_gw_name: String,
    pub firewall_name: String,
    pub firewall_image: String,
    pub firewall_size: String,
    pub egress_subnet: String,
    pub management_subnet: String,
    pub firewall_image_version: Option<String>,
    pub key_name: Option<String>,
    pub iam_role: Option<String>,
    pub bootstrap_bucket_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<Sensitive>,
    pub zone: Option<String>,

    // Computed
    pub instance_id: Option<String>,
    pub lan_interface: Option<String>,
    pub management_interface: Option<String>,
    pub egress_interface: Option<String>,
    pub public_ip: Option<String>,
}

impl FirewallInstanceModel {
    pub fn from_state(state: &DynamicValue) -> tfplug::Result<Self> {
        let optional = |name: &str| state.get_optional_string(&AttributePath::new(name));
        Ok(Self {
            vpc_id: state.get_string(&AttributePath::new("vpc_id"))?,
            firenet_gw_name: state.get_string(&AttributePath::new("firenet_gw_name"))?,
            firewall_name: state.get_string(&AttributePath::new("firewall_name"))?,
            firewall_image: state.get_string(&AttributePath::new("firewall_image"))?,
            firewall_size: state.get_string(&AttributePath::new("firewall_size"))?,
            egress_subnet: state.get_string(&AttributePath::new("egress_subnet"))?,
            management_subnet: state.get_string(&AttributePath::new("management_subnet"))?,
            firewall_image_version: optional("firewall_image_version")?,
            key_name: optional("key_name")?,
            iam_role: optional("iam_role")?,
            bootstrap_bucket_name: optional("bootstrap_bucket_name")?,
            username: optional("username")?,
            password: optional("password")?.map(Sensitive::from),
            zone: optional("zone")?,
            instance_id: optional("instance_id")?,
            lan_interface: optional("lan_interface")?,
            management_interface: optional("management_interface")?,
            egress_interface: optional("egress_interface")?,
            public_ip: optional("public_ip")?,
        })
    }

    pub fn to_state(&self) -> tfplug::Result<DynamicValue> {
        let mut state = DynamicValue::object();
        let required = [
            ("vpc_id", &self.vpc_id),
            ("firenet_gw_name", &self.firenet_gw_name),
            ("firewall_name", &self.firewall_name),
            ("firewall_image", &self.firewall_image),
            ("firewall_size", &self.firewall_size),
            ("egress_subnet", &self.egress_subnet),
            ("management_subnet", &self.management_subnet),
        ];
        for (name, value) in required {
            state.set_string(&AttributePath::new(name), value)?;
        }

        let password = self.password.as_ref().map(|p| p.expose().to_string());
        let optional = [
            ("id", &self.instance_id),
            ("firewall_image_version", &self.firewall_image_version),
            ("key_name", &self.key_name),
            ("iam_role", &self.iam_role),
            ("bootstrap_bucket_name", &self.bootstrap_bucket_name),
            ("username", &self.username),
            ("password", &password),
            ("zone", &self.zone),
            ("instance_id", &self.instance_id),
            ("lan_interface", &self.lan_interface),
            ("management_interface", &self.management_interface),
            ("egress_interface", &self.egress_interface),
            ("public_ip", &self.public_ip),
        ];
        for (name, value) in optional {
            state.set_optional_string(&AttributePath::new(name), value.clone())?;
        }
        Ok(state)
    }

    /// The create request. With a zone, both subnets carry it as a
    /// `"<subnet>~~<zone>~~"` suffix.
    fn to_remote(&self) -> FirewallInstance {
        let subnet = |subnet: &str| match &self.zone {
            Some(zone) => format!("{}~~{}~~", subnet, zone),
            None => subnet.to_string(),
        };

        FirewallInstance {
            vpc_id: self.vpc_id.clone(),
            firenet_gw_name: self.firenet_gw_name.clone(),
            firewall_name: self.firewall_name.clone(),
            firewall_image: self.firewall_image.clone(),
            firewall_image_version: self.firewall_image_version.clone().unwrap_or_default(),
            firewall_size: self.firewall_size.clone(),
            egress_subnet: subnet(&self.egress_subnet),
            management_subnet: subnet(&self.management_subnet),
            key_name: self.key_name.clone().unwrap_or_default(),
            iam_role: self.iam_role.clone().unwrap_or_default(),
            bootstrap_bucket_name: self.bootstrap_bucket_name.clone().unwrap_or_default(),
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Builds the model from the controller's view. `prior` is `None` on import.
    fn from_remote(remote: &FirewallInstance, prior: Option<&Self>) -> Self {
        let importing = prior.is_none();
        let prior = prior.cloned().unwrap_or_default();

        // Only set when the controller reports one
        let remote_or_prior =
            |remote: &str, prior: &Option<String>| non_empty(remote).or_else(|| prior.clone());

        let key_name = if prior.key_name.is_some() {
            non_empty(&remote.key_name)
        } else {
            prior.key_name.clone()
        };

        let zone_reported = !remote.availability_zone.is_empty()
            && remote.availability_zone != AVAILABILITY_SET
            && remote.cloud_vendor == AZURE_ARM_VENDOR;
        let zone = if (prior.zone.is_some() || importing) && zone_reported {
            Some(format!("az-{}", remote.availability_zone))
        } else {
            prior.zone.clone()
        };

        Self {
            vpc_id: remote.vpc_id.clone(),
            firenet_gw_name: remote.firenet_gw_name.clone(),
            firewall_name: remote.firewall_name.clone(),
            firewall_image: remote.firewall_image.clone(),
            firewall_size: remote.firewall_size.clone(),
            egress_subnet: remote.egress_subnet.clone(),
            management_subnet: remote.management_subnet.clone(),
            firewall_image_version: remote_or_prior(
                &remote.firewall_image_version,
                &prior.firewall_image_version,
            ),
            key_name,
            iam_role: remote_or_prior(&remote.iam_role, &prior.iam_role),
            bootstrap_bucket_name: remote_or_prior(
                &remote.bootstrap_bucket_name,
                &prior.bootstrap_bucket_name,
            ),
            username: remote_or_prior(&remote.username, &prior.username),
            password: prior.password.clone(),
            zone,
            instance_id: non_empty(&remote.instance_id),
            lan_interface: non_empty(&remote.lan_interface),
            management_interface: non_empty(&remote.management_interface),
            egress_interface: non_empty(&remote.egress_interface),
            public_ip: non_empty(&remote.management_public_ip),
        }
    }
}

pub struct FirewallInstanceResource {
    client: Arc<dyn ControllerApi>,
}

impl FirewallInstanceResource {
    pub fn new(client: Arc<dyn ControllerApi>) -> Self {
        Self { client }
    }

    /// Looks up the VPC's cloud, checks the cloud-dependent attributes, then
    /// launches the instance. Returns the new instance ID.
    pub async fn create_instance(&self, desired: &FirewallInstanceModel) -> Result<String, ResourceError> {
        let cloud_type = self
            .client
            .get_vpc_cloud_type_by_id(&desired.vpc_id)
            .await
            .map_err(|e| ResourceError::remote("look up", "vpc", &desired.vpc_id, e))?;

        let violations =
            check_conditional_attributes(FIREWALL_CONSTRAINTS, &desired.to_state()?, &cloud_type);
        if !violations.is_empty() {
            return Err(ResourceError::Validation(violations));
        }

        tracing::debug!(
            "Creating firewall instance {} in vpc {}",
            desired.firewall_name,
            desired.vpc_id
        );
        let instance_id = self
            .client
            .create_firewall_instance(&desired.to_remote())
            .await
            .map_err(|e| ResourceError::remote("create", RESOURCE, &desired.firewall_name, e))?;
        tracing::info!("Created firewall instance {}", instance_id);
        Ok(instance_id)
    }

    /// `Ok(None)` when the controller no longer has the instance
    pub async fn read_instance(
        &self,
        instance_id: &str,
        prior: Option<&FirewallInstanceModel>,
    ) -> Result<Option<FirewallInstanceModel>, ResourceError> {
        match self.client.get_firewall_instance(instance_id).await {
            Ok(remote) => {
                tracing::info!("Found firewall instance {}", instance_id);
                Ok(Some(FirewallInstanceModel::from_remote(&remote, prior)))
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("Firewall instance {} not found, removing from state", instance_id);
                Ok(None)
            }
            Err(e) => Err(ResourceError::remote("read", RESOURCE, instance_id, e)),
        }
    }

    pub async fn delete_instance(&self, vpc_id: &str, instance_id: &str) -> Result<(), ResourceError> {
        let instance = FirewallInstance {
            vpc_id: vpc_id.to_string(),
            instance_id: instance_id.to_string(),
            ..Default::default()
        };
        tracing::debug!("Deleting firewall instance {} in vpc {}", instance_id, vpc_id);
        self.client
            .delete_firewall_instance(&instance)
            .await
            .map_err(|e| ResourceError::remote("delete", RESOURCE, instance_id, e))?;
        tracing::info!("Deleted firewall instance {}", instance_id);
        Ok(())
    }

    /// Once the controller has assigned an instance ID the state keeps it,
    /// even when the read-back fails; the failure comes back as diagnostics.
    async fn create_from_state(
        &self,
        desired: &DynamicValue,
    ) -> Result<(DynamicValue, Vec<Diagnostic>), ResourceError> {
        let mut model = FirewallInstanceModel::from_state(desired)?;
        let instance_id = self.create_instance(&model).await?;
        model.instance_id = Some(instance_id.clone());

        let read_back = match self.read_instance(&instance_id, Some(&model)).await {
            Ok(Some(created)) => return Ok((created.to_state()?, vec![])),
            Ok(None) => ResourceError::remote("read", RESOURCE, &instance_id, ApiError::NotFound),
            Err(e) => e,
        };
        tracing::warn!(
            "Firewall instance {} created but could not be read back: {}",
            instance_id,
            read_back
        );
        Ok((
            model.to_state()?,
            read_back.into_diagnostics("Failed to read firewall instance after create"),
        ))
    }

    /// An empty instance_id means the state came from an import and only `id`
    /// is known
    async fn read_state(&self, state: &DynamicValue) -> Result<Option<DynamicValue>, ResourceError> {
        let (instance_id, prior) = if state.is_set(&AttributePath::new("instance_id")) {
            let prior = FirewallInstanceModel::from_state(state)?;
            let instance_id = prior.instance_id.clone().unwrap_or_default();
            (instance_id, Some(prior))
        } else {
            let id = state.get_string(&AttributePath::new("id"))?;
            tracing::debug!(
                "Looks like an import, no instance_id received. Import Id is {}",
                id
            );
            (id, None)
        };

        match self.read_instance(&instance_id, prior.as_ref()).await? {
            Some(model) => Ok(Some(model.to_state()?)),
            None => Ok(None),
        }
    }

    async fn delete_state(&self, state: &DynamicValue) -> Result<(), ResourceError> {
        let vpc_id = state.get_string(&AttributePath::new("vpc_id"))?;
        let instance_id = state.get_string(&AttributePath::new("instance_id"))?;
        self.delete_instance(&vpc_id, &instance_id).await
    }
}

fn computed_attribute(name: &str, description: &str) -> tfplug::schema::Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .computed()
        .plan_modifier(UseStateForUnknown::create())
        .build()
}

fn required_attribute(name: &str, description: &str) -> tfplug::schema::Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .required()
        .force_new()
        .build()
}

fn optional_attribute(name: &str, description: &str) -> AttributeBuilder {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .optional()
}

pub fn schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Launches a firewall instance behind a FireNet gateway")
        .attribute(computed_attribute("id", "Same as instance_id"))
        .attribute(required_attribute("vpc_id", "ID of the security VPC"))
        .attribute(required_attribute("firenet_gw_name", "Name of the primary FireNet gateway"))
        .attribute(required_attribute("firewall_name", "Name of the firewall instance"))
        .attribute(required_attribute("firewall_image", "Firewall image name"))
        .attribute(required_attribute("firewall_size", "Instance size of the firewall"))
        .attribute(required_attribute("egress_subnet", "Egress interface subnet"))
        .attribute(required_attribute("management_subnet", "Management interface subnet"))
        .attribute(
            optional_attribute("firewall_image_version", "Firewall image version; the controller picks one when unset")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .force_new()
                .build(),
        )
        .attribute(optional_attribute("key_name", "Key pair name").force_new().build())
        .attribute(optional_attribute("iam_role", "IAM role for bootstrap").force_new().build())
        .attribute(
            optional_attribute("bootstrap_bucket_name", "Bootstrap storage bucket name")
                .force_new()
                .build(),
        )
        .attribute(
            optional_attribute("username", "Administrator username; 'admin' is reserved")
                .validator(StringNoneOfValidator::create(&["admin"]))
                .force_new()
                .build(),
        )
        .attribute(
            optional_attribute("password", "Administrator password")
                .sensitive()
                .force_new()
                .build(),
        )
        .attribute(
            optional_attribute("zone", "Availability zone, only valid for AZURE")
                .validator(StringPatternValidator::create(zone_pattern().clone(), "az-<n>"))
                .force_new()
                .build(),
        )
        .attribute(computed_attribute("instance_id", "ID of the firewall instance"))
        .attribute(computed_attribute("lan_interface", "ID of the LAN interface"))
        .attribute(computed_attribute("management_interface", "ID of the management interface"))
        .attribute(computed_attribute("egress_interface", "ID of the egress interface"))
        .attribute(computed_attribute("public_ip", "Management public IP address"))
        .build()
}

#[async_trait]
impl Resource for FirewallInstanceResource {
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
            Ok(desired) => self
                .create_from_state(&desired)
                .await
                .map_err(|e| e.into_diagnostics("Failed to create firewall instance")),
            Err(diagnostics) => Err(diagnostics),
        };

        match result {
            Ok((new_state, diagnostics)) => CreateResourceResponse {
                new_state,
                diagnostics,
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
                diagnostics: e.into_diagnostics("Failed to read firewall instance"),
            },
        }
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let diagnostics = match self.delete_state(&request.prior_state).await {
            Ok(()) => vec![],
            Err(e) => e.into_diagnostics("Failed to delete firewall instance"),
        };
        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithImportState for FirewallInstanceResource {
    async fn import_state(&self, request: ImportResourceStateRequest) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(AttributePath::new("id"), &request, &mut response);
        response
    }
}
