use aviatrix::api::fake::{InMemoryConnector, InMemoryController};
use aviatrix::api::CloudType;
use aviatrix::AviatrixProvider;
use serial_test::serial;
use std::sync::Arc;
use tfplug::plan::plan_resource_change;
use tfplug::resource::{CreateResourceRequest, DeleteResourceRequest, ReadResourceRequest};
use tfplug::{AttributePath, ConfigureProviderRequest, DynamicValue, Provider};

async fn configured_provider() -> (Arc<InMemoryController>, AviatrixProvider) {
    // TF_LOG=debug shows the provider's logs; only the first test to get here installs it
    let _ = tfplug::logging::init_logging_from_env();

    let controller = Arc::new(InMemoryController::new());
    controller.add_vpc("vnet-azure", CloudType::Azure).await;
    let mut provider = AviatrixProvider::new(Arc::new(InMemoryConnector::new(controller.clone())));

    let mut config = DynamicValue::object();
    config.set_string(&AttributePath::new("controller_ip"), "10.1.1.1").unwrap();
    config.set_string(&AttributePath::new("username"), "admin").unwrap();
    config.set_string(&AttributePath::new("password"), "controller-pw").unwrap();
    let response = provider
        .configure(ConfigureProviderRequest {
            terraform_version: "1.9.0".to_string(),
            config,
        })
        .await;
    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    (controller, provider)
}

fn attachment_config(connection_name: &str) -> DynamicValue {
    let mut config = DynamicValue::object();
    config.set_string(&AttributePath::new("device_name"), "branch-router").unwrap();
    config.set_string(&AttributePath::new("transit_gateway_name"), "transit-east").unwrap();
    config.set_string(&AttributePath::new("connection_name"), connection_name).unwrap();
    config.set_int(&AttributePath::new("transit_gateway_bgp_asn"), 65000).unwrap();
    config.set_int(&AttributePath::new("device_bgp_asn"), 65001).unwrap();
    config
}

#[tokio::test]
#[serial]
async fn plan_apply_refresh_destroy_through_the_provider() {
    let (controller, provider) = configured_provider().await;
    let resource = provider
        .create_resource("aviatrix_device_transit_gateway_attachment")
        .await
        .unwrap();
    let schema = resource.schema();

    let config = attachment_config("conn1");
    let plan = plan_resource_change(&schema, &DynamicValue::null(), &config).unwrap();
    assert!(!plan.requires_replace());

    let created = resource
        .create(CreateResourceRequest {
            type_name: resource.type_name().to_string(),
            planned_state: plan.planned_state,
            config: config.clone(),
        })
        .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);

    // Terraform keeps state as msgpack between runs
    let stored = created.new_state.encode_msgpack().unwrap();
    let prior = DynamicValue::decode_msgpack(&stored).unwrap();
    assert_eq!(prior, created.new_state);

    let refreshed = resource
        .read(ReadResourceRequest {
            type_name: resource.type_name().to_string(),
            current_state: prior,
        })
        .await
        .new_state
        .unwrap();

    let replan = plan_resource_change(&schema, &refreshed, &config).unwrap();
    assert!(!replan.requires_replace());

    let renamed = attachment_config("conn2");
    let replan = plan_resource_change(&schema, &refreshed, &renamed).unwrap();
    assert_eq!(replan.requires_replace, vec![AttributePath::new("connection_name")]);

    let deleted = resource
        .delete(DeleteResourceRequest {
            type_name: resource.type_name().to_string(),
            prior_state: refreshed,
        })
        .await;
    assert!(deleted.diagnostics.is_empty());
    assert!(controller.attachment("conn1").await.is_none());
}

#[tokio::test]
#[serial]
async fn resources_share_the_configured_controller() {
    let (controller, provider) = configured_provider().await;
    let attachment = provider
        .create_resource("aviatrix_device_transit_gateway_attachment")
        .await
        .unwrap();
    let firewall = provider
        .create_resource("aviatrix_firewall_instance")
        .await
        .unwrap();

    attachment
        .create(CreateResourceRequest {
            type_name: attachment.type_name().to_string(),
            planned_state: DynamicValue::null(),
            config: attachment_config("conn1"),
        })
        .await;

    let mut firewall_config = DynamicValue::object();
    for (name, value) in [
        ("vpc_id", "vnet-azure"),
        ("firenet_gw_name", "firenet-gw"),
        ("firewall_name", "fw-1"),
        ("firewall_image", "Check Point CloudGuard IaaS Next-Gen Firewall w. Threat Prevention"),
        ("firewall_size", "Standard_D3_v2"),
        ("egress_subnet", "10.20.0.0/24"),
        ("management_subnet", "10.20.1.0/24"),
    ] {
        firewall_config.set_string(&AttributePath::new(name), value).unwrap();
    }
    let created = firewall
        .create(CreateResourceRequest {
            type_name: firewall.type_name().to_string(),
            planned_state: DynamicValue::null(),
            config: firewall_config,
        })
        .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);

    assert!(controller.attachment("conn1").await.is_some());
    let instance_id = created
        .new_state
        .get_string(&AttributePath::new("instance_id"))
        .unwrap();
    assert!(controller.firewall_instance(&instance_id).await.is_some());
}
