use serde::{Deserialize, Serialize};
use tfplug::Sensitive;

/// The only routing protocol device attachments are created with
pub const ROUTING_PROTOCOL_BGP: &str = "bgp";

/// A device to transit gateway attachment as the controller sees it
///
/// Numbers and booleans travel as text; see [`crate::convert`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceTransitGatewayAttachment {
    pub device_name: String,
    pub transit_gateway_name: String,
    pub connection_name: String,
    pub routing_protocol: String,
    pub transit_gateway_bgp_asn: String,
    pub device_bgp_asn: String,
    pub phase1_authentication: String,
    pub phase1_dh_groups: String,
    pub phase1_encryption: String,
    pub phase2_authentication: String,
    pub phase2_dh_groups: String,
    pub phase2_encryption: String,
    pub enable_global_accelerator: String,
    pub pre_shared_key: Sensitive,
    pub local_tunnel_ip: String,
    pub remote_tunnel_ip: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_controller_payload_with_missing_fields() {
        let attachment: DeviceTransitGatewayAttachment = serde_json::from_str(
            r#"{
                "device_name": "branch-router",
                "transit_gateway_name": "transit-east",
                "connection_name": "conn1",
                "transit_gateway_bgp_asn": "65000",
                "device_bgp_asn": "65001",
                "enable_global_accelerator": "false"
            }"#,
        )
        .unwrap();

        assert_eq!(attachment.connection_name, "conn1");
        assert_eq!(attachment.transit_gateway_bgp_asn, "65000");
        assert_eq!(attachment.local_tunnel_ip, "");
        assert!(attachment.pre_shared_key.is_empty());
    }

    #[test]
    fn debug_output_hides_the_pre_shared_key() {
        let attachment = DeviceTransitGatewayAttachment {
            connection_name: "conn1".to_string(),
            pre_shared_key: Sensitive::new("s3cret-psk"),
            ..Default::default()
        };
        let debug = format!("{:?}", attachment);
        assert!(debug.contains("conn1"));
        assert!(!debug.contains("s3cret-psk"));
    }
}
