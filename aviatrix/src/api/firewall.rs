use serde::{Deserialize, Serialize};
use tfplug::Sensitive;

/// Availability zone the controller reports for Azure instances placed in an
/// availability set instead of a zone
pub const AVAILABILITY_SET: &str = "AvailabilitySet";

/// Cloud vendor string of Azure Resource Manager instances
pub const AZURE_ARM_VENDOR: &str = "Azure ARM";

/// A firewall instance as the controller sees it
///
/// On create, `egress_subnet` and `management_subnet` may carry a zone suffix
/// (`"<subnet>~~<zone>~~"`). On read the controller reports the zone in
/// `availability_zone` without its `az-` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallInstance {
    pub vpc_id: String,
    #[serde(rename = "gw_name")]
    pub firenet_gw_name: String,
    pub firewall_name: String,
    pub firewall_image: String,
    pub firewall_image_version: String,
    pub firewall_size: String,
    pub instance_id: String,
    pub egress_subnet: String,
    pub management_subnet: String,
    pub key_name: String,
    pub iam_role: String,
    pub bootstrap_bucket_name: String,
    pub username: String,
    pub password: Sensitive,
    pub lan_interface: String,
    pub management_interface: String,
    pub egress_interface: String,
    pub management_public_ip: String,
    pub availability_zone: String,
    pub cloud_vendor: String,
}

/// Cloud a VPC lives in, with the controller's bit-flag codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CloudType {
    Aws = 1,
    Gcp = 4,
    Azure = 8,
    Oci = 16,
    AzureGov = 32,
    AwsGov = 256,
    AwsChina = 1024,
    AzureChina = 2048,
    AliCloud = 8192,
}

impl CloudType {
    /// Vendor string the controller reports on instances in this cloud
    pub fn vendor(self) -> &'static str {
        match self {
            CloudType::Aws => "AWS",
            CloudType::Gcp => "Gcloud",
            CloudType::Azure => AZURE_ARM_VENDOR,
            CloudType::Oci => "OCI",
            CloudType::AzureGov => "Azure US Government",
            CloudType::AwsGov => "AWS GovCloud",
            CloudType::AwsChina => "AWS China",
            CloudType::AzureChina => "Azure China",
            CloudType::AliCloud => "Alibaba Cloud",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_types_use_controller_codes() {
        assert_eq!(CloudType::Aws as u32, 1);
        assert_eq!(CloudType::Azure as u32, 8);
        assert_eq!(CloudType::AzureChina as u32, 2048);
    }

    #[test]
    fn only_azure_reports_the_arm_vendor() {
        assert_eq!(CloudType::Azure.vendor(), AZURE_ARM_VENDOR);
        assert_ne!(CloudType::AzureGov.vendor(), AZURE_ARM_VENDOR);
        assert_ne!(CloudType::Aws.vendor(), AZURE_ARM_VENDOR);
    }

    #[test]
    fn deserializes_gateway_name_field() {
        let instance: FirewallInstance = serde_json::from_str(
            r#"{"vpc_id": "vpc-1", "gw_name": "firenet-gw", "instance_id": "i-1"}"#,
        )
        .unwrap();
        assert_eq!(instance.firenet_gw_name, "firenet-gw");
        assert_eq!(instance.instance_id, "i-1");
        assert_eq!(instance.availability_zone, "");
    }
}
