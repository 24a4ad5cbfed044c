//! Provider data structure passed to resources

use crate::api::ControllerApi;
use std::sync::Arc;

#[derive(Clone)]
pub struct AviatrixProviderData {
    pub client: Arc<dyn ControllerApi>,
    pub controller_ip: String,
}

impl AviatrixProviderData {
    pub fn new(client: Arc<dyn ControllerApi>, controller_ip: String) -> Self {
        Self {
            client,
            controller_ip,
        }
    }
}
