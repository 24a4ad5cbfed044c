use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The requested object does not exist on the controller
    #[error("object not found")]
    NotFound,

    #[error("controller rejected {action}: {reason}")]
    Rejected { action: String, reason: String },

    #[error("Authentication failed")]
    AuthError,

    #[error("Controller unreachable: {0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    pub fn rejected(action: &str, reason: impl Into<String>) -> Self {
        ApiError::Rejected {
            action: action.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_found_is_the_absent_sentinel() {
        assert!(ApiError::NotFound.is_not_found());
        assert!(!ApiError::rejected("create_firewall_instance", "quota").is_not_found());
        assert!(!ApiError::AuthError.is_not_found());
    }

    #[test]
    fn rejected_names_the_action() {
        let err = ApiError::rejected("delete_device_attachment", "connection is in use");
        assert_eq!(
            err.to_string(),
            "controller rejected delete_device_attachment: connection is in use"
        );
    }
}
