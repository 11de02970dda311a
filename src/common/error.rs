use thiserror::Error;

/// Failure taxonomy for everything that talks to the appointments API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Caught by form validation; never reaches the network.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Login or registration rejected, or the token was refused.
    #[error("{0}")]
    Authentication(String),
    /// Transport-level failure. Reads retry these.
    #[error("network error: {0}")]
    Network(String),
    /// Business-rule rejection, carried verbatim from the server.
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }

    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Authentication(message) | ApiError::Rejected { message, .. } => {
                Some(message.as_str()).filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }

    /// Text shown to the user: the server message when present, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Validation(message) => message.clone(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = ApiError::Rejected {
            status: Some(409),
            message: "Doctor already booked at this time".into(),
        };
        assert_eq!(
            err.user_message("Failed to create appointment"),
            "Doctor already booked at this time"
        );
    }

    #[test]
    fn fallback_used_without_server_message() {
        let err = ApiError::Network("connection reset".into());
        assert_eq!(err.user_message("Failed to fetch appointments"), "Failed to fetch appointments");

        let blank = ApiError::Rejected { status: None, message: "  ".into() };
        assert_eq!(blank.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn only_network_errors_are_transient() {
        assert!(ApiError::Network("timeout".into()).is_transient());
        assert!(!ApiError::Authentication("bad credentials".into()).is_transient());
        assert!(!ApiError::Decode("bad json".into()).is_transient());
    }
}
