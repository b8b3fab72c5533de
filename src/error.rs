//! Error types for the sidebar core
//!
//! This module defines the error taxonomy used by the API client, the
//! stores and the controller, using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for sidebar operations
///
/// Controller actions never surface these to the UI directly: network and
/// not-found failures are turned into notifications. The CLI and the API
/// client propagate them with `?`.
#[derive(Error, Debug)]
pub enum SidebarError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A conversation referenced by id is absent from the local cache
    #[error("Conversation not found: {0}")]
    NotFound(String),

    /// The backend answered with a non-2xx status
    #[error("Request failed: {operation} returned status {status}")]
    Network {
        /// Short name of the remote operation (e.g. "star")
        operation: String,
        /// HTTP status code returned by the backend
        status: u16,
    },

    /// Missing or rejected session
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Input rejected before any state change (e.g. blank title)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors (connect, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for sidebar operations
///
/// Uses `anyhow::Error` so callers can attach context while the typed
/// [`SidebarError`] stays recoverable via `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = SidebarError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_not_found_error_display() {
        let error = SidebarError::NotFound("abc".to_string());
        assert_eq!(error.to_string(), "Conversation not found: abc");
    }

    #[test]
    fn test_network_error_display() {
        let error = SidebarError::Network {
            operation: "star".to_string(),
            status: 500,
        };
        let s = error.to_string();
        assert!(s.contains("star"));
        assert!(s.contains("500"));
    }

    #[test]
    fn test_authentication_error_display() {
        let error = SidebarError::Authentication("session expired".to_string());
        assert_eq!(error.to_string(), "Authentication error: session expired");
    }

    #[test]
    fn test_invalid_input_error_display() {
        let error = SidebarError::InvalidInput("title is blank".to_string());
        assert_eq!(error.to_string(), "Invalid input: title is blank");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: SidebarError = io_error.into();
        assert!(matches!(error, SidebarError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: SidebarError = json_error.into();
        assert!(matches!(error, SidebarError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: SidebarError = yaml_error.into();
        assert!(matches!(error, SidebarError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SidebarError>();
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = SidebarError::NotFound("x".to_string()).into();
        assert!(matches!(
            err.downcast_ref::<SidebarError>(),
            Some(SidebarError::NotFound(_))
        ));
    }
}
