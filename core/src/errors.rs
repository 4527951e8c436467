//! Error types for the HMC provider core.
//!
//! Each category has its own enum so callers can match on what failed
//! (version parsing, the HMC connection, the state store). [`CoreError`]
//! wraps the connection and store errors for the manager-level flows;
//! version errors never leave the dashboard resolver.

use thiserror::Error;

use crate::provider::ValidationError;

/// Top-level error type of the manager-level flows.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The HMC connection collaborator failed.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Reading or writing the persisted manager state failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The manager has no userid or password configured.
    #[error("No credentials defined")]
    MissingCredentials,

    /// Credential verification against the HMC failed.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The submitted settings payload does not satisfy the settings schema.
    #[error("Invalid settings: {}", join_validation_errors(.0))]
    InvalidSettings(Vec<ValidationError>),

    /// A configuration error (unreadable file, malformed values).
    #[error("Config error: {0}")]
    Config(String),
}

/// Errors raised while normalizing an HMC version string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The string is neither `V<major>R<minor> [build]` nor dotted-numeric.
    /// Carries the raw input exactly as received.
    #[error("Invalid IBM HMC version format: {0:?}")]
    InvalidFormat(String),
}

/// Errors reported by an [`HmcConnection`](crate::hmc::HmcConnection)
/// or [`HmcConnector`](crate::hmc::HmcConnector).
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The HMC could not be reached at the configured endpoint.
    #[error("HMC unreachable: {0}")]
    Unreachable(String),

    /// The HMC rejected the logon request.
    #[error("Logon failed: {0}")]
    LogonFailed(String),

    /// A request did not complete within the configured timeout.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Any other failed API request.
    #[error("Request failed: {0}")]
    Request(String),
}

/// Errors related to the persisted manager state.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A low-level I/O error while reading or writing the state file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn join_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_error_display_carries_raw_input() {
        let err = VersionError::InvalidFormat("V11 1110".into());
        assert_eq!(
            err.to_string(),
            "Invalid IBM HMC version format: \"V11 1110\""
        );
    }

    #[test]
    fn connection_error_display() {
        let err = ConnectionError::LogonFailed("401 Unauthorized".into());
        assert_eq!(err.to_string(), "Logon failed: 401 Unauthorized");

        let err = ConnectionError::Timeout(120);
        assert_eq!(err.to_string(), "Request timed out after 120s");
    }

    #[test]
    fn core_error_from_connection_error() {
        let core_err: CoreError = ConnectionError::Unreachable("hmc1".into()).into();
        assert_eq!(core_err.to_string(), "Connection error: HMC unreachable: hmc1");
    }

    #[test]
    fn store_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let store_err: StoreError = io_err.into();
        assert_eq!(store_err.to_string(), "I/O error: read-only");

        let core_err: CoreError = store_err.into();
        assert_eq!(core_err.to_string(), "Store error: I/O error: read-only");
    }

    #[test]
    fn missing_credentials_display() {
        assert_eq!(
            CoreError::MissingCredentials.to_string(),
            "No credentials defined"
        );
    }

    #[test]
    fn invalid_settings_lists_every_field() {
        let err = CoreError::InvalidSettings(vec![
            ValidationError {
                field: "endpoints.default.hostname".into(),
                message: "Hostname is required".into(),
            },
            ValidationError {
                field: "endpoints.default.port".into(),
                message: "API Port must be between 1 and 65535".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid settings: endpoints.default.hostname: Hostname is required; \
             endpoints.default.port: API Port must be between 1 and 65535"
        );
    }
}
