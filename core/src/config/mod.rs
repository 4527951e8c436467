//! Typed configuration for HMC endpoints, credentials and provider-wide
//! settings.
//!
//! The settings form submits a nested payload:
//!
//! ```json
//! {
//!   "endpoints": { "default": { "security_protocol": "ssl-with-validation",
//!                               "hostname": "hmc1.example.com", "port": 443 } },
//!   "authentications": { "default": { "userid": "hscroot", "password": "..." } }
//! }
//! ```
//!
//! [`HmcSettings::from_value`] lifts it into [`EndpointConfig`] and
//! [`AuthConfig`].

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::errors::CoreError;

/// Default HMC REST API port.
pub const DEFAULT_API_PORT: u16 = 443;

/// Default HMC administrator account.
pub const DEFAULT_USERID: &str = "hscroot";

/// How TLS is negotiated with the HMC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityProtocol {
    /// TLS with certificate validation.
    #[default]
    SslWithValidation,
    /// TLS without certificate validation (self-signed HMC certificates).
    SslNoValidation,
}

impl SecurityProtocol {
    /// Whether the server certificate must be validated.
    pub fn validate_ssl(self) -> bool {
        self == Self::SslWithValidation
    }

    /// The value stored in settings payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SslWithValidation => "ssl-with-validation",
            Self::SslNoValidation => "ssl-no-validation",
        }
    }
}

/// Network endpoint of an HMC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default)]
    pub security_protocol: SecurityProtocol,
    pub hostname: String,
    #[serde(default = "default_api_port", deserialize_with = "deserialize_port")]
    pub port: u16,
}

impl EndpointConfig {
    /// Endpoint with the default protocol and port.
    pub fn new(hostname: &str) -> Self {
        Self {
            security_protocol: SecurityProtocol::default(),
            hostname: hostname.to_string(),
            port: default_api_port(),
        }
    }
}

/// Credentials used to log on to the HMC.
///
/// The password is never serialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_userid")]
    pub userid: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl AuthConfig {
    pub fn new(userid: &str, password: &str) -> Self {
        Self {
            userid: userid.to_string(),
            password: Some(password.to_string()),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            userid: default_userid(),
            password: None,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("userid", &self.userid)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Endpoint and credentials lifted from a settings form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmcSettings {
    pub endpoint: EndpointConfig,
    pub auth: AuthConfig,
}

impl HmcSettings {
    /// Parse the nested `endpoints.default` / `authentications.default`
    /// payload. A missing `authentications.default` object yields
    /// [`AuthConfig::default`].
    pub fn from_value(settings: &serde_json::Value) -> Result<Self, CoreError> {
        let endpoint = settings
            .pointer("/endpoints/default")
            .ok_or_else(|| CoreError::Config("Missing endpoints.default".to_string()))?;
        let endpoint: EndpointConfig = serde_json::from_value(endpoint.clone())
            .map_err(|e| CoreError::Config(format!("Invalid endpoint: {e}")))?;

        let auth = match settings.pointer("/authentications/default") {
            Some(auth) => serde_json::from_value(auth.clone())
                .map_err(|e| CoreError::Config(format!("Invalid authentication: {e}")))?,
            None => AuthConfig::default(),
        };

        Ok(Self { endpoint, auth })
    }
}

/// Provider-wide settings shared by every HMC manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderSettings {
    /// Upper bound for a single HMC API request, in seconds.
    pub api_request_timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_request_timeout_secs: default_api_request_timeout_secs(),
        }
    }
}

impl ProviderSettings {
    pub fn api_request_timeout(&self) -> Duration {
        Duration::from_secs(self.api_request_timeout_secs)
    }

    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No provider settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CoreError::Config(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        serde_json::from_str(&contents)
            .map_err(|e| CoreError::Config(format!("Failed to parse {}: {e}", path.display())))
    }
}

/// Read a port given as a JSON integer or a string of ASCII digits
/// (form inputs submit strings). Only `1..=65535` is accepted.
pub fn parse_port(value: &serde_json::Value) -> Option<u16> {
    let port = match value {
        serde_json::Value::Number(n) => u16::try_from(n.as_u64()?).ok()?,
        serde_json::Value::String(s) => {
            let digits = s.trim();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok()?
        }
        _ => return None,
    };
    (port != 0).then_some(port)
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    parse_port(&value).ok_or_else(|| D::Error::custom(format!("invalid port: {value}")))
}

// --- Default value functions ---

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

fn default_userid() -> String {
    DEFAULT_USERID.to_string()
}

fn default_api_request_timeout_secs() -> u64 {
    120
}
