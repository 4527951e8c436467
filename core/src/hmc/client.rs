//! Interfaces to the HMC REST client.
//!
//! The core does not speak the HMC API itself. Embedding crates provide an
//! [`HmcConnector`] that opens [`HmcConnection`]s; the core drives logon,
//! logoff and the management console query through them and bounds every
//! call with the configured request timeout.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::provider::HmcProvider;
use crate::config::{AuthConfig, EndpointConfig, HmcSettings, ProviderSettings};
use crate::errors::{ConnectionError, CoreError};
use crate::provider::{validate_settings, ProviderType};

/// Management console attributes that carry the HMC level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagementConsole {
    /// Release tag, e.g. `"V11R1"`.
    pub version: Option<String>,
    /// Service pack / build tag, e.g. `"1110"`.
    pub sp_name: Option<String>,
}

impl ManagementConsole {
    /// Release and build joined by a single space (`"V11R1 1110"`).
    ///
    /// Returns `None` when the result would be blank.
    pub fn raw_version(&self) -> Option<String> {
        let joined = format!(
            "{} {}",
            self.version.as_deref().unwrap_or_default(),
            self.sp_name.as_deref().unwrap_or_default()
        );
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// Everything needed to open a connection to one HMC.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub hostname: String,
    pub port: u16,
    pub userid: String,
    pub password: String,
    pub validate_ssl: bool,
    pub timeout: Duration,
}

impl ConnectParams {
    /// Combine endpoint, credentials and provider settings.
    ///
    /// Fails with [`CoreError::MissingCredentials`] when the userid is
    /// blank or no password is set.
    pub fn new(
        endpoint: &EndpointConfig,
        auth: &AuthConfig,
        settings: &ProviderSettings,
    ) -> Result<Self, CoreError> {
        let password = match (&auth.password, auth.userid.trim().is_empty()) {
            (Some(password), false) => password.clone(),
            _ => return Err(CoreError::MissingCredentials),
        };
        Ok(Self {
            hostname: endpoint.hostname.clone(),
            port: endpoint.port,
            userid: auth.userid.clone(),
            password,
            validate_ssl: endpoint.security_protocol.validate_ssl(),
            timeout: settings.api_request_timeout(),
        })
    }
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("userid", &self.userid)
            .field("password", &"<redacted>")
            .field("validate_ssl", &self.validate_ssl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// An open session with an HMC.
#[async_trait::async_trait]
pub trait HmcConnection: Send {
    /// Authenticate with the HMC.
    async fn logon(&mut self) -> Result<(), ConnectionError>;

    /// End the authenticated session.
    async fn logoff(&mut self) -> Result<(), ConnectionError>;

    /// Fetch the management console attributes.
    async fn management_console(&mut self) -> Result<ManagementConsole, ConnectionError>;
}

/// Opens [`HmcConnection`]s.
#[async_trait::async_trait]
pub trait HmcConnector: Send + Sync {
    /// Create a connection for `params`. No request is required yet.
    async fn open(&self, params: &ConnectParams)
        -> Result<Box<dyn HmcConnection>, ConnectionError>;
}

/// Run `fut`, failing with [`ConnectionError::Timeout`] after `timeout`.
pub async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T, ConnectionError>
where
    F: Future<Output = Result<T, ConnectionError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| ConnectionError::Timeout(timeout.as_secs()))?
}

/// Open a connection; when `validate` is set, log on and off once to
/// prove the credentials.
pub async fn raw_connect(
    connector: &dyn HmcConnector,
    params: &ConnectParams,
    validate: bool,
) -> Result<Box<dyn HmcConnection>, ConnectionError> {
    let mut connection = with_timeout(params.timeout, connector.open(params)).await?;
    if validate {
        debug!(
            "Validating credentials for {}@{}:{}",
            params.userid, params.hostname, params.port
        );
        with_timeout(params.timeout, connection.logon()).await?;
        with_timeout(params.timeout, connection.logoff()).await?;
    }
    Ok(connection)
}

/// Validate a submitted "add provider" form and check its credentials
/// against the live HMC. No manager or store is involved.
pub async fn verify_settings(
    connector: &dyn HmcConnector,
    settings: &serde_json::Value,
    provider_settings: &ProviderSettings,
) -> Result<bool, CoreError> {
    let errors = validate_settings(&HmcProvider.settings_schema(), settings);
    if !errors.is_empty() {
        return Err(CoreError::InvalidSettings(errors));
    }
    let HmcSettings { endpoint, auth } = HmcSettings::from_value(settings)?;
    let params = ConnectParams::new(&endpoint, &auth, provider_settings)?;
    raw_connect(connector, &params, true).await?;
    Ok(true)
}
