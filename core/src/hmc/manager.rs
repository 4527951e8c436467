//! A managed HMC: connection flow, version fetch and the cached dashboard
//! capability.
//!
//! # Lifecycle
//!
//! 1. Build with [`HmcManager::new()`]; the dashboard state is hydrated
//!    from the store (`Unknown` when nothing was persisted yet).
//! 2. [`verify_credentials()`](HmcManager::verify_credentials) logs on,
//!    fetches the HMC level and re-derives the dashboard capability.
//! 3. [`console_url()`](HmcManager::console_url) reads the cached
//!    capability to pick the web UI path.

use std::net::Ipv6Addr;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::client::{raw_connect, with_timeout, ConnectParams, HmcConnection, HmcConnector};
use super::dashboard::{CapabilityResolver, DashboardCapability, LEGACY_DASHBOARD_KEY};
use super::version::LEGACY_DASHBOARD_THRESHOLD;
use crate::config::{AuthConfig, EndpointConfig, ProviderSettings};
use crate::errors::CoreError;
use crate::store::CapabilityStore;

/// One HMC registered with the platform.
pub struct HmcManager<S> {
    endpoint: EndpointConfig,
    auth: AuthConfig,
    settings: ProviderSettings,
    connector: Arc<dyn HmcConnector>,
    store: S,
    dashboard: CapabilityResolver,
}

impl<S: CapabilityStore> HmcManager<S> {
    pub fn new(
        endpoint: EndpointConfig,
        auth: AuthConfig,
        settings: ProviderSettings,
        connector: Arc<dyn HmcConnector>,
        store: S,
    ) -> Self {
        let persisted = store.capability(LEGACY_DASHBOARD_KEY);
        Self {
            endpoint,
            auth,
            settings,
            connector,
            store,
            dashboard: CapabilityResolver::with_state(DashboardCapability::from_persisted(
                persisted,
            )),
        }
    }

    /// Log on and off, then refresh the stored HMC version and the
    /// dashboard capability.
    ///
    /// Every failure is reported as [`CoreError::InvalidCredentials`]. A
    /// failed version fetch is not a failure: the capability falls back
    /// to the legacy dashboard.
    pub async fn verify_credentials(&mut self) -> Result<bool, CoreError> {
        let result = async {
            let mut connection = self.connect(true).await?;
            self.fetch_and_store_hmc_version(connection.as_mut()).await;
            self.update_dashboard_capability()
        }
        .await;

        match result {
            Ok(legacy) => {
                info!(
                    "Verified credentials for HMC {} (legacy dashboard: {})",
                    self.endpoint.hostname, legacy
                );
                Ok(true)
            }
            Err(e) => Err(CoreError::InvalidCredentials(e.to_string())),
        }
    }

    /// Open a connection with the configured credentials.
    pub async fn connect(&self, validate: bool) -> Result<Box<dyn HmcConnection>, CoreError> {
        let params = ConnectParams::new(&self.endpoint, &self.auth, &self.settings)?;
        Ok(raw_connect(self.connector.as_ref(), &params, validate).await?)
    }

    /// Log off and drop the connection.
    pub async fn disconnect(&self, mut connection: Box<dyn HmcConnection>) -> Result<(), CoreError> {
        with_timeout(self.settings.api_request_timeout(), connection.logoff()).await?;
        Ok(())
    }

    /// Read the HMC level from the management console and store it as the
    /// API version when it changed. Failures are logged, never returned.
    pub async fn fetch_and_store_hmc_version(&mut self, connection: &mut dyn HmcConnection) {
        let console = match with_timeout(
            self.settings.api_request_timeout(),
            connection.management_console(),
        )
        .await
        {
            Ok(console) => console,
            Err(e) => {
                warn!("Failed to fetch HMC version: {}", e);
                return;
            }
        };

        let Some(version) = console.raw_version() else {
            debug!("HMC {} reported no version", self.endpoint.hostname);
            return;
        };
        if self.store.api_version().as_deref() == Some(version.as_str()) {
            return;
        }
        match self.store.store_api_version(&version) {
            Ok(()) => debug!("Stored HMC version {:?}", version),
            Err(e) => warn!("Failed to store HMC version {:?}: {}", version, e),
        }
    }

    /// Re-derive the legacy dashboard flag from the stored API version and
    /// persist it if it changed.
    pub fn update_dashboard_capability(&mut self) -> Result<bool, CoreError> {
        let api_version = self.store.api_version();
        let legacy = self
            .dashboard
            .resolve(api_version.as_deref(), &LEGACY_DASHBOARD_THRESHOLD);

        if self.store.capability(LEGACY_DASHBOARD_KEY) != Some(legacy) {
            self.store.persist_capability(LEGACY_DASHBOARD_KEY, legacy)?;
        }
        Ok(legacy)
    }

    /// Cached flag; `true` until a version has been evaluated.
    pub fn use_legacy_dashboard(&self) -> bool {
        self.dashboard.is_legacy_dashboard()
    }

    /// URL of the HMC web console for the cached dashboard capability.
    pub fn console_url(&self) -> String {
        let host = &self.endpoint.hostname;
        let host = if host.parse::<Ipv6Addr>().is_ok() {
            format!("[{host}]")
        } else {
            host.clone()
        };
        format!("https://{}/{}/", host, self.dashboard.dashboard_path())
    }

    pub fn api_version(&self) -> Option<String> {
        self.store.api_version()
    }

    pub fn dashboard_capability(&self) -> DashboardCapability {
        self.dashboard.state()
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
