//! Provider type abstraction and settings schema.
//!
//! A provider type describes one kind of managed infrastructure endpoint
//! to the management platform: its identifier, the feature set it
//! supports, the catalog entries it contributes and the settings form the
//! UI renders when a user adds one. [`HmcProvider`](crate::hmc::HmcProvider)
//! is the IBM Power HMC implementation.

pub mod schema;
pub mod validation;

pub use schema::*;
pub use validation::{validate_settings, ValidationError};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Optional platform features a provider type may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Catalog,
    Create,
    Metrics,
    NativeConsole,
    Provisioning,
}

/// Features declared by a provider type.
///
/// The UI uses these flags to show or hide catalog, provisioning,
/// metrics and console actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// Service catalog items can be built for this provider.
    pub catalog: bool,
    /// Users can add new managers of this type.
    pub create: bool,
    /// Performance metrics are collected.
    pub metrics: bool,
    /// A native web console can be opened.
    pub native_console: bool,
    /// VMs can be provisioned.
    pub provisioning: bool,
}

impl Capabilities {
    /// Whether `feature` is supported.
    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::Catalog => self.catalog,
            Feature::Create => self.create,
            Feature::Metrics => self.metrics,
            Feature::NativeConsole => self.native_console,
            Feature::Provisioning => self.provisioning,
        }
    }
}

/// Static metadata every provider type exposes.
pub trait ProviderType: Send + Sync {
    /// Machine-readable identifier (e.g., `"ibm_power_hmc"`).
    fn type_id(&self) -> &str;

    /// Human-readable name (e.g., `"IBM Power HMC"`).
    fn description(&self) -> &str;

    /// Settings schema for the "add provider" form.
    fn settings_schema(&self) -> SettingsSchema;

    /// Features of this provider type.
    fn capabilities(&self) -> Capabilities;

    /// Catalog item types contributed by this provider, keyed by type id.
    fn catalog_types(&self) -> BTreeMap<String, String>;

    /// Whether a hostname must be configured before connecting.
    fn hostname_required(&self) -> bool {
        true
    }
}

/// Serializable snapshot of a provider type for UI discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTypeInfo {
    pub type_id: String,
    pub description: String,
    pub schema: SettingsSchema,
    pub capabilities: Capabilities,
    pub catalog_types: BTreeMap<String, String>,
    pub hostname_required: bool,
}

impl ProviderTypeInfo {
    pub fn of(provider: &dyn ProviderType) -> Self {
        Self {
            type_id: provider.type_id().to_string(),
            description: provider.description().to_string(),
            schema: provider.settings_schema(),
            capabilities: provider.capabilities(),
            catalog_types: provider.catalog_types(),
            hostname_required: provider.hostname_required(),
        }
    }
}
