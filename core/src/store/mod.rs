//! Persisted per-manager state: the last fetched HMC version and the
//! capability mapping derived from it.
//!
//! [`CapabilityStore`] is the persistence seam used by
//! [`HmcManager`](crate::hmc::HmcManager). [`MemoryStore`] keeps the state
//! in process; [`JsonFileStore`] writes it to disk.

pub mod json;

pub use json::JsonFileStore;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Persistence collaborator for a single HMC manager.
///
/// Writes are idempotent; callers skip them when the value is unchanged.
pub trait CapabilityStore: Send {
    /// The raw version string last fetched from the HMC.
    fn api_version(&self) -> Option<String>;

    /// Replace the stored raw version string.
    fn store_api_version(&mut self, version: &str) -> Result<(), StoreError>;

    /// Read a boolean capability. Missing keys and non-boolean values
    /// read as `None`.
    fn capability(&self, key: &str) -> Option<bool>;

    /// Write a boolean capability.
    fn persist_capability(&mut self, key: &str, value: bool) -> Result<(), StoreError>;
}

/// Serialized shape of a manager's persisted state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ManagerState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default)]
    pub capabilities: BTreeMap<String, serde_json::Value>,
}

impl ManagerState {
    pub fn capability(&self, key: &str) -> Option<bool> {
        self.capabilities.get(key).and_then(|v| v.as_bool())
    }

    pub fn set_capability(&mut self, key: &str, value: bool) {
        self.capabilities
            .insert(key.to_string(), serde_json::Value::Bool(value));
    }
}

/// In-process [`CapabilityStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: ManagerState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ManagerState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ManagerState {
        &self.state
    }
}

impl CapabilityStore for MemoryStore {
    fn api_version(&self) -> Option<String> {
        self.state.api_version.clone()
    }

    fn store_api_version(&mut self, version: &str) -> Result<(), StoreError> {
        self.state.api_version = Some(version.to_string());
        Ok(())
    }

    fn capability(&self, key: &str) -> Option<bool> {
        self.state.capability(key)
    }

    fn persist_capability(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.state.set_capability(key, value);
        Ok(())
    }
}
