//! File-backed [`CapabilityStore`] writing the manager state as JSON.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{CapabilityStore, ManagerState};
use crate::errors::StoreError;

/// Manager state persisted to a JSON file.
///
/// Every write rewrites the whole file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    state: ManagerState,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing or corrupt file yields an empty state.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = load_state(&path);
        Self { path, state }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &ManagerState {
        &self.state
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(&self.path, json)?;
        debug!("Saved manager state to {}", self.path.display());
        Ok(())
    }

    /// Apply `change` and persist; the in-memory state is rolled back if
    /// the write fails.
    fn update(&mut self, change: impl FnOnce(&mut ManagerState)) -> Result<(), StoreError> {
        let previous = self.state.clone();
        change(&mut self.state);
        if let Err(e) = self.save() {
            warn!(
                "Failed to write manager state to {}: {}",
                self.path.display(),
                e
            );
            self.state = previous;
            return Err(e);
        }
        Ok(())
    }
}

fn load_state(path: &Path) -> ManagerState {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<ManagerState>(&contents) {
            Ok(state) => {
                debug!("Loaded manager state from {}", path.display());
                state
            }
            Err(e) => {
                warn!(
                    "Failed to parse manager state from {}: {}",
                    path.display(),
                    e
                );
                ManagerState::default()
            }
        },
        Err(_) => {
            debug!("No manager state file at {}", path.display());
            ManagerState::default()
        }
    }
}

impl CapabilityStore for JsonFileStore {
    fn api_version(&self) -> Option<String> {
        self.state.api_version.clone()
    }

    fn store_api_version(&mut self, version: &str) -> Result<(), StoreError> {
        self.update(|state| state.api_version = Some(version.to_string()))
    }

    fn capability(&self, key: &str) -> Option<bool> {
        self.state.capability(key)
    }

    fn persist_capability(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.update(|state| state.set_capability(key, value))
    }
}
