//! Shared test utilities for the HMC provider integration tests.
//!
//! Provides a scripted in-memory HMC (connector + connection), a store
//! that counts writes, and settings payload builders.

// Each integration test is compiled as its own crate, so not every test file
// uses every function from this shared module. Suppress dead_code warnings.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hmc_provider_core::errors::{ConnectionError, StoreError};
use hmc_provider_core::hmc::{ConnectParams, HmcConnection, HmcConnector, ManagementConsole};
use hmc_provider_core::store::{CapabilityStore, MemoryStore};

/// Behaviour of the scripted HMC.
#[derive(Debug, Clone, Default)]
pub struct FakeHmc {
    /// Password accepted by logon.
    pub password: String,
    /// Release tag reported by the management console.
    pub version: Option<String>,
    /// Build tag reported by the management console.
    pub sp_name: Option<String>,
    /// Fail the management console query.
    pub console_fails: bool,
    /// Fail to open the connection at all.
    pub unreachable: bool,
}

impl FakeHmc {
    /// An HMC accepting `abc123` and reporting `version sp_name`.
    pub fn reporting(version: &str, sp_name: &str) -> Self {
        Self {
            password: "abc123".to_string(),
            version: Some(version.to_string()),
            sp_name: Some(sp_name.to_string()),
            ..Self::default()
        }
    }
}

/// Connector handing out connections to a [`FakeHmc`], recording calls.
#[derive(Clone, Default)]
pub struct FakeConnector {
    pub hmc: FakeHmc,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub last_params: Arc<Mutex<Option<ConnectParams>>>,
}

impl FakeConnector {
    pub fn new(hmc: FakeHmc) -> Self {
        Self {
            hmc,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

struct FakeConnection {
    hmc: FakeHmc,
    password: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeConnection {
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait::async_trait]
impl HmcConnection for FakeConnection {
    async fn logon(&mut self) -> Result<(), ConnectionError> {
        self.record("logon");
        if self.password != self.hmc.password {
            return Err(ConnectionError::LogonFailed("HSCL0004 invalid password".into()));
        }
        Ok(())
    }

    async fn logoff(&mut self) -> Result<(), ConnectionError> {
        self.record("logoff");
        Ok(())
    }

    async fn management_console(&mut self) -> Result<ManagementConsole, ConnectionError> {
        self.record("management_console");
        if self.hmc.console_fails {
            return Err(ConnectionError::Request("ManagementConsole: 500".into()));
        }
        Ok(ManagementConsole {
            version: self.hmc.version.clone(),
            sp_name: self.hmc.sp_name.clone(),
        })
    }
}

#[async_trait::async_trait]
impl HmcConnector for FakeConnector {
    async fn open(
        &self,
        params: &ConnectParams,
    ) -> Result<Box<dyn HmcConnection>, ConnectionError> {
        self.calls.lock().unwrap().push("open".to_string());
        *self.last_params.lock().unwrap() = Some(params.clone());
        if self.hmc.unreachable {
            return Err(ConnectionError::Unreachable(params.hostname.clone()));
        }
        Ok(Box::new(FakeConnection {
            hmc: self.hmc.clone(),
            password: params.password.clone(),
            calls: self.calls.clone(),
        }))
    }
}

/// Shared [`MemoryStore`] counting writes. Clones see the same state.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: Arc<Mutex<MemoryStore>>,
    pub capability_writes: Arc<AtomicUsize>,
    pub version_writes: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn capability_writes(&self) -> usize {
        self.capability_writes.load(Ordering::SeqCst)
    }

    pub fn version_writes(&self) -> usize {
        self.version_writes.load(Ordering::SeqCst)
    }
}

impl CapabilityStore for CountingStore {
    fn api_version(&self) -> Option<String> {
        self.inner.lock().unwrap().api_version()
    }

    fn store_api_version(&mut self, version: &str) -> Result<(), StoreError> {
        self.version_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.lock().unwrap().store_api_version(version)
    }

    fn capability(&self, key: &str) -> Option<bool> {
        self.inner.lock().unwrap().capability(key)
    }

    fn persist_capability(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.capability_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.lock().unwrap().persist_capability(key, value)
    }
}

/// A valid "add provider" form payload for `hostname`.
pub fn form_payload(hostname: &str, password: &str) -> serde_json::Value {
    serde_json::json!({
        "endpoints": {"default": {
            "security_protocol": "ssl-no-validation",
            "hostname": hostname,
            "port": "443"
        }},
        "authentications": {"default": {
            "userid": "hscroot",
            "password": password
        }}
    })
}
