//! IBM Power HMC provider: version normalization, dashboard capability
//! resolution, the client interfaces and the manager that ties them
//! together.

pub mod client;
pub mod dashboard;
pub mod manager;
pub mod provider;
pub mod version;

pub use client::{
    raw_connect, verify_settings, ConnectParams, HmcConnection, HmcConnector, ManagementConsole,
};
pub use dashboard::{
    CapabilityResolver, DashboardCapability, DashboardDecision, LEGACY_DASHBOARD_KEY,
};
pub use manager::HmcManager;
pub use provider::HmcProvider;
pub use version::{compare_versions, parse_hmc_version, VersionTuple, LEGACY_DASHBOARD_THRESHOLD};
