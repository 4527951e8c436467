//! Dashboard capability resolution.
//!
//! HMC levels at or below [`LEGACY_DASHBOARD_THRESHOLD`] only serve the old
//! `dashboard` web UI; newer levels serve `newdashboard`. The resolver turns
//! a fetched version string into that decision and caches it. It never
//! fails: a missing or unparsable version falls back to the legacy UI.
//!
//! [`LEGACY_DASHBOARD_THRESHOLD`]: super::version::LEGACY_DASHBOARD_THRESHOLD

use tracing::{debug, warn};

use super::version::{parse_hmc_version, VersionTuple};
use crate::errors::VersionError;

/// Capability key under which the flag is persisted.
pub const LEGACY_DASHBOARD_KEY: &str = "legacy_dashboard";

/// URL path segment served by HMC levels at or below the threshold.
pub const LEGACY_DASHBOARD_PATH: &str = "dashboard";

/// URL path segment served by newer HMC levels.
pub const DASHBOARD_PATH: &str = "newdashboard";

/// Cached dashboard capability of one HMC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardCapability {
    /// No version has been evaluated yet.
    #[default]
    Unknown,
    /// The flag derived from the last evaluated version.
    Resolved { legacy: bool },
}

impl DashboardCapability {
    /// Whether the legacy dashboard must be used. `Unknown` counts as legacy.
    pub fn is_legacy(self) -> bool {
        match self {
            Self::Unknown => true,
            Self::Resolved { legacy } => legacy,
        }
    }

    /// Rebuild the state from a persisted capability value.
    pub fn from_persisted(value: Option<bool>) -> Self {
        match value {
            Some(legacy) => Self::Resolved { legacy },
            None => Self::Unknown,
        }
    }
}

/// How a resolution reached its decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardDecision {
    /// No version string was available.
    MissingVersion,
    /// The version string could not be parsed.
    Unparsable(VersionError),
    /// The version was compared against the threshold.
    Compared { current: VersionTuple, legacy: bool },
}

impl DashboardDecision {
    /// Evaluate a raw version string against `threshold`.
    pub fn evaluate(raw_version: Option<&str>, threshold: &VersionTuple) -> Self {
        let raw = match raw_version {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Self::MissingVersion,
        };
        match parse_hmc_version(raw) {
            Ok(current) => {
                let legacy = current <= *threshold;
                Self::Compared { current, legacy }
            }
            Err(err) => Self::Unparsable(err),
        }
    }

    /// The resulting flag: only a successful comparison can clear it.
    pub fn legacy(&self) -> bool {
        match self {
            Self::Compared { legacy, .. } => *legacy,
            Self::MissingVersion | Self::Unparsable(_) => true,
        }
    }
}

/// Derives and caches the legacy-dashboard flag for one HMC.
#[derive(Debug, Clone, Default)]
pub struct CapabilityResolver {
    state: DashboardCapability,
}

impl CapabilityResolver {
    /// Create a resolver in the `Unknown` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver seeded with a previously cached state.
    pub fn with_state(state: DashboardCapability) -> Self {
        Self { state }
    }

    /// Resolve `raw_version` against `threshold`, cache and return the flag.
    ///
    /// An unparsable version is logged and resolves to `true`.
    pub fn resolve(&mut self, raw_version: Option<&str>, threshold: &VersionTuple) -> bool {
        let decision = DashboardDecision::evaluate(raw_version, threshold);
        match &decision {
            DashboardDecision::MissingVersion => {
                debug!("No HMC version available, assuming legacy dashboard");
            }
            DashboardDecision::Unparsable(err) => {
                warn!(
                    "Failed to parse HMC version {:?} for dashboard comparison: {}",
                    raw_version.unwrap_or_default(),
                    err
                );
            }
            DashboardDecision::Compared { current, legacy } => {
                debug!(
                    "HMC version {} against threshold {}: legacy dashboard = {}",
                    current, threshold, legacy
                );
            }
        }
        let legacy = decision.legacy();
        self.state = DashboardCapability::Resolved { legacy };
        legacy
    }

    /// Cached flag; `true` until the first resolution.
    pub fn is_legacy_dashboard(&self) -> bool {
        self.state.is_legacy()
    }

    /// The cached state.
    pub fn state(&self) -> DashboardCapability {
        self.state
    }

    /// Path segment of the dashboard web UI for the cached state.
    pub fn dashboard_path(&self) -> &'static str {
        if self.is_legacy_dashboard() {
            LEGACY_DASHBOARD_PATH
        } else {
            DASHBOARD_PATH
        }
    }
}
