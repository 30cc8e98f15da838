//! Read-only view of the user settings the repository's collaborators need.
//!
//! The settings store itself (key/value flags, owned by the host app) is not
//! part of this crate; callers hand the repository layer an implementation of
//! [`SettingsProvider`] when they need display formatting or default
//! maintenance intervals.

use serde::{Deserialize, Serialize};

use crate::Currency;

/// Default service intervals, in kilometers, used to suggest upcoming
/// maintenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceIntervals {
    pub tire_km: i64,
    pub oil_km: i64,
    pub brake_km: i64,
}

impl Default for MaintenanceIntervals {
    fn default() -> Self {
        Self {
            tire_km: 40_000,
            oil_km: 15_000,
            brake_km: 20_000,
        }
    }
}

/// Read-only settings consumed by collaborators of the vehicle repository.
pub trait SettingsProvider {
    fn is_using_metric(&self) -> bool;
    fn selected_currency(&self) -> Currency;
    fn maintenance_intervals(&self) -> MaintenanceIntervals;
}

/// Plain-value settings, handy for tests and for hosts that load settings
/// once from a file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticSettings {
    #[serde(default = "default_metric")]
    pub metric: bool,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub intervals: MaintenanceIntervals,
}

fn default_metric() -> bool {
    true
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self {
            metric: true,
            currency: Currency::default(),
            intervals: MaintenanceIntervals::default(),
        }
    }
}

impl SettingsProvider for StaticSettings {
    fn is_using_metric(&self) -> bool {
        self.metric
    }

    fn selected_currency(&self) -> Currency {
        self.currency
    }

    fn maintenance_intervals(&self) -> MaintenanceIntervals {
        self.intervals
    }
}
