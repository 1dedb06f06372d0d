// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::maintenance::DueStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A maintenance package offered at booking time.
///
/// Packages escalate with the interval level: every interval gets the
/// basic service, every second one the intermediate service and every
/// fourth one the major service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServicePackage {
    /// Oil and filter change with a visual inspection.
    Basic,
    /// Basic service plus brakes, fluids and tire rotation.
    Intermediate,
    /// Full inspection including timing and suspension components.
    Major,
}

impl ServicePackage {
    /// Converts this package to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Major => "major",
        }
    }
}

impl FromStr for ServicePackage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "intermediate" => Ok(Self::Intermediate),
            "major" => Ok(Self::Major),
            _ => Err(format!(
                "Unknown service package '{s}'. Must be 'basic', 'intermediate' or 'major'"
            )),
        }
    }
}

impl std::fmt::Display for ServicePackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The services a customer picked for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceSelection {
    /// The maintenance package, if any.
    pub package: Option<ServicePackage>,
    /// Additional free-form service codes (e.g. `"wiper-blades"`).
    pub extras: Vec<String>,
}

/// Suggests a maintenance package for an evaluated vehicle.
///
/// Returns `None` when the vehicle is not yet due.
#[must_use]
pub const fn suggest_service_package(status: &DueStatus) -> Option<ServicePackage> {
    if !status.is_due {
        return None;
    }

    let level: u32 = status.interval_level;
    if level % 4 == 0 {
        Some(ServicePackage::Major)
    } else if level % 2 == 0 {
        Some(ServicePackage::Intermediate)
    } else {
        Some(ServicePackage::Basic)
    }
}
