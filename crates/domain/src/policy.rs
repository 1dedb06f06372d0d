// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance interval policy.
//!
//! A single policy applies to every vehicle of a deployment. It is passed
//! into the evaluator explicitly so that interval sizes and grace margins
//! can be tuned per deployment.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default distance between two services.
pub const DEFAULT_KM_PER_INTERVAL: u32 = 1000;
/// Default elapsed time between two services.
pub const DEFAULT_MONTHS_PER_INTERVAL: u32 = 3;
/// Default distance tolerated past a due point before a vehicle is overdue.
pub const DEFAULT_KM_GRACE: u32 = 200;
/// Default time tolerated past a due point before a vehicle is overdue.
pub const DEFAULT_MONTHS_GRACE: u32 = 1;

/// Interval sizes and grace margins used by the due evaluator.
///
/// The distance and time grace margins are configured independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenancePolicy {
    km_per_interval: u32,
    months_per_interval: u32,
    km_grace: u32,
    months_grace: u32,
}

impl Default for MaintenancePolicy {
    fn default() -> Self {
        Self {
            km_per_interval: DEFAULT_KM_PER_INTERVAL,
            months_per_interval: DEFAULT_MONTHS_PER_INTERVAL,
            km_grace: DEFAULT_KM_GRACE,
            months_grace: DEFAULT_MONTHS_GRACE,
        }
    }
}

impl MaintenancePolicy {
    /// Creates a validated maintenance policy.
    ///
    /// # Arguments
    ///
    /// * `km_per_interval` - Distance between two services
    /// * `months_per_interval` - Whole calendar months between two services
    /// * `km_grace` - Distance past a due point before a vehicle is overdue
    /// * `months_grace` - Months past a due point before a vehicle is overdue
    ///
    /// # Errors
    ///
    /// Returns an error if either interval size is zero.
    pub fn new(
        km_per_interval: u32,
        months_per_interval: u32,
        km_grace: u32,
        months_grace: u32,
    ) -> Result<Self, DomainError> {
        if km_per_interval == 0 {
            return Err(DomainError::InvalidPolicy {
                reason: String::from("km_per_interval must be greater than 0"),
            });
        }
        if months_per_interval == 0 {
            return Err(DomainError::InvalidPolicy {
                reason: String::from("months_per_interval must be greater than 0"),
            });
        }

        Ok(Self {
            km_per_interval,
            months_per_interval,
            km_grace,
            months_grace,
        })
    }

    #[must_use]
    pub const fn km_per_interval(&self) -> u32 {
        self.km_per_interval
    }

    #[must_use]
    pub const fn months_per_interval(&self) -> u32 {
        self.months_per_interval
    }

    #[must_use]
    pub const fn km_grace(&self) -> u32 {
        self.km_grace
    }

    #[must_use]
    pub const fn months_grace(&self) -> u32 {
        self.months_grace
    }
}
