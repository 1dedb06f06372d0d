// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod center;
mod error;
mod maintenance;
mod package;
mod policy;
mod slot;
mod types;

#[cfg(test)]
mod tests;

pub use center::{ServiceCenter, local_date_in};
pub use maintenance::{
    DueStatus, MaintenanceDueEvaluator, NextDue, add_months, evaluate_due, month_boundary_date,
    whole_months_between,
};
pub use package::{ServicePackage, ServiceSelection, suggest_service_package};
pub use slot::{
    DEFAULT_SLOT_CAPACITY, DEFAULT_STEP_MINUTES, DaySlots, FEW_REMAINING_THRESHOLD,
    MAX_SLOT_CAPACITY, SlotCatalog, SlotStatus, TimeSlot, partition_slots,
};

// Re-export public types
pub use error::DomainError;
pub use policy::{
    DEFAULT_KM_GRACE, DEFAULT_KM_PER_INTERVAL, DEFAULT_MONTHS_GRACE, DEFAULT_MONTHS_PER_INTERVAL,
    MaintenancePolicy,
};
pub use types::{
    CenterId, VehicleId, VehicleServiceState, format_slot_time, parse_date, parse_slot_time,
};
