// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use servicebay_domain::{CenterId, DomainError, VehicleId, format_slot_time};
use time::{Date, Time};

/// Errors that can occur during slot allocation and booking.
///
/// Capacity exhaustion is not an error; see `ReserveOutcome::Rejected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The service center is unknown.
    CenterNotFound(CenterId),
    /// The vehicle is unknown to the vehicle data source.
    VehicleNotFound(VehicleId),
    /// The center does not offer a slot at the requested time.
    SlotNotFound {
        /// The service center.
        center_id: CenterId,
        /// The requested date.
        date: Date,
        /// The requested time.
        time: Time,
    },
    /// A collaborator (store or sink) failed.
    Store(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::CenterNotFound(center_id) => {
                write!(f, "Service center '{center_id}' not found")
            }
            Self::VehicleNotFound(vehicle_id) => write!(f, "Vehicle '{vehicle_id}' not found"),
            Self::SlotNotFound {
                center_id,
                date,
                time,
            } => {
                write!(
                    f,
                    "Service center '{center_id}' offers no slot on {date} at {}",
                    format_slot_time(*time)
                )
            }
            Self::Store(msg) => write!(f, "Store error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

/// Flattens a collaborator error into a `CoreError`.
pub(crate) fn store_error<E: std::fmt::Display>(err: E) -> CoreError {
    CoreError::Store(err.to_string())
}
