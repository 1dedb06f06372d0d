// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::input::InputError;
use servicebay::CoreError;
use servicebay_domain::{DomainError, format_slot_time};
use servicebay_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// A reservation turned down for capacity or date reasons is not an error;
/// it is reported through `ReservationResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A resource with the same identity already exists.
    Conflict {
        /// The type of resource that clashed.
        resource_type: String,
        /// A human-readable description of the clash.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} conflict: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        Self::InvalidInput {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let field: &str = match &err {
        DomainError::InvalidVehicleId(_) => "vehicle_id",
        DomainError::InvalidCenterId(_) => "center_id",
        DomainError::InvalidCenterName(_) => "name",
        DomainError::NegativeOdometer { .. } | DomainError::OdometerOutOfRange { .. } => {
            "odometer_km"
        }
        DomainError::ServiceDateInFuture { .. } => "last_service_date",
        DomainError::InvalidPolicy { .. } => "policy",
        DomainError::InvalidSlotCatalog { .. } => "catalog",
        DomainError::SlotTimeNotInCatalog { .. } | DomainError::TimeParseError { .. } => "time",
        DomainError::InvalidTimezone(_) => "timezone",
        DomainError::DateArithmeticOverflow { .. } | DomainError::DateParseError { .. } => "date",
    };

    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::CenterNotFound(center_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Service center"),
            message: format!("Service center '{center_id}' does not exist"),
        },
        CoreError::VehicleNotFound(vehicle_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Vehicle"),
            message: format!("Vehicle '{vehicle_id}' does not exist"),
        },
        CoreError::SlotNotFound {
            center_id,
            date,
            time,
        } => ApiError::ResourceNotFound {
            resource_type: String::from("Slot"),
            message: format!(
                "Service center '{center_id}' offers no slot on {date} at {}",
                format_slot_time(time)
            ),
        },
        CoreError::Store(msg) => ApiError::Internal {
            message: format!("Store failure: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Identity clashes and missing rows map to client errors; everything else
/// is an internal failure.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DuplicateCenter(center_id) => ApiError::Conflict {
            resource_type: String::from("Service center"),
            message: format!("Service center '{center_id}' already exists"),
        },
        PersistenceError::DuplicateVehicle(vehicle_id) => ApiError::Conflict {
            resource_type: String::from("Vehicle"),
            message: format!("Vehicle '{vehicle_id}' already exists"),
        },
        PersistenceError::CenterNotFound(center_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Service center"),
            message: format!("Service center '{center_id}' does not exist"),
        },
        PersistenceError::VehicleNotFound(vehicle_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Vehicle"),
            message: format!("Vehicle '{vehicle_id}' does not exist"),
        },
        PersistenceError::BookingNotFound(booking_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking {booking_id} does not exist"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
