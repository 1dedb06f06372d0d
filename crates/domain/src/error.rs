// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Date, Time};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Vehicle identifier is empty or invalid.
    InvalidVehicleId(String),
    /// Service center identifier is empty or invalid.
    InvalidCenterId(String),
    /// Service center name is empty.
    InvalidCenterName(String),
    /// An odometer reading was negative.
    NegativeOdometer {
        /// The rejected reading.
        odometer_km: i64,
    },
    /// An odometer reading does not fit the supported range.
    OdometerOutOfRange {
        /// The rejected reading.
        odometer_km: i64,
    },
    /// The last service date lies after the evaluation date.
    ServiceDateInFuture {
        /// The recorded last service date.
        last_service_date: Date,
        /// The date the evaluation was requested for.
        as_of: Date,
    },
    /// The maintenance policy is not usable.
    InvalidPolicy {
        /// Description of the validation error.
        reason: String,
    },
    /// The slot catalog of a service center is not usable.
    InvalidSlotCatalog {
        /// Description of the validation error.
        reason: String,
    },
    /// A slot time does not fall on the catalog grid.
    SlotTimeNotInCatalog {
        /// The requested time.
        time: Time,
    },
    /// Timezone is not a known IANA name.
    InvalidTimezone(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to parse a slot time from string.
    TimeParseError {
        /// The invalid time string.
        time_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidVehicleId(msg) => write!(f, "Invalid vehicle id: {msg}"),
            Self::InvalidCenterId(msg) => write!(f, "Invalid service center id: {msg}"),
            Self::InvalidCenterName(msg) => write!(f, "Invalid service center name: {msg}"),
            Self::NegativeOdometer { odometer_km } => {
                write!(f, "Odometer reading must not be negative, got {odometer_km} km")
            }
            Self::OdometerOutOfRange { odometer_km } => {
                write!(f, "Odometer reading {odometer_km} km is out of range")
            }
            Self::ServiceDateInFuture {
                last_service_date,
                as_of,
            } => {
                write!(
                    f,
                    "Last service date {last_service_date} is after evaluation date {as_of}"
                )
            }
            Self::InvalidPolicy { reason } => write!(f, "Invalid maintenance policy: {reason}"),
            Self::InvalidSlotCatalog { reason } => write!(f, "Invalid slot catalog: {reason}"),
            Self::SlotTimeNotInCatalog { time } => {
                write!(
                    f,
                    "Slot time {:02}:{:02} is not offered by the slot catalog",
                    time.hour(),
                    time.minute()
                )
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::TimeParseError { time_string, error } => {
                write!(f, "Failed to parse time '{time_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
