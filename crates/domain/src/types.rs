// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Time};

/// Identifies a vehicle known to the external vehicle data source.
///
/// Identifiers are normalized to uppercase so that lookups are
/// case-insensitive (registration plates are commonly typed either way).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId {
    id: String,
}

impl VehicleId {
    /// Creates a new `VehicleId`, normalized to uppercase.
    ///
    /// # Arguments
    ///
    /// * `id` - The raw vehicle identifier
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.trim().to_uppercase(),
        }
    }

    /// Parses and validates a vehicle identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty after trimming.
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        let vehicle_id: Self = Self::new(id);
        if vehicle_id.id.is_empty() {
            return Err(DomainError::InvalidVehicleId(String::from(
                "Vehicle id cannot be empty",
            )));
        }
        Ok(vehicle_id)
    }

    /// Returns the normalized identifier.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Identifies a service center.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CenterId {
    id: String,
}

impl CenterId {
    /// Creates a new `CenterId`, normalized to uppercase.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.trim().to_uppercase(),
        }
    }

    /// Parses and validates a service center identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty after trimming.
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        let center_id: Self = Self::new(id);
        if center_id.id.is_empty() {
            return Err(DomainError::InvalidCenterId(String::from(
                "Center id cannot be empty",
            )));
        }
        Ok(center_id)
    }

    /// Returns the normalized identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for CenterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A vehicle's maintenance position.
///
/// The odometer reading is unsigned by construction; raw readings are
/// validated through [`VehicleServiceState::new`]. When no last service
/// date is known, only distance-based due checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleServiceState {
    odometer_km: u32,
    last_service_date: Option<Date>,
}

impl VehicleServiceState {
    /// Creates a service state from a raw odometer reading.
    ///
    /// # Arguments
    ///
    /// * `odometer_km` - The odometer reading in kilometers
    /// * `last_service_date` - The date of the last completed service, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the reading is negative or exceeds `u32::MAX`.
    pub fn new(odometer_km: i64, last_service_date: Option<Date>) -> Result<Self, DomainError> {
        if odometer_km < 0 {
            return Err(DomainError::NegativeOdometer { odometer_km });
        }
        let odometer_km: u32 = u32::try_from(odometer_km)
            .map_err(|_| DomainError::OdometerOutOfRange { odometer_km })?;

        Ok(Self {
            odometer_km,
            last_service_date,
        })
    }

    /// Returns the odometer reading in kilometers.
    #[must_use]
    pub const fn odometer_km(&self) -> u32 {
        self.odometer_km
    }

    /// Returns the last service date, if one is recorded.
    #[must_use]
    pub const fn last_service_date(&self) -> Option<Date> {
        self.last_service_date
    }
}

/// Parses a calendar date of the form `YYYY-MM-DD`.
///
/// Other ISO 8601 spellings (basic, ordinal, week dates) are rejected.
///
/// # Errors
///
/// Returns an error if the string is not a valid calendar date.
pub fn parse_date(date_string: &str) -> Result<Date, DomainError> {
    Date::parse(date_string, format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: date_string.to_string(),
            error: e.to_string(),
        }
    })
}

/// Parses a slot time of the form `HH:MM`.
///
/// # Errors
///
/// Returns an error if the string is not a valid 24-hour time.
pub fn parse_slot_time(time_string: &str) -> Result<Time, DomainError> {
    Time::parse(time_string, format_description!("[hour]:[minute]")).map_err(|e| {
        DomainError::TimeParseError {
            time_string: time_string.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a slot time as `HH:MM`.
#[must_use]
pub fn format_slot_time(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}
