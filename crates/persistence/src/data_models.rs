// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversions between stored column values and domain values.
//!
//! Dates are stored as ISO 8601 text (`YYYY-MM-DD`), slot times as `HH:MM`,
//! and counters as `INTEGER`.

use serde::{Deserialize, Serialize};
use servicebay_domain::{
    VehicleId, VehicleServiceState, format_slot_time, parse_date, parse_slot_time,
};
use time::{Date, Time};

use crate::error::PersistenceError;

/// A registered vehicle as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_id: VehicleId,
    pub state: VehicleServiceState,
    pub updated_at: String,
}

pub fn date_to_db(date: Date) -> String {
    date.to_string()
}

pub fn date_from_db(value: &str) -> Result<Date, PersistenceError> {
    parse_date(value).map_err(|e| PersistenceError::CorruptRow(e.to_string()))
}

pub fn time_to_db(time: Time) -> String {
    format_slot_time(time)
}

pub fn time_from_db(value: &str) -> Result<Time, PersistenceError> {
    parse_slot_time(value).map_err(|e| PersistenceError::CorruptRow(e.to_string()))
}

pub fn count_to_db(value: u32) -> Result<i32, PersistenceError> {
    i32::try_from(value).map_err(|_| {
        PersistenceError::ConstraintViolation(format!("{value} exceeds INTEGER range"))
    })
}

pub fn count_from_db(value: i32) -> Result<u32, PersistenceError> {
    u32::try_from(value)
        .map_err(|_| PersistenceError::CorruptRow(format!("negative counter {value}")))
}
