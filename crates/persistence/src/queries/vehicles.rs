// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicle queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use servicebay_domain::{VehicleId, VehicleServiceState};
use time::Date;
use tracing::debug;

use crate::data_models::{VehicleRecord, date_from_db};
use crate::diesel_schema::vehicles;
use crate::error::PersistenceError;

/// Diesel Queryable struct for vehicle rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = vehicles)]
struct VehicleRow {
    vehicle_id: String,
    odometer_km: i64,
    last_service_date: Option<String>,
    updated_at: String,
}

/// Retrieves a vehicle by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
/// Returns `Ok(None)` if the vehicle is not found.
pub fn get_vehicle(
    conn: &mut SqliteConnection,
    vehicle_id: &VehicleId,
) -> Result<Option<VehicleRecord>, PersistenceError> {
    debug!(vehicle_id = vehicle_id.value(), "Looking up vehicle");

    let Some(row) = vehicles::table
        .filter(vehicles::vehicle_id.eq(vehicle_id.value()))
        .select(VehicleRow::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let last_service_date: Option<Date> = row
        .last_service_date
        .as_deref()
        .map(date_from_db)
        .transpose()?;
    let state: VehicleServiceState = VehicleServiceState::new(row.odometer_km, last_service_date)
        .map_err(|e| PersistenceError::CorruptRow(e.to_string()))?;

    Ok(Some(VehicleRecord {
        vehicle_id: VehicleId::new(&row.vehicle_id),
        state,
        updated_at: row.updated_at,
    }))
}
