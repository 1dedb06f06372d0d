// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicle mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use servicebay_domain::{VehicleId, VehicleServiceState};
use tracing::info;

use crate::data_models::date_to_db;
use crate::diesel_schema::vehicles;
use crate::error::PersistenceError;

/// Registers a vehicle with its current maintenance position.
///
/// # Errors
///
/// Returns an error if:
/// - A vehicle with the same id already exists
/// - The database insert fails
pub fn register_vehicle(
    conn: &mut SqliteConnection,
    vehicle_id: &VehicleId,
    state: &VehicleServiceState,
) -> Result<(), PersistenceError> {
    diesel::insert_into(vehicles::table)
        .values((
            vehicles::vehicle_id.eq(vehicle_id.value()),
            vehicles::odometer_km.eq(i64::from(state.odometer_km())),
            vehicles::last_service_date.eq(state.last_service_date().map(date_to_db)),
        ))
        .execute(conn)
        .map_err(|e| match PersistenceError::from(e) {
            PersistenceError::ConstraintViolation(_) => {
                PersistenceError::DuplicateVehicle(vehicle_id.to_string())
            }
            other => other,
        })?;

    info!(
        vehicle_id = vehicle_id.value(),
        odometer_km = state.odometer_km(),
        "Registered vehicle"
    );
    Ok(())
}

/// Records a completed service, replacing the vehicle's maintenance position.
///
/// # Errors
///
/// Returns an error if the vehicle does not exist or the update fails.
pub fn record_service(
    conn: &mut SqliteConnection,
    vehicle_id: &VehicleId,
    state: &VehicleServiceState,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(vehicles::table)
        .filter(vehicles::vehicle_id.eq(vehicle_id.value()))
        .set((
            vehicles::odometer_km.eq(i64::from(state.odometer_km())),
            vehicles::last_service_date.eq(state.last_service_date().map(date_to_db)),
            vehicles::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::VehicleNotFound(vehicle_id.to_string()));
    }

    info!(
        vehicle_id = vehicle_id.value(),
        odometer_km = state.odometer_km(),
        "Recorded completed service"
    );
    Ok(())
}
