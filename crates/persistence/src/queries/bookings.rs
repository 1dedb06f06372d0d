// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use servicebay::{Booking, BookingRequest};
use servicebay_domain::{CenterId, ServicePackage, ServiceSelection, VehicleId};
use std::str::FromStr;
use tracing::debug;

use crate::data_models::{date_from_db, time_from_db};
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

/// Diesel Queryable struct for booking rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
struct BookingRow {
    booking_id: i64,
    vehicle_id: String,
    center_id: String,
    slot_date: String,
    slot_time: String,
    service_package: Option<String>,
    extras_json: String,
    idempotency_key: Option<String>,
    created_at: String,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, PersistenceError> {
        let package: Option<ServicePackage> = self
            .service_package
            .as_deref()
            .map(ServicePackage::from_str)
            .transpose()
            .map_err(PersistenceError::CorruptRow)?;
        let extras: Vec<String> = serde_json::from_str(&self.extras_json)?;

        Ok(Booking {
            booking_id: self.booking_id,
            request: BookingRequest {
                vehicle_id: VehicleId::new(&self.vehicle_id),
                center_id: CenterId::new(&self.center_id),
                date: date_from_db(&self.slot_date)?,
                time: time_from_db(&self.slot_time)?,
                service_selection: ServiceSelection { package, extras },
                idempotency_key: self.idempotency_key,
            },
            created_at: self.created_at,
        })
    }
}

/// Retrieves a booking by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
/// Returns `Ok(None)` if the booking is not found.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<Option<Booking>, PersistenceError> {
    debug!(booking_id, "Looking up booking");

    bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .select(BookingRow::as_select())
        .first(conn)
        .optional()?
        .map(BookingRow::into_booking)
        .transpose()
}

/// Retrieves a booking by its client-supplied idempotency key.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
/// Returns `Ok(None)` if no booking carries the key.
pub fn find_booking_by_idempotency_key(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Option<Booking>, PersistenceError> {
    bookings::table
        .filter(bookings::idempotency_key.eq(key))
        .select(BookingRow::as_select())
        .first(conn)
        .optional()?
        .map(BookingRow::into_booking)
        .transpose()
}
