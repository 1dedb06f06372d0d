// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use servicebay::{Booking, BookingRequest};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{date_to_db, time_to_db};
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;
use crate::queries::get_booking;

#[derive(Insertable)]
#[diesel(table_name = bookings)]
struct NewBookingRow<'a> {
    vehicle_id: &'a str,
    center_id: &'a str,
    slot_date: String,
    slot_time: String,
    service_package: Option<&'static str>,
    extras_json: String,
    idempotency_key: Option<&'a str>,
}

/// Persists a booking request and returns the stored booking.
///
/// # Errors
///
/// Returns an error if:
/// - The idempotency key is already used
/// - The vehicle, center or slot does not exist
/// - The database insert fails
pub fn insert_booking(
    conn: &mut SqliteConnection,
    request: &BookingRequest,
) -> Result<Booking, PersistenceError> {
    let row: NewBookingRow<'_> = NewBookingRow {
        vehicle_id: request.vehicle_id.value(),
        center_id: request.center_id.id(),
        slot_date: date_to_db(request.date),
        slot_time: time_to_db(request.time),
        service_package: request.service_selection.package.map(|p| p.as_str()),
        extras_json: serde_json::to_string(&request.service_selection.extras)?,
        idempotency_key: request.idempotency_key.as_deref(),
    };

    diesel::insert_into(bookings::table)
        .values(&row)
        .execute(conn)?;

    let booking_id: i64 = conn.get_last_insert_rowid()?;

    info!(
        booking_id,
        vehicle_id = request.vehicle_id.value(),
        center_id = request.center_id.id(),
        date = %request.date,
        time = %time_to_db(request.time),
        "Booking created"
    );

    get_booking(conn, booking_id)?.ok_or(PersistenceError::BookingNotFound(booking_id))
}
