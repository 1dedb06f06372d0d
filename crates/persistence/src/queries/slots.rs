// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time slot queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use servicebay_domain::{CenterId, TimeSlot};
use time::Date;

use crate::data_models::{count_from_db, date_to_db, time_from_db};
use crate::diesel_schema::time_slots;
use crate::error::PersistenceError;

/// Diesel Queryable struct for slot rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = time_slots)]
struct SlotRow {
    slot_time: String,
    capacity: i32,
    booked_count: i32,
}

/// Returns every stored slot of a center on a date, ordered by time.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn get_slots(
    conn: &mut SqliteConnection,
    center_id: &CenterId,
    date: Date,
) -> Result<Vec<TimeSlot>, PersistenceError> {
    let rows: Vec<SlotRow> = time_slots::table
        .filter(time_slots::center_id.eq(center_id.id()))
        .filter(time_slots::slot_date.eq(date_to_db(date)))
        .order(time_slots::slot_time.asc())
        .select(SlotRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(TimeSlot {
                center_id: center_id.clone(),
                date,
                time: time_from_db(&row.slot_time)?,
                capacity: count_from_db(row.capacity)?,
                booked_count: count_from_db(row.booked_count)?,
            })
        })
        .collect()
}
