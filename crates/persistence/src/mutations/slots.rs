// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot mutations.
//!
//! ## Invariants
//!
//! - `booked_count` only changes through `try_increment_booked`
//! - `try_increment_booked` is a single conditional `UPDATE`, so the check
//!   and the increment cannot interleave with another writer
//! - Lazy creation never touches an existing row

use diesel::prelude::*;
use diesel::SqliteConnection;
use servicebay_domain::CenterId;
use time::{Date, Time};
use tracing::debug;

use crate::data_models::{count_to_db, date_to_db, time_to_db};
use crate::diesel_schema::time_slots;
use crate::error::PersistenceError;

#[derive(Insertable)]
#[diesel(table_name = time_slots)]
struct NewSlotRow<'a> {
    center_id: &'a str,
    slot_date: String,
    slot_time: String,
    capacity: i32,
    booked_count: i32,
}

/// Inserts the slots that do not exist yet, with `booked_count = 0`.
///
/// Uses `INSERT OR IGNORE` against the `(center_id, slot_date, slot_time)`
/// unique key, so concurrent callers converge on the same rows.
///
/// # Returns
///
/// The number of slots that were created.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn insert_missing_slots(
    conn: &mut SqliteConnection,
    center_id: &CenterId,
    date: Date,
    times: &[Time],
    capacity: u32,
) -> Result<usize, PersistenceError> {
    if times.is_empty() {
        return Ok(0);
    }

    let capacity: i32 = count_to_db(capacity)?;
    let rows: Vec<NewSlotRow<'_>> = times
        .iter()
        .map(|time| NewSlotRow {
            center_id: center_id.id(),
            slot_date: date_to_db(date),
            slot_time: time_to_db(*time),
            capacity,
            booked_count: 0,
        })
        .collect();

    let created: usize = diesel::insert_or_ignore_into(time_slots::table)
        .values(&rows)
        .execute(conn)?;

    if created > 0 {
        debug!(center_id = center_id.id(), %date, created, "Materialized slots");
    }
    Ok(created)
}

/// Takes one seat if the slot still has one.
///
/// # Returns
///
/// `true` if exactly one row was updated, `false` if the slot is full or
/// does not exist.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn try_increment_booked(
    conn: &mut SqliteConnection,
    center_id: &CenterId,
    date: Date,
    time: Time,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(time_slots::table)
        .filter(time_slots::center_id.eq(center_id.id()))
        .filter(time_slots::slot_date.eq(date_to_db(date)))
        .filter(time_slots::slot_time.eq(time_to_db(time)))
        .filter(time_slots::booked_count.lt(time_slots::capacity))
        .set(time_slots::booked_count.eq(time_slots::booked_count + 1))
        .execute(conn)?;

    debug!(
        center_id = center_id.id(),
        %date,
        time = %time_to_db(time),
        taken = updated == 1,
        "Conditional seat increment"
    );
    Ok(updated == 1)
}
