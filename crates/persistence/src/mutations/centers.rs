// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service center mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use servicebay_domain::ServiceCenter;
use tracing::info;

use crate::data_models::{count_to_db, time_to_db};
use crate::diesel_schema::service_centers;
use crate::error::PersistenceError;

#[derive(Insertable)]
#[diesel(table_name = service_centers)]
struct NewCenterRow<'a> {
    center_id: &'a str,
    name: &'a str,
    timezone: &'a str,
    opens_at: Option<String>,
    closes_at: Option<String>,
    step_minutes: Option<i32>,
    slot_capacity: Option<i32>,
}

/// Creates a service center together with its slot catalog.
///
/// # Errors
///
/// Returns an error if:
/// - A center with the same id already exists
/// - The database insert fails
pub fn create_center(
    conn: &mut SqliteConnection,
    center: &ServiceCenter,
) -> Result<(), PersistenceError> {
    let catalog = center.catalog();
    let row: NewCenterRow<'_> = NewCenterRow {
        center_id: center.center_id().id(),
        name: center.name(),
        timezone: center.timezone(),
        opens_at: catalog.map(|c| time_to_db(c.opens_at())),
        closes_at: catalog.map(|c| time_to_db(c.closes_at())),
        step_minutes: catalog.map(|c| i32::from(c.step_minutes())),
        slot_capacity: catalog.map(|c| count_to_db(c.capacity())).transpose()?,
    };

    diesel::insert_into(service_centers::table)
        .values(&row)
        .execute(conn)
        .map_err(|e| match PersistenceError::from(e) {
            PersistenceError::ConstraintViolation(_) => {
                PersistenceError::DuplicateCenter(center.center_id().to_string())
            }
            other => other,
        })?;

    info!(
        center_id = center.center_id().id(),
        has_catalog = catalog.is_some(),
        "Created service center"
    );
    Ok(())
}
