// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service center queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use servicebay_domain::{CenterId, ServiceCenter, SlotCatalog};
use tracing::debug;

use crate::data_models::time_from_db;
use crate::diesel_schema::service_centers;
use crate::error::PersistenceError;

/// Diesel Queryable struct for service center rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = service_centers)]
struct CenterRow {
    center_id: String,
    name: String,
    timezone: String,
    opens_at: Option<String>,
    closes_at: Option<String>,
    step_minutes: Option<i32>,
    slot_capacity: Option<i32>,
}

impl CenterRow {
    fn into_center(self) -> Result<ServiceCenter, PersistenceError> {
        let catalog: Option<SlotCatalog> = match (
            self.opens_at,
            self.closes_at,
            self.step_minutes,
            self.slot_capacity,
        ) {
            (Some(opens_at), Some(closes_at), Some(step_minutes), Some(capacity)) => {
                let step_minutes: u16 = u16::try_from(step_minutes).map_err(|_| {
                    PersistenceError::CorruptRow(format!("step_minutes {step_minutes}"))
                })?;
                let capacity: u32 = u32::try_from(capacity)
                    .map_err(|_| PersistenceError::CorruptRow(format!("capacity {capacity}")))?;
                let catalog: SlotCatalog = SlotCatalog::new(
                    time_from_db(&opens_at)?,
                    time_from_db(&closes_at)?,
                    step_minutes,
                    capacity,
                )
                .map_err(|e| PersistenceError::CorruptRow(e.to_string()))?;
                Some(catalog)
            }
            _ => None,
        };

        ServiceCenter::new(
            CenterId::new(&self.center_id),
            &self.name,
            &self.timezone,
            catalog,
        )
        .map_err(|e| PersistenceError::CorruptRow(e.to_string()))
    }
}

/// Retrieves a service center by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
/// Returns `Ok(None)` if the center is not found.
pub fn get_center(
    conn: &mut SqliteConnection,
    center_id: &CenterId,
) -> Result<Option<ServiceCenter>, PersistenceError> {
    debug!(center_id = center_id.id(), "Looking up service center");

    let row: Option<CenterRow> = service_centers::table
        .filter(service_centers::center_id.eq(center_id.id()))
        .select(CenterRow::as_select())
        .first(conn)
        .optional()?;

    row.map(CenterRow::into_center).transpose()
}

/// Lists all service centers ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_centers(conn: &mut SqliteConnection) -> Result<Vec<ServiceCenter>, PersistenceError> {
    service_centers::table
        .order(service_centers::center_id.asc())
        .select(CenterRow::as_select())
        .load(conn)?
        .into_iter()
        .map(CenterRow::into_center)
        .collect()
}
