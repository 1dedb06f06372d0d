// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Service Bay scheduling system.
//!
//! This crate stores service centers, vehicles, materialized time slots and
//! bookings in `SQLite` through Diesel, and implements the `VehicleSource`,
//! `SlotStore` and `BookingSink` contracts of the core crate.
//!
//! ## Capacity Guarantee
//!
//! A seat is taken only by a single conditional `UPDATE` that requires
//! `booked_count < capacity`. The schema additionally enforces
//! `CHECK (booked_count <= capacity)`, so a slot can never be overbooked even
//! by a writer that bypasses this crate.
//!
//! ## Migrations
//!
//! Migrations live in `migrations/` and are embedded into the binary. They are
//! applied whenever a database is opened.
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated shared-cache in-memory databases
//! - Multi-connection behavior is exercised against temporary files

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use servicebay::{Booking, BookingRequest, BookingSink, SlotStore, VehicleSource};
use servicebay_domain::{CenterId, ServiceCenter, TimeSlot, VehicleId, VehicleServiceState};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, Time};
use tracing::warn;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::VehicleRecord;
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the scheduling store.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    /// Runs `f` inside one write transaction.
    ///
    /// The transaction is committed when `f` returns `Ok` and rolled back
    /// otherwise, so partial work (e.g. a taken seat without a stored
    /// booking) never becomes visible.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`, or a `PersistenceError` if the transaction
    /// cannot be started or committed.
    pub fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        AnsiTransactionManager::begin_transaction_sql(&mut self.conn, "BEGIN IMMEDIATE")
            .map_err(|e| E::from(PersistenceError::from(e)))?;

        match f(self) {
            Ok(value) => {
                if let Err(e) = AnsiTransactionManager::commit_transaction(&mut self.conn) {
                    self.rollback();
                    return Err(E::from(PersistenceError::from(e)));
                }
                Ok(value)
            }
            Err(err) => {
                self.rollback();
                Err(err)
            }
        }
    }

    fn rollback(&mut self) {
        if let Err(e) = AnsiTransactionManager::rollback_transaction(&mut self.conn) {
            warn!(error = %e, "Transaction rollback failed");
        }
    }

    // ========================================================================
    // Service Centers
    // ========================================================================

    /// Creates a service center.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or the insert fails.
    pub fn create_center(&mut self, center: &ServiceCenter) -> Result<(), PersistenceError> {
        mutations::create_center(&mut self.conn, center)
    }

    /// Retrieves a service center by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_center(
        &mut self,
        center_id: &CenterId,
    ) -> Result<Option<ServiceCenter>, PersistenceError> {
        queries::get_center(&mut self.conn, center_id)
    }

    /// Lists all service centers.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_centers(&mut self) -> Result<Vec<ServiceCenter>, PersistenceError> {
        queries::list_centers(&mut self.conn)
    }

    // ========================================================================
    // Vehicles
    // ========================================================================

    /// Registers a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or the insert fails.
    pub fn register_vehicle(
        &mut self,
        vehicle_id: &VehicleId,
        state: &VehicleServiceState,
    ) -> Result<(), PersistenceError> {
        mutations::register_vehicle(&mut self.conn, vehicle_id, state)
    }

    /// Records a completed service.
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle is unknown or the update fails.
    pub fn record_service(
        &mut self,
        vehicle_id: &VehicleId,
        state: &VehicleServiceState,
    ) -> Result<(), PersistenceError> {
        mutations::record_service(&mut self.conn, vehicle_id, state)
    }

    /// Retrieves a vehicle by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_vehicle(
        &mut self,
        vehicle_id: &VehicleId,
    ) -> Result<Option<VehicleRecord>, PersistenceError> {
        queries::get_vehicle(&mut self.conn, vehicle_id)
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Retrieves a booking by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist or the query fails.
    pub fn get_booking(&mut self, booking_id: i64) -> Result<Booking, PersistenceError> {
        queries::get_booking(&mut self.conn, booking_id)?
            .ok_or(PersistenceError::BookingNotFound(booking_id))
    }
}

impl VehicleSource for Persistence {
    type Error = PersistenceError;

    fn vehicle_service_state(
        &mut self,
        vehicle_id: &VehicleId,
    ) -> Result<Option<VehicleServiceState>, Self::Error> {
        Ok(queries::get_vehicle(&mut self.conn, vehicle_id)?.map(|record| record.state))
    }
}

impl SlotStore for Persistence {
    type Error = PersistenceError;

    fn service_center(
        &mut self,
        center_id: &CenterId,
    ) -> Result<Option<ServiceCenter>, Self::Error> {
        queries::get_center(&mut self.conn, center_id)
    }

    fn get_slots(
        &mut self,
        center_id: &CenterId,
        date: Date,
    ) -> Result<Vec<TimeSlot>, Self::Error> {
        queries::get_slots(&mut self.conn, center_id, date)
    }

    fn get_or_create_slots(
        &mut self,
        center_id: &CenterId,
        date: Date,
        times: &[Time],
        capacity: u32,
    ) -> Result<(), Self::Error> {
        mutations::insert_missing_slots(&mut self.conn, center_id, date, times, capacity)?;
        Ok(())
    }

    fn try_increment_booked(
        &mut self,
        center_id: &CenterId,
        date: Date,
        time: Time,
    ) -> Result<bool, Self::Error> {
        mutations::try_increment_booked(&mut self.conn, center_id, date, time)
    }
}

impl BookingSink for Persistence {
    type Error = PersistenceError;

    fn submit(&mut self, request: &BookingRequest) -> Result<Booking, Self::Error> {
        mutations::insert_booking(&mut self.conn, request)
    }

    fn find_by_idempotency_key(&mut self, key: &str) -> Result<Option<Booking>, Self::Error> {
        queries::find_booking_by_idempotency_key(&mut self.conn, key)
    }
}
