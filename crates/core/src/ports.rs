// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contracts for the collaborators the allocator depends on.
//!
//! The allocator itself is synchronous and stateless. Every guarantee about
//! concurrent reservations is placed on the `SlotStore` implementation:
//!
//! - `get_or_create_slots` must be idempotent and must never reset an
//!   existing slot's counters
//! - `try_increment_booked` must check and increment in one atomic step,
//!   so that `booked_count` never exceeds `capacity`

use crate::booking::{Booking, BookingRequest};
use servicebay_domain::{CenterId, ServiceCenter, TimeSlot, VehicleId, VehicleServiceState};
use time::{Date, Time};

/// Supplies the maintenance position of vehicles.
pub trait VehicleSource {
    /// The error type reported by this source.
    type Error: std::fmt::Display;

    /// Looks up a vehicle's odometer reading and last service date.
    ///
    /// Returns `Ok(None)` when the vehicle is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    fn vehicle_service_state(
        &mut self,
        vehicle_id: &VehicleId,
    ) -> Result<Option<VehicleServiceState>, Self::Error>;
}

/// Stores service centers and their slot counters.
pub trait SlotStore {
    /// The error type reported by this store.
    type Error: std::fmt::Display;

    /// Looks up a service center. Returns `Ok(None)` when it is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    fn service_center(&mut self, center_id: &CenterId)
    -> Result<Option<ServiceCenter>, Self::Error>;

    /// Returns every stored slot of a center on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_slots(&mut self, center_id: &CenterId, date: Date) -> Result<Vec<TimeSlot>, Self::Error>;

    /// Materializes slots that do not exist yet with `booked_count = 0`.
    ///
    /// Existing slots are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn get_or_create_slots(
        &mut self,
        center_id: &CenterId,
        date: Date,
        times: &[Time],
        capacity: u32,
    ) -> Result<(), Self::Error>;

    /// Atomically increments `booked_count` if it is below `capacity`.
    ///
    /// Returns `Ok(true)` if the increment happened and `Ok(false)` if the
    /// slot was full (or does not exist).
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn try_increment_booked(
        &mut self,
        center_id: &CenterId,
        date: Date,
        time: Time,
    ) -> Result<bool, Self::Error>;
}

/// Accepts finalized booking requests.
pub trait BookingSink {
    /// The error type reported by this sink.
    type Error: std::fmt::Display;

    /// Persists a booking request and returns the stored booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking cannot be stored.
    fn submit(&mut self, request: &BookingRequest) -> Result<Booking, Self::Error>;

    /// Finds a previously stored booking by its client-supplied key.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn find_by_idempotency_key(&mut self, key: &str) -> Result<Option<Booking>, Self::Error>;
}
