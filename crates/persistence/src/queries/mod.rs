// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `centers`: Service centers and their slot catalog
//! - `vehicles`: Vehicle service state
//! - `slots`: Materialized time slots
//! - `bookings`: Persisted bookings

pub mod bookings;
pub mod centers;
pub mod slots;
pub mod vehicles;

pub use bookings::{find_booking_by_idempotency_key, get_booking};
pub use centers::{get_center, list_centers};
pub use slots::get_slots;
pub use vehicles::get_vehicle;
