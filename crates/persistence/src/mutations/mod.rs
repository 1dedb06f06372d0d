// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `centers`: Service center creation
//! - `vehicles`: Vehicle registration and service records
//! - `slots`: Lazy slot creation and the conditional seat increment
//! - `bookings`: Booking insertion

pub mod bookings;
pub mod centers;
pub mod slots;
pub mod vehicles;

pub use bookings::insert_booking;
pub use centers::create_center;
pub use slots::{insert_missing_slots, try_increment_booked};
pub use vehicles::{record_service, register_vehicle};
