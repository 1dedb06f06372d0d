// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod allocator;
mod booking;
mod error;
mod ports;

#[cfg(test)]
mod tests;

use error::store_error;

// Re-export public types and functions
pub use allocator::SlotAllocator;
pub use booking::{Booking, BookingRequest, RejectionReason, ReservationRequest, ReserveOutcome};
pub use error::CoreError;
pub use ports::{BookingSink, SlotStore, VehicleSource};

/// Hands a reserved booking request to the booking sink.
///
/// When the request carries an idempotency key that was already used, the
/// stored booking is returned and nothing new is written.
///
/// # Arguments
///
/// * `sink` - The booking sink
/// * `request` - A request produced by `SlotAllocator::reserve`
///
/// # Returns
///
/// The stored booking and whether it was replayed from an earlier submission.
///
/// # Errors
///
/// Returns an error if the sink fails.
pub fn submit_booking<K: BookingSink>(
    sink: &mut K,
    request: &BookingRequest,
) -> Result<(Booking, bool), CoreError> {
    if let Some(key) = request.idempotency_key.as_deref()
        && let Some(existing) = sink.find_by_idempotency_key(key).map_err(store_error)?
    {
        return Ok((existing, true));
    }

    let booking: Booking = sink.submit(request).map_err(store_error)?;
    Ok((booking, false))
}
