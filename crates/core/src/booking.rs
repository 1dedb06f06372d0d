// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use servicebay_domain::{CenterId, ServiceSelection, VehicleId};
use time::{Date, Time};

/// A reservation attempt for one seat in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    /// The vehicle to be serviced.
    pub vehicle_id: VehicleId,
    /// The service center.
    pub center_id: CenterId,
    /// The slot date, in the center's calendar.
    pub date: Date,
    /// The slot start time.
    pub time: Time,
    /// The services picked by the customer.
    pub service_selection: ServiceSelection,
    /// Client-supplied key that makes retries safe.
    pub idempotency_key: Option<String>,
}

/// A booking request that holds a seat.
///
/// Only produced after the slot's counter was incremented, i.e. the slot
/// had `booked_count < capacity` at allocation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub vehicle_id: VehicleId,
    pub center_id: CenterId,
    pub date: Date,
    pub time: Time,
    pub service_selection: ServiceSelection,
    pub idempotency_key: Option<String>,
}

impl From<ReservationRequest> for BookingRequest {
    fn from(request: ReservationRequest) -> Self {
        Self {
            vehicle_id: request.vehicle_id,
            center_id: request.center_id,
            date: request.date,
            time: request.time,
            service_selection: request.service_selection,
            idempotency_key: request.idempotency_key,
        }
    }
}

/// A booking persisted by the booking sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// The identifier assigned by the sink.
    pub booking_id: i64,
    /// The request the booking was created from.
    pub request: BookingRequest,
    /// Creation timestamp (UTC, ISO 8601).
    pub created_at: String,
}

/// Why a reservation was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The slot has no seats left.
    Full,
    /// The slot date is before the center-local current date.
    DateInPast,
}

impl RejectionReason {
    /// Converts this reason to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::DateInPast => "DATE_IN_PAST",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The expected outcomes of a reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReserveOutcome {
    /// A seat was taken; the request is ready to be submitted.
    Reserved(BookingRequest),
    /// No seat was taken.
    Rejected {
        /// Why the reservation was turned down.
        reason: RejectionReason,
    },
}

impl ReserveOutcome {
    /// Whether a seat was taken.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(self, Self::Reserved(_))
    }
}
