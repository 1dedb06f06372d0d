// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry raw client strings; handlers parse them into domain types.
//! Dates are `YYYY-MM-DD`, times are `HH:MM`.

use servicebay::{Booking, RejectionReason};
use servicebay_domain::{
    DueStatus, NextDue, ServiceCenter, SlotCatalog, TimeSlot, format_slot_time,
};
use servicebay_persistence::VehicleRecord;

/// Slot template supplied when creating a service center.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SlotCatalogInput {
    /// First slot start time.
    pub opens_at: String,
    /// No slot starts at or after this time.
    pub closes_at: String,
    /// Minutes between slots. Defaults to 30.
    #[serde(default)]
    pub step_minutes: Option<u16>,
    /// Concurrent bookings per slot. Defaults to 12.
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// API request to create a service center.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateCenterRequest {
    /// The center identifier.
    pub center_id: String,
    /// Display name.
    pub name: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Slot template; omitted for centers that take no bookings.
    #[serde(default)]
    pub catalog: Option<SlotCatalogInput>,
}

/// A center's slot template.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SlotCatalogInfo {
    pub opens_at: String,
    pub closes_at: String,
    pub step_minutes: u16,
    pub capacity: u32,
}

impl From<&SlotCatalog> for SlotCatalogInfo {
    fn from(catalog: &SlotCatalog) -> Self {
        Self {
            opens_at: format_slot_time(catalog.opens_at()),
            closes_at: format_slot_time(catalog.closes_at()),
            step_minutes: catalog.step_minutes(),
            capacity: catalog.capacity(),
        }
    }
}

/// A service center.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CenterInfo {
    pub center_id: String,
    pub name: String,
    pub timezone: String,
    pub catalog: Option<SlotCatalogInfo>,
}

impl From<&ServiceCenter> for CenterInfo {
    fn from(center: &ServiceCenter) -> Self {
        Self {
            center_id: center.center_id().to_string(),
            name: center.name().to_string(),
            timezone: center.timezone().to_string(),
            catalog: center.catalog().map(SlotCatalogInfo::from),
        }
    }
}

/// API response listing all service centers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListCentersResponse {
    pub centers: Vec<CenterInfo>,
}

/// A bookable slot with its derived status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SlotInfo {
    /// Slot start time.
    pub time: String,
    pub capacity: u32,
    pub booked_count: u32,
    /// Seats still free.
    pub remaining: u32,
    /// `available`, `few` or `full`.
    pub status: String,
}

impl From<&TimeSlot> for SlotInfo {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            time: format_slot_time(slot.time),
            capacity: slot.capacity,
            booked_count: slot.booked_count,
            remaining: slot.remaining(),
            status: slot.status().as_str().to_string(),
        }
    }
}

/// API response for a slot listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListSlotsResponse {
    pub center_id: String,
    pub date: String,
    /// Slots starting before noon, ascending.
    pub morning: Vec<SlotInfo>,
    /// Slots starting at or after noon, ascending.
    pub afternoon: Vec<SlotInfo>,
}

/// API request to register a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterVehicleRequest {
    /// The vehicle identifier (e.g. a plate).
    pub vehicle_id: String,
    /// Current odometer reading in kilometers.
    pub odometer_km: i64,
    /// Date of the last completed service, if known.
    #[serde(default)]
    pub last_service_date: Option<String>,
}

/// API request to record a completed service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordServiceRequest {
    /// Odometer reading at the service.
    pub odometer_km: i64,
    /// Date the service was completed.
    pub service_date: String,
}

/// A vehicle's stored service position.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VehicleInfo {
    pub vehicle_id: String,
    pub odometer_km: u32,
    pub last_service_date: Option<String>,
    pub updated_at: String,
}

impl From<&VehicleRecord> for VehicleInfo {
    fn from(record: &VehicleRecord) -> Self {
        Self {
            vehicle_id: record.vehicle_id.to_string(),
            odometer_km: record.state.odometer_km(),
            last_service_date: record.state.last_service_date().map(|d| d.to_string()),
            updated_at: record.updated_at.clone(),
        }
    }
}

/// The next maintenance point, flattened for JSON clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NextDueInfo {
    /// `distance` or `time`.
    pub basis: String,
    pub odometer_km: Option<u64>,
    pub km_remaining: Option<u64>,
    pub date: Option<String>,
    pub months_remaining: Option<u32>,
}

impl From<&NextDue> for NextDueInfo {
    fn from(next_due: &NextDue) -> Self {
        match *next_due {
            NextDue::Distance {
                odometer_km,
                km_remaining,
            } => Self {
                basis: String::from("distance"),
                odometer_km: Some(odometer_km),
                km_remaining: Some(km_remaining),
                date: None,
                months_remaining: None,
            },
            NextDue::Time {
                date,
                months_remaining,
            } => Self {
                basis: String::from("time"),
                odometer_km: None,
                km_remaining: None,
                date: Some(date.to_string()),
                months_remaining: Some(months_remaining),
            },
        }
    }
}

/// API response for a due evaluation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DueStatusResponse {
    pub vehicle_id: String,
    /// The date the evaluation was made for.
    pub as_of: String,
    pub interval_level: u32,
    pub is_due: bool,
    pub is_overdue: bool,
    pub months_elapsed: Option<u32>,
    pub km_overdue: Option<i64>,
    pub months_overdue: Option<i64>,
    pub km_remaining_to_next: u64,
    pub months_remaining_to_next: Option<u32>,
    pub next_due: NextDueInfo,
    /// Package matching the interval level; absent when not due.
    pub suggested_package: Option<String>,
}

impl DueStatusResponse {
    pub(crate) fn new(
        vehicle_id: String,
        as_of: String,
        status: &DueStatus,
        suggested_package: Option<String>,
    ) -> Self {
        Self {
            vehicle_id,
            as_of,
            interval_level: status.interval_level,
            is_due: status.is_due,
            is_overdue: status.is_overdue,
            months_elapsed: status.months_elapsed,
            km_overdue: status.km_overdue,
            months_overdue: status.months_overdue,
            km_remaining_to_next: status.km_remaining_to_next,
            months_remaining_to_next: status.months_remaining_to_next,
            next_due: NextDueInfo::from(&status.next_due),
            suggested_package,
        }
    }
}

/// API request to reserve a slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateReservationRequest {
    pub vehicle_id: String,
    pub center_id: String,
    pub date: String,
    pub time: String,
    /// `basic`, `intermediate` or `major`.
    #[serde(default)]
    pub package: Option<String>,
    /// Extra service codes.
    #[serde(default)]
    pub extras: Vec<String>,
    /// Client key that makes retries safe.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// A persisted booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingInfo {
    pub booking_id: i64,
    pub vehicle_id: String,
    pub center_id: String,
    pub date: String,
    pub time: String,
    pub package: Option<String>,
    pub extras: Vec<String>,
    pub idempotency_key: Option<String>,
    pub created_at: String,
}

impl From<&Booking> for BookingInfo {
    fn from(booking: &Booking) -> Self {
        let request = &booking.request;
        Self {
            booking_id: booking.booking_id,
            vehicle_id: request.vehicle_id.to_string(),
            center_id: request.center_id.to_string(),
            date: request.date.to_string(),
            time: format_slot_time(request.time),
            package: request
                .service_selection
                .package
                .map(|p| p.as_str().to_string()),
            extras: request.service_selection.extras.clone(),
            idempotency_key: request.idempotency_key.clone(),
            created_at: booking.created_at.clone(),
        }
    }
}

/// API response for a reservation attempt.
///
/// `outcome` is `reserved` with a booking, or `rejected` with a reason
/// (`FULL` or `DATE_IN_PAST`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReservationResponse {
    pub outcome: String,
    pub reason: Option<String>,
    pub booking: Option<BookingInfo>,
    /// Whether the booking was returned from an earlier request with the
    /// same idempotency key.
    pub replayed: bool,
}

impl ReservationResponse {
    /// Builds the response for a stored booking.
    #[must_use]
    pub fn reserved(booking: &Booking, replayed: bool) -> Self {
        Self {
            outcome: String::from("reserved"),
            reason: None,
            booking: Some(BookingInfo::from(booking)),
            replayed,
        }
    }

    /// Builds the response for a turned-down reservation.
    #[must_use]
    pub fn rejected(reason: RejectionReason) -> Self {
        Self {
            outcome: String::from("rejected"),
            reason: Some(reason.as_str().to_string()),
            booking: None,
            replayed: false,
        }
    }

    /// Whether a seat is held by the returned booking.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        self.booking.is_some()
    }
}
