// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler validates raw request input, runs the domain and core
//! operations against the persistence layer, and shapes the result into a
//! response DTO. Handlers are synchronous; the server decides how access to
//! `Persistence` is serialized.

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::input::{parse_service_selection, validate_idempotency_key};
use crate::request_response::{
    BookingInfo, CenterInfo, CreateCenterRequest, CreateReservationRequest, DueStatusResponse,
    ListCentersResponse, ListSlotsResponse, RecordServiceRequest, RegisterVehicleRequest,
    ReservationResponse, SlotCatalogInput, SlotInfo, VehicleInfo,
};
use servicebay::{
    Booking, BookingSink, ReservationRequest, ReserveOutcome, SlotAllocator, submit_booking,
};
use servicebay_domain::{
    CenterId, DEFAULT_SLOT_CAPACITY, DEFAULT_STEP_MINUTES, DaySlots, DomainError, DueStatus,
    MaintenanceDueEvaluator, ServiceCenter, ServiceSelection, SlotCatalog, VehicleId,
    VehicleServiceState, parse_date, parse_slot_time, suggest_service_package,
};
use servicebay_persistence::{Persistence, VehicleRecord};
use time::{Date, OffsetDateTime, Time, UtcOffset};
use tracing::{debug, info};

/// Builds a slot catalog from request input, applying the defaults for
/// step and capacity.
fn build_catalog(input: &SlotCatalogInput) -> Result<SlotCatalog, ApiError> {
    let opens_at: Time =
        parse_slot_time(&input.opens_at).map_err(|e| field_error("catalog.opens_at", &e))?;
    let closes_at: Time =
        parse_slot_time(&input.closes_at).map_err(|e| field_error("catalog.closes_at", &e))?;

    SlotCatalog::new(
        opens_at,
        closes_at,
        input.step_minutes.unwrap_or(DEFAULT_STEP_MINUTES),
        input.capacity.unwrap_or(DEFAULT_SLOT_CAPACITY),
    )
    .map_err(translate_domain_error)
}

/// Reports a domain parse error against a specific request field.
fn field_error(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Parses a date and reports failures against the given field.
fn parse_date_field(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_date(value).map_err(|e| field_error(field, &e))
}

/// Loads a vehicle or fails with `ResourceNotFound`.
fn require_vehicle(
    persistence: &mut Persistence,
    vehicle_id: &VehicleId,
) -> Result<VehicleRecord, ApiError> {
    persistence
        .get_vehicle(vehicle_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Vehicle"),
            message: format!("Vehicle '{vehicle_id}' does not exist"),
        })
}

/// Creates a service center.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The center to create
///
/// # Returns
///
/// The stored center.
///
/// # Errors
///
/// Returns an error if:
/// - The id, name, timezone or catalog is invalid
/// - A center with the same id already exists
/// - The store fails
pub fn create_center(
    persistence: &mut Persistence,
    request: &CreateCenterRequest,
) -> Result<CenterInfo, ApiError> {
    let center_id: CenterId = CenterId::parse(&request.center_id).map_err(translate_domain_error)?;
    let catalog: Option<SlotCatalog> = request.catalog.as_ref().map(build_catalog).transpose()?;
    let center: ServiceCenter =
        ServiceCenter::new(center_id, &request.name, &request.timezone, catalog)
            .map_err(translate_domain_error)?;

    persistence.create_center(&center)?;

    info!(
        center_id = %center.center_id(),
        timezone = center.timezone(),
        bookable = center.catalog().is_some(),
        "Created service center"
    );

    Ok(CenterInfo::from(&center))
}

/// Lists all service centers, ordered by id.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_centers(persistence: &mut Persistence) -> Result<ListCentersResponse, ApiError> {
    let centers: Vec<ServiceCenter> = persistence.list_centers()?;

    Ok(ListCentersResponse {
        centers: centers.iter().map(CenterInfo::from).collect(),
    })
}

/// Lists the bookable slots of a center for one date.
///
/// Slots are materialized on first listing. Dates before the center-local
/// current date yield an empty listing.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `center_id` - The service center
/// * `date` - The requested date (`YYYY-MM-DD`)
/// * `now` - The current instant
///
/// # Errors
///
/// Returns an error if:
/// - The center id or date is malformed
/// - The center does not exist
/// - The store fails
pub fn list_slots(
    persistence: &mut Persistence,
    center_id: &str,
    date: &str,
    now: OffsetDateTime,
) -> Result<ListSlotsResponse, ApiError> {
    let center_id: CenterId = CenterId::parse(center_id).map_err(translate_domain_error)?;
    let date: Date = parse_date_field("date", date)?;

    let slots: DaySlots = SlotAllocator::new(persistence)
        .list_slots(&center_id, date, now)
        .map_err(translate_core_error)?;

    debug!(center_id = %center_id, %date, slots = slots.len(), "Listed slots");

    Ok(ListSlotsResponse {
        center_id: center_id.to_string(),
        date: date.to_string(),
        morning: slots.morning.iter().map(SlotInfo::from).collect(),
        afternoon: slots.afternoon.iter().map(SlotInfo::from).collect(),
    })
}

/// Registers a vehicle with its current service position.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The vehicle to register
/// * `now` - The current instant; the last service date may not lie after it
///
/// # Errors
///
/// Returns an error if:
/// - The id, odometer or date is invalid
/// - The last service date lies in the future
/// - The vehicle is already registered
/// - The store fails
pub fn register_vehicle(
    persistence: &mut Persistence,
    request: &RegisterVehicleRequest,
    now: OffsetDateTime,
) -> Result<VehicleInfo, ApiError> {
    let vehicle_id: VehicleId =
        VehicleId::parse(&request.vehicle_id).map_err(translate_domain_error)?;
    let last_service_date: Option<Date> = request
        .last_service_date
        .as_deref()
        .map(|d| parse_date_field("last_service_date", d))
        .transpose()?;

    if let Some(service_date) = last_service_date {
        ensure_not_in_future(service_date, now)?;
    }

    let state: VehicleServiceState =
        VehicleServiceState::new(request.odometer_km, last_service_date)
            .map_err(translate_domain_error)?;

    persistence.register_vehicle(&vehicle_id, &state)?;

    info!(
        vehicle_id = %vehicle_id,
        odometer_km = state.odometer_km(),
        "Registered vehicle"
    );

    let record: VehicleRecord = require_vehicle(persistence, &vehicle_id)?;
    Ok(VehicleInfo::from(&record))
}

/// Retrieves a vehicle's stored service position.
///
/// # Errors
///
/// Returns an error if the id is malformed, the vehicle does not exist, or
/// the store fails.
pub fn get_vehicle(
    persistence: &mut Persistence,
    vehicle_id: &str,
) -> Result<VehicleInfo, ApiError> {
    let vehicle_id: VehicleId = VehicleId::parse(vehicle_id).map_err(translate_domain_error)?;
    let record: VehicleRecord = require_vehicle(persistence, &vehicle_id)?;
    Ok(VehicleInfo::from(&record))
}

/// Records a completed service.
///
/// The new reading and date replace the stored position. Neither may move
/// backwards.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `vehicle_id` - The serviced vehicle
/// * `request` - Odometer reading and service date
/// * `now` - The current instant; the service date may not lie after it
///
/// # Errors
///
/// Returns an error if:
/// - The input is malformed or the service date is in the future
/// - The vehicle does not exist
/// - The reading is below the stored odometer
/// - The date is before the stored last service date
/// - The store fails
pub fn record_service(
    persistence: &mut Persistence,
    vehicle_id: &str,
    request: &RecordServiceRequest,
    now: OffsetDateTime,
) -> Result<VehicleInfo, ApiError> {
    let vehicle_id: VehicleId = VehicleId::parse(vehicle_id).map_err(translate_domain_error)?;
    let service_date: Date = parse_date_field("service_date", &request.service_date)?;
    ensure_not_in_future(service_date, now)?;
    let state: VehicleServiceState =
        VehicleServiceState::new(request.odometer_km, Some(service_date))
            .map_err(translate_domain_error)?;

    let current: VehicleRecord = require_vehicle(persistence, &vehicle_id)?;

    if state.odometer_km() < current.state.odometer_km() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("odometer_not_decreasing"),
            message: format!(
                "Odometer reading {} km is below the recorded {} km",
                state.odometer_km(),
                current.state.odometer_km()
            ),
        });
    }
    if let Some(previous) = current.state.last_service_date()
        && service_date < previous
    {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("service_date_not_earlier"),
            message: format!(
                "Service date {service_date} is before the recorded last service on {previous}"
            ),
        });
    }

    persistence.record_service(&vehicle_id, &state)?;

    info!(
        vehicle_id = %vehicle_id,
        odometer_km = state.odometer_km(),
        %service_date,
        "Recorded service"
    );

    let record: VehicleRecord = require_vehicle(persistence, &vehicle_id)?;
    Ok(VehicleInfo::from(&record))
}

/// Evaluates whether a vehicle is due for maintenance.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `evaluator` - The configured due evaluator
/// * `vehicle_id` - The vehicle to evaluate
/// * `as_of` - Evaluation date (`YYYY-MM-DD`); today (UTC) when absent
/// * `now` - The current instant
///
/// # Returns
///
/// The due status together with the suggested service package.
///
/// # Errors
///
/// Returns an error if:
/// - The id or date is malformed
/// - The vehicle does not exist
/// - The last service date is after `as_of`
/// - The store fails
pub fn get_due_status(
    persistence: &mut Persistence,
    evaluator: &MaintenanceDueEvaluator,
    vehicle_id: &str,
    as_of: Option<&str>,
    now: OffsetDateTime,
) -> Result<DueStatusResponse, ApiError> {
    let vehicle_id: VehicleId = VehicleId::parse(vehicle_id).map_err(translate_domain_error)?;
    let as_of: Date = match as_of {
        Some(value) => parse_date_field("as_of", value)?,
        None => utc_date(now),
    };

    let record: VehicleRecord = require_vehicle(persistence, &vehicle_id)?;
    let status: DueStatus = evaluator
        .evaluate(&record.state, as_of)
        .map_err(translate_domain_error)?;
    let suggested_package: Option<String> =
        suggest_service_package(&status).map(|p| p.as_str().to_string());

    debug!(
        vehicle_id = %vehicle_id,
        %as_of,
        interval_level = status.interval_level,
        is_overdue = status.is_overdue,
        "Evaluated due status"
    );

    Ok(DueStatusResponse::new(
        vehicle_id.to_string(),
        as_of.to_string(),
        &status,
        suggested_package,
    ))
}

/// Reserves a seat in a slot and persists the booking.
///
/// Reservation and submission run in one transaction: a failed submission
/// releases the seat. A request whose idempotency key was already used
/// returns the stored booking without taking another seat.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The reservation attempt
/// * `now` - The current instant
///
/// # Returns
///
/// A `reserved` response with the booking, or a `rejected` response with
/// the reason (`FULL`, `DATE_IN_PAST`).
///
/// # Errors
///
/// Returns an error if:
/// - The input is malformed
/// - The center, vehicle or slot does not exist
/// - The store fails
pub fn create_reservation(
    persistence: &mut Persistence,
    request: &CreateReservationRequest,
    now: OffsetDateTime,
) -> Result<ReservationResponse, ApiError> {
    let reservation: ReservationRequest = parse_reservation(request)?;

    let response: ReservationResponse = persistence.transaction(|p| -> Result<_, ApiError> {
        if let Some(key) = reservation.idempotency_key.as_deref()
            && let Some(existing) = p.find_by_idempotency_key(key)?
        {
            info!(
                booking_id = existing.booking_id,
                idempotency_key = key,
                "Replayed reservation"
            );
            return Ok(ReservationResponse::reserved(&existing, true));
        }

        let outcome: ReserveOutcome = SlotAllocator::new(p)
            .reserve(reservation, now)
            .map_err(translate_core_error)?;

        match outcome {
            ReserveOutcome::Reserved(booking_request) => {
                let (booking, replayed) =
                    submit_booking(p, &booking_request).map_err(translate_core_error)?;
                info!(
                    booking_id = booking.booking_id,
                    center_id = %booking.request.center_id,
                    vehicle_id = %booking.request.vehicle_id,
                    date = %booking.request.date,
                    "Reserved slot"
                );
                Ok(ReservationResponse::reserved(&booking, replayed))
            }
            ReserveOutcome::Rejected { reason } => {
                info!(%reason, "Reservation rejected");
                Ok(ReservationResponse::rejected(reason))
            }
        }
    })?;

    Ok(response)
}

/// Parses a reservation request into its domain form.
fn parse_reservation(request: &CreateReservationRequest) -> Result<ReservationRequest, ApiError> {
    let vehicle_id: VehicleId =
        VehicleId::parse(&request.vehicle_id).map_err(translate_domain_error)?;
    let center_id: CenterId = CenterId::parse(&request.center_id).map_err(translate_domain_error)?;
    let date: Date = parse_date_field("date", &request.date)?;
    let time: Time = parse_slot_time(&request.time).map_err(|e| field_error("time", &e))?;
    let service_selection: ServiceSelection =
        parse_service_selection(request.package.as_deref(), &request.extras)?;
    let idempotency_key: Option<String> =
        validate_idempotency_key(request.idempotency_key.as_deref())?;

    Ok(ReservationRequest {
        vehicle_id,
        center_id,
        date,
        time,
        service_selection,
        idempotency_key,
    })
}

/// Retrieves a persisted booking.
///
/// # Errors
///
/// Returns an error if the booking does not exist or the store fails.
pub fn get_booking(
    persistence: &mut Persistence,
    booking_id: i64,
) -> Result<BookingInfo, ApiError> {
    let booking: Booking = persistence.get_booking(booking_id)?;
    Ok(BookingInfo::from(&booking))
}

/// Rejects dates after the current UTC date.
fn ensure_not_in_future(date: Date, now: OffsetDateTime) -> Result<(), ApiError> {
    let today: Date = utc_date(now);
    if date > today {
        return Err(translate_domain_error(DomainError::ServiceDateInFuture {
            last_service_date: date,
            as_of: today,
        }));
    }
    Ok(())
}

const fn utc_date(now: OffsetDateTime) -> Date {
    now.to_offset(UtcOffset::UTC).date()
}
