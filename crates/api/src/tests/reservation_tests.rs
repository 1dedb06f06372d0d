// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    NOW, TOMORROW, YESTERDAY, create_center_request, create_reservation_request,
    create_test_persistence,
};
use crate::{
    ApiError, BookingInfo, CreateCenterRequest, CreateReservationRequest, ListSlotsResponse,
    ReservationResponse, create_center, create_reservation, get_booking, list_slots,
};
use servicebay_persistence::Persistence;

fn booked(persistence: &mut Persistence, time: &str) -> u32 {
    let listing: ListSlotsResponse = list_slots(persistence, "north", TOMORROW, NOW).unwrap();
    listing
        .morning
        .iter()
        .chain(listing.afternoon.iter())
        .find(|slot| slot.time == time)
        .map(|slot| slot.booked_count)
        .unwrap()
}

#[test]
fn test_reservation_creates_booking() {
    let mut persistence: Persistence = create_test_persistence(2);

    let response: ReservationResponse = create_reservation(
        &mut persistence,
        &create_reservation_request("09:30", None),
        NOW,
    )
    .unwrap();

    assert_eq!(response.outcome, "reserved");
    assert!(response.is_reserved());
    assert!(!response.replayed);
    let booking: BookingInfo = response.booking.unwrap();
    assert_eq!(booking.vehicle_id, "ABC-123");
    assert_eq!(booking.center_id, "NORTH");
    assert_eq!(booking.date, TOMORROW);
    assert_eq!(booking.time, "09:30");
    assert_eq!(booking.package.as_deref(), Some("basic"));
    assert_eq!(booking.extras, vec![String::from("wipers")]);
    assert_eq!(booked(&mut persistence, "09:30"), 1);

    let stored: BookingInfo = get_booking(&mut persistence, booking.booking_id).unwrap();
    assert_eq!(stored, booking);
}

#[test]
fn test_full_slot_is_rejected() {
    let mut persistence: Persistence = create_test_persistence(2);
    for _ in 0..2 {
        create_reservation(
            &mut persistence,
            &create_reservation_request("13:00", None),
            NOW,
        )
        .unwrap();
    }

    let response: ReservationResponse = create_reservation(
        &mut persistence,
        &create_reservation_request("13:00", None),
        NOW,
    )
    .unwrap();

    assert_eq!(response.outcome, "rejected");
    assert_eq!(response.reason.as_deref(), Some("FULL"));
    assert!(response.booking.is_none());
    assert_eq!(booked(&mut persistence, "13:00"), 2);
}

#[test]
fn test_past_date_is_rejected() {
    let mut persistence: Persistence = create_test_persistence(2);
    let request: CreateReservationRequest = CreateReservationRequest {
        date: YESTERDAY.to_string(),
        ..create_reservation_request("09:00", None)
    };

    let response: ReservationResponse =
        create_reservation(&mut persistence, &request, NOW).unwrap();

    assert_eq!(response.reason.as_deref(), Some("DATE_IN_PAST"));
}

#[test]
fn test_idempotency_key_replays_booking() {
    let mut persistence: Persistence = create_test_persistence(2);
    let request: CreateReservationRequest = create_reservation_request("10:00", Some("order-17"));

    let first: ReservationResponse = create_reservation(&mut persistence, &request, NOW).unwrap();
    let second: ReservationResponse = create_reservation(&mut persistence, &request, NOW).unwrap();

    assert!(!first.replayed);
    assert!(second.replayed);
    assert_eq!(
        first.booking.unwrap().booking_id,
        second.booking.unwrap().booking_id
    );
    assert_eq!(booked(&mut persistence, "10:00"), 1);
}

#[test]
fn test_replay_succeeds_on_full_slot() {
    let mut persistence: Persistence = create_test_persistence(2);
    let keyed: CreateReservationRequest = create_reservation_request("10:00", Some("order-17"));
    create_reservation(&mut persistence, &keyed, NOW).unwrap();
    create_reservation(
        &mut persistence,
        &create_reservation_request("10:00", None),
        NOW,
    )
    .unwrap();

    let retry: ReservationResponse = create_reservation(&mut persistence, &keyed, NOW).unwrap();

    assert!(retry.is_reserved());
    assert!(retry.replayed);
    assert_eq!(booked(&mut persistence, "10:00"), 2);
}

#[test]
fn test_unknown_center_vehicle_and_slot() {
    let mut persistence: Persistence = create_test_persistence(2);

    let unknown_center: CreateReservationRequest = CreateReservationRequest {
        center_id: String::from("south"),
        ..create_reservation_request("09:00", None)
    };
    let unknown_vehicle: CreateReservationRequest = CreateReservationRequest {
        vehicle_id: String::from("ZZZ-999"),
        ..create_reservation_request("09:00", None)
    };
    let off_grid: CreateReservationRequest = create_reservation_request("09:15", None);

    for (request, expected) in [
        (unknown_center, "Service center"),
        (unknown_vehicle, "Vehicle"),
        (off_grid, "Slot"),
    ] {
        let result = create_reservation(&mut persistence, &request, NOW);
        assert!(
            matches!(
                result,
                Err(ApiError::ResourceNotFound { ref resource_type, .. })
                    if resource_type == expected
            ),
            "expected {expected} not found, got {result:?}"
        );
    }
}

#[test]
fn test_center_without_catalog_has_no_slots() {
    let mut persistence: Persistence = create_test_persistence(2);
    let depot: CreateCenterRequest = CreateCenterRequest {
        catalog: None,
        ..create_center_request("depot", None)
    };
    create_center(&mut persistence, &depot).unwrap();
    let request: CreateReservationRequest = CreateReservationRequest {
        center_id: String::from("depot"),
        ..create_reservation_request("09:00", None)
    };

    let result = create_reservation(&mut persistence, &request, NOW);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_malformed_input_is_rejected_before_reserving() {
    let mut persistence: Persistence = create_test_persistence(2);
    let bad_time: CreateReservationRequest = create_reservation_request("9.30", None);
    let bad_package: CreateReservationRequest = CreateReservationRequest {
        package: Some(String::from("platinum")),
        ..create_reservation_request("09:30", None)
    };
    let bad_key: CreateReservationRequest = create_reservation_request("09:30", Some(""));

    for (request, field) in [
        (bad_time, "time"),
        (bad_package, "package"),
        (bad_key, "idempotency_key"),
    ] {
        let result = create_reservation(&mut persistence, &request, NOW);
        assert!(
            matches!(result, Err(ApiError::InvalidInput { field: ref f, .. }) if f == field),
            "expected invalid {field}, got {result:?}"
        );
    }

    assert_eq!(booked(&mut persistence, "09:30"), 0);
}

#[test]
fn test_unknown_booking() {
    let mut persistence: Persistence = create_test_persistence(2);

    let result = get_booking(&mut persistence, 99);

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Booking"
    ));
}
