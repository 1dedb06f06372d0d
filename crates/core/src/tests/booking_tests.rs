// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{InMemoryStore, NOW, TOMORROW, create_test_request, create_test_store};
use crate::{
    Booking, BookingRequest, RejectionReason, ReservationRequest, ReserveOutcome, SlotAllocator,
    submit_booking,
};
use servicebay_domain::{ServicePackage, ServiceSelection};
use time::macros::time;

fn reserve(store: &mut InMemoryStore, request: ReservationRequest) -> BookingRequest {
    match SlotAllocator::new(store).reserve(request, NOW).unwrap() {
        ReserveOutcome::Reserved(booking_request) => booking_request,
        ReserveOutcome::Rejected { reason } => panic!("unexpected rejection: {reason}"),
    }
}

#[test]
fn test_submit_stores_booking() {
    let mut store: InMemoryStore = create_test_store();
    let mut request: ReservationRequest = create_test_request(TOMORROW, time!(09:00));
    request.service_selection = ServiceSelection {
        package: Some(ServicePackage::Major),
        extras: vec![String::from("wiper-blades")],
    };

    let booking_request: BookingRequest = reserve(&mut store, request);
    let (booking, replayed): (Booking, bool) =
        submit_booking(&mut store, &booking_request).unwrap();

    assert!(!replayed);
    assert_eq!(booking.booking_id, 1);
    assert_eq!(booking.request, booking_request);
    assert_eq!(
        booking.request.service_selection.package,
        Some(ServicePackage::Major)
    );
    assert_eq!(store.booking_count(), 1);
}

#[test]
fn test_submit_replays_idempotency_key() {
    let mut store: InMemoryStore = create_test_store();
    let mut request: ReservationRequest = create_test_request(TOMORROW, time!(09:00));
    request.idempotency_key = Some(String::from("retry-1"));

    let booking_request: BookingRequest = reserve(&mut store, request);
    let (first, first_replayed) = submit_booking(&mut store, &booking_request).unwrap();
    let (second, second_replayed) = submit_booking(&mut store, &booking_request).unwrap();

    assert!(!first_replayed);
    assert!(second_replayed);
    assert_eq!(first, second);
    assert_eq!(store.booking_count(), 1);
}

#[test]
fn test_submit_without_key_always_creates() {
    let mut store: InMemoryStore = create_test_store();

    let booking_request: BookingRequest =
        reserve(&mut store, create_test_request(TOMORROW, time!(09:00)));
    submit_booking(&mut store, &booking_request).unwrap();
    submit_booking(&mut store, &booking_request).unwrap();

    assert_eq!(store.booking_count(), 2);
}

#[test]
fn test_rejection_reason_wire_names() {
    assert_eq!(RejectionReason::Full.as_str(), "FULL");
    assert_eq!(RejectionReason::DateInPast.to_string(), "DATE_IN_PAST");
}
