// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{NOW, TODAY, create_test_persistence, create_vehicle_request};
use crate::{
    ApiError, RecordServiceRequest, VehicleInfo, get_vehicle, record_service, register_vehicle,
};
use servicebay_persistence::Persistence;

fn service(odometer_km: i64, service_date: &str) -> RecordServiceRequest {
    RecordServiceRequest {
        odometer_km,
        service_date: service_date.to_string(),
    }
}

#[test]
fn test_register_and_get_vehicle() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let registered: VehicleInfo = register_vehicle(
        &mut persistence,
        &create_vehicle_request("xyz-9", 800, None),
        NOW,
    )
    .unwrap();
    let fetched: VehicleInfo = get_vehicle(&mut persistence, "XYZ-9").unwrap();

    assert_eq!(registered, fetched);
    assert_eq!(fetched.vehicle_id, "XYZ-9");
    assert_eq!(fetched.odometer_km, 800);
    assert_eq!(fetched.last_service_date, None);
}

#[test]
fn test_duplicate_vehicle_is_conflict() {
    let mut persistence: Persistence = create_test_persistence(12);

    let result = register_vehicle(
        &mut persistence,
        &create_vehicle_request("ABC-123", 1, None),
        NOW,
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_negative_odometer_is_invalid_input() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result = register_vehicle(
        &mut persistence,
        &create_vehicle_request("xyz-9", -5, None),
        NOW,
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "odometer_km"
    ));
}

#[test]
fn test_future_last_service_date_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result = register_vehicle(
        &mut persistence,
        &create_vehicle_request("xyz-9", 100, Some("2026-10-20")),
        NOW,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_unknown_vehicle_is_not_found() {
    let mut persistence: Persistence = create_test_persistence(12);

    let result = get_vehicle(&mut persistence, "ZZZ-999");

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Vehicle"
    ));
}

#[test]
fn test_record_service_updates_position() {
    let mut persistence: Persistence = create_test_persistence(12);

    let updated: VehicleInfo =
        record_service(&mut persistence, "abc-123", &service(12_480, TODAY), NOW).unwrap();

    assert_eq!(updated.odometer_km, 12_480);
    assert_eq!(updated.last_service_date.as_deref(), Some(TODAY));
}

#[test]
fn test_record_service_rejects_odometer_rollback() {
    let mut persistence: Persistence = create_test_persistence(12);

    let result = record_service(&mut persistence, "abc-123", &service(11_000, TODAY), NOW);

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "odometer_not_decreasing"
    ));
    assert_eq!(
        get_vehicle(&mut persistence, "abc-123").unwrap().odometer_km,
        12_000
    );
}

#[test]
fn test_record_service_rejects_earlier_date() {
    let mut persistence: Persistence = create_test_persistence(12);

    let result = record_service(
        &mut persistence,
        "abc-123",
        &service(12_500, "2026-02-01"),
        NOW,
    );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "service_date_not_earlier"
    ));
}

#[test]
fn test_record_service_rejects_future_date() {
    let mut persistence: Persistence = create_test_persistence(12);

    let result = record_service(
        &mut persistence,
        "abc-123",
        &service(12_500, "2026-10-21"),
        NOW,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_record_service_unknown_vehicle() {
    let mut persistence: Persistence = create_test_persistence(12);

    let result = record_service(&mut persistence, "ZZZ-999", &service(10, TODAY), NOW);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
