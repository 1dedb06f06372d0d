// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::create_seeded_persistence;
use crate::{Persistence, PersistenceError, VehicleRecord};
use servicebay::VehicleSource;
use servicebay_domain::{VehicleId, VehicleServiceState};
use time::macros::date;

#[test]
fn test_registered_vehicle_is_readable() {
    let mut persistence: Persistence = create_seeded_persistence();

    let record: VehicleRecord = persistence
        .get_vehicle(&VehicleId::new("abc-123"))
        .unwrap()
        .unwrap();

    assert_eq!(record.vehicle_id.value(), "ABC-123");
    assert_eq!(record.state.odometer_km(), 12_000);
    assert_eq!(record.state.last_service_date(), Some(date!(2026 - 03 - 01)));
}

#[test]
fn test_vehicle_without_service_history() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let state: VehicleServiceState = VehicleServiceState::new(0, None).unwrap();
    persistence
        .register_vehicle(&VehicleId::new("NEW-1"), &state)
        .unwrap();

    let read: Option<VehicleServiceState> = persistence
        .vehicle_service_state(&VehicleId::new("NEW-1"))
        .unwrap();

    assert_eq!(read, Some(state));
}

#[test]
fn test_duplicate_vehicle_rejected() {
    let mut persistence: Persistence = create_seeded_persistence();

    let result = persistence.register_vehicle(
        &VehicleId::new("ABC-123"),
        &VehicleServiceState::new(10, None).unwrap(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::DuplicateVehicle(String::from("ABC-123")))
    );
}

#[test]
fn test_record_service_replaces_position() {
    let mut persistence: Persistence = create_seeded_persistence();
    let serviced: VehicleServiceState =
        VehicleServiceState::new(12_450, Some(date!(2026 - 10 - 18))).unwrap();

    persistence
        .record_service(&VehicleId::new("ABC-123"), &serviced)
        .unwrap();

    let read: Option<VehicleServiceState> = persistence
        .vehicle_service_state(&VehicleId::new("ABC-123"))
        .unwrap();
    assert_eq!(read, Some(serviced));
}

#[test]
fn test_record_service_unknown_vehicle() {
    let mut persistence: Persistence = create_seeded_persistence();

    let result = persistence.record_service(
        &VehicleId::new("ZZZ-999"),
        &VehicleServiceState::new(10, Some(date!(2026 - 10 - 18))).unwrap(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::VehicleNotFound(String::from("ZZZ-999")))
    );
}

#[test]
fn test_unknown_vehicle_is_none() {
    let mut persistence: Persistence = create_seeded_persistence();

    assert_eq!(
        persistence
            .vehicle_service_state(&VehicleId::new("ZZZ-999"))
            .unwrap(),
        None
    );
}
