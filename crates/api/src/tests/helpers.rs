// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use servicebay_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    CreateCenterRequest, CreateReservationRequest, RegisterVehicleRequest, SlotCatalogInput,
    create_center, register_vehicle,
};

/// Monday morning in Berlin.
pub const NOW: OffsetDateTime = datetime!(2026-10-19 10:00 UTC);
pub const TODAY: &str = "2026-10-19";
pub const TOMORROW: &str = "2026-10-20";
pub const YESTERDAY: &str = "2026-10-18";

pub fn create_center_request(center_id: &str, capacity: Option<u32>) -> CreateCenterRequest {
    CreateCenterRequest {
        center_id: center_id.to_string(),
        name: String::from("North Workshop"),
        timezone: String::from("Europe/Berlin"),
        catalog: Some(SlotCatalogInput {
            opens_at: String::from("08:00"),
            closes_at: String::from("14:00"),
            step_minutes: None,
            capacity,
        }),
    }
}

pub fn create_vehicle_request(
    vehicle_id: &str,
    odometer_km: i64,
    last_service_date: Option<&str>,
) -> RegisterVehicleRequest {
    RegisterVehicleRequest {
        vehicle_id: vehicle_id.to_string(),
        odometer_km,
        last_service_date: last_service_date.map(String::from),
    }
}

pub fn create_reservation_request(time: &str, key: Option<&str>) -> CreateReservationRequest {
    CreateReservationRequest {
        vehicle_id: String::from("abc-123"),
        center_id: String::from("north"),
        date: TOMORROW.to_string(),
        time: time.to_string(),
        package: Some(String::from("basic")),
        extras: vec![String::from("Wipers")],
        idempotency_key: key.map(String::from),
    }
}

/// Persistence with center `NORTH` (08:00 to 14:00, given capacity) and
/// vehicle `ABC-123`.
pub fn create_test_persistence(capacity: u32) -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    create_center(
        &mut persistence,
        &create_center_request("north", Some(capacity)),
    )
    .unwrap();
    register_vehicle(
        &mut persistence,
        &create_vehicle_request("abc-123", 12_000, Some("2026-03-01")),
        NOW,
    )
    .unwrap();
    persistence
}
