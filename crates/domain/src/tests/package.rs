// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DueStatus, MaintenanceDueEvaluator, ServicePackage, VehicleServiceState,
    suggest_service_package,
};
use std::str::FromStr;
use time::macros::date;

fn status_at(odometer_km: i64) -> DueStatus {
    let state: VehicleServiceState = VehicleServiceState::new(odometer_km, None).unwrap();
    MaintenanceDueEvaluator::default()
        .evaluate(&state, date!(2026 - 10 - 19))
        .unwrap()
}

#[test]
fn test_no_package_when_not_due() {
    assert_eq!(suggest_service_package(&status_at(999)), None);
}

#[test]
fn test_package_escalates_with_level() {
    assert_eq!(
        suggest_service_package(&status_at(1000)),
        Some(ServicePackage::Basic)
    );
    assert_eq!(
        suggest_service_package(&status_at(2000)),
        Some(ServicePackage::Intermediate)
    );
    assert_eq!(
        suggest_service_package(&status_at(3000)),
        Some(ServicePackage::Basic)
    );
    assert_eq!(
        suggest_service_package(&status_at(4000)),
        Some(ServicePackage::Major)
    );
    assert_eq!(
        suggest_service_package(&status_at(6500)),
        Some(ServicePackage::Intermediate)
    );
}

#[test]
fn test_package_parse_case_insensitive() {
    assert_eq!(
        ServicePackage::from_str("MAJOR").unwrap(),
        ServicePackage::Major
    );
    assert_eq!(
        ServicePackage::from_str("basic").unwrap(),
        ServicePackage::Basic
    );
    assert!(ServicePackage::from_str("platinum").is_err());
}

#[test]
fn test_package_display() {
    assert_eq!(ServicePackage::Intermediate.to_string(), "intermediate");
}
