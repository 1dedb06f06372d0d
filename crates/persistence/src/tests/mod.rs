// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod slot_tests;
mod vehicle_tests;

use crate::Persistence;
use servicebay_domain::{CenterId, ServiceCenter, SlotCatalog, VehicleId, VehicleServiceState};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use time::macros::{date, datetime, time};
use time::{Date, OffsetDateTime};

pub const NOW: OffsetDateTime = datetime!(2026-10-19 10:00 UTC);
pub const TOMORROW: Date = date!(2026 - 10 - 20);

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 08:00 to 12:00 every 30 minutes with the given capacity.
pub fn create_test_catalog(capacity: u32) -> SlotCatalog {
    SlotCatalog::new(time!(08:00), time!(12:00), 30, capacity).unwrap()
}

pub fn create_test_center(center_id: &str, catalog: Option<SlotCatalog>) -> ServiceCenter {
    ServiceCenter::new(CenterId::new(center_id), "North Garage", "UTC", catalog).unwrap()
}

/// An in-memory store with center `north` (capacity 12) and vehicle `ABC-123`.
pub fn create_seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed(&mut persistence, 12);
    persistence
}

pub fn seed(persistence: &mut Persistence, capacity: u32) {
    persistence
        .create_center(&create_test_center("north", Some(create_test_catalog(capacity))))
        .unwrap();
    persistence
        .register_vehicle(
            &VehicleId::new("ABC-123"),
            &VehicleServiceState::new(12_000, Some(date!(2026 - 03 - 01))).unwrap(),
        )
        .unwrap();
}

/// A database file path unique to this test process and call.
pub struct TempDatabase {
    pub path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let id: u64 = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path: PathBuf = std::env::temp_dir().join(format!(
            "servicebay_test_{}_{id}.db",
            std::process::id()
        ));
        Self { path }
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}
