// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-memory store used to exercise the allocator.
//!
//! Handles are cheap to clone and share their state, so several threads can
//! reserve against the same slots. Seats are taken with a compare-exchange
//! loop on a per-slot atomic counter.

use crate::{Booking, BookingRequest, BookingSink, ReservationRequest, SlotStore, VehicleSource};
use servicebay_domain::{
    CenterId, ServiceCenter, ServiceSelection, SlotCatalog, TimeSlot, VehicleId,
    VehicleServiceState,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use time::macros::{date, datetime, time};
use time::{Date, OffsetDateTime, Time};

/// "Today" for every test, in UTC.
pub const NOW: OffsetDateTime = datetime!(2026-10-19 10:00 UTC);
pub const TODAY: Date = date!(2026 - 10 - 19);
pub const TOMORROW: Date = date!(2026 - 10 - 20);
pub const YESTERDAY: Date = date!(2026 - 10 - 18);

type SlotKey = (CenterId, Date, Time);

struct StoredSlot {
    capacity: u32,
    booked_count: AtomicU32,
}

#[derive(Default)]
struct Shared {
    centers: Mutex<HashMap<CenterId, ServiceCenter>>,
    vehicles: Mutex<HashMap<VehicleId, VehicleServiceState>>,
    slots: Mutex<HashMap<SlotKey, Arc<StoredSlot>>>,
    bookings: Mutex<Vec<Booking>>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    shared: Arc<Shared>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_center(&self, center: ServiceCenter) {
        self.shared
            .centers
            .lock()
            .unwrap()
            .insert(center.center_id().clone(), center);
    }

    pub fn add_vehicle(&self, vehicle_id: &str, odometer_km: i64, last_service: Option<Date>) {
        let state: VehicleServiceState =
            VehicleServiceState::new(odometer_km, last_service).unwrap();
        self.shared
            .vehicles
            .lock()
            .unwrap()
            .insert(VehicleId::new(vehicle_id), state);
    }

    /// Seeds a slot directly, bypassing the allocator.
    pub fn seed_slot(&self, center_id: &str, date: Date, time: Time, capacity: u32, booked: u32) {
        self.shared.slots.lock().unwrap().insert(
            (CenterId::new(center_id), date, time),
            Arc::new(StoredSlot {
                capacity,
                booked_count: AtomicU32::new(booked),
            }),
        );
    }

    pub fn booked_count(&self, center_id: &str, date: Date, time: Time) -> Option<u32> {
        self.shared
            .slots
            .lock()
            .unwrap()
            .get(&(CenterId::new(center_id), date, time))
            .map(|slot| slot.booked_count.load(Ordering::SeqCst))
    }

    pub fn slot_count(&self) -> usize {
        self.shared.slots.lock().unwrap().len()
    }

    pub fn booking_count(&self) -> usize {
        self.shared.bookings.lock().unwrap().len()
    }
}

impl VehicleSource for InMemoryStore {
    type Error = String;

    fn vehicle_service_state(
        &mut self,
        vehicle_id: &VehicleId,
    ) -> Result<Option<VehicleServiceState>, Self::Error> {
        Ok(self.shared.vehicles.lock().unwrap().get(vehicle_id).copied())
    }
}

impl SlotStore for InMemoryStore {
    type Error = String;

    fn service_center(
        &mut self,
        center_id: &CenterId,
    ) -> Result<Option<ServiceCenter>, Self::Error> {
        Ok(self.shared.centers.lock().unwrap().get(center_id).cloned())
    }

    fn get_slots(
        &mut self,
        center_id: &CenterId,
        date: Date,
    ) -> Result<Vec<TimeSlot>, Self::Error> {
        let slots = self.shared.slots.lock().unwrap();
        Ok(slots
            .iter()
            .filter(|((c, d, _), _)| c == center_id && *d == date)
            .map(|((c, d, t), slot)| TimeSlot {
                center_id: c.clone(),
                date: *d,
                time: *t,
                capacity: slot.capacity,
                booked_count: slot.booked_count.load(Ordering::SeqCst),
            })
            .collect())
    }

    fn get_or_create_slots(
        &mut self,
        center_id: &CenterId,
        date: Date,
        times: &[Time],
        capacity: u32,
    ) -> Result<(), Self::Error> {
        let mut slots = self.shared.slots.lock().unwrap();
        for time in times {
            slots
                .entry((center_id.clone(), date, *time))
                .or_insert_with(|| {
                    Arc::new(StoredSlot {
                        capacity,
                        booked_count: AtomicU32::new(0),
                    })
                });
        }
        Ok(())
    }

    fn try_increment_booked(
        &mut self,
        center_id: &CenterId,
        date: Date,
        time: Time,
    ) -> Result<bool, Self::Error> {
        let Some(slot) = self
            .shared
            .slots
            .lock()
            .unwrap()
            .get(&(center_id.clone(), date, time))
            .cloned()
        else {
            return Ok(false);
        };

        // The map lock is released here; only the slot's own counter guards
        // the seat.
        let mut current: u32 = slot.booked_count.load(Ordering::SeqCst);
        loop {
            if current >= slot.capacity {
                return Ok(false);
            }
            match slot.booked_count.compare_exchange(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(true),
                Err(actual) => current = actual,
            }
        }
    }
}

impl BookingSink for InMemoryStore {
    type Error = String;

    fn submit(&mut self, request: &BookingRequest) -> Result<Booking, Self::Error> {
        let mut bookings = self.shared.bookings.lock().unwrap();
        let booking: Booking = Booking {
            booking_id: i64::try_from(bookings.len()).unwrap() + 1,
            request: request.clone(),
            created_at: String::from("2026-10-19T10:00:00Z"),
        };
        bookings.push(booking.clone());
        Ok(booking)
    }

    fn find_by_idempotency_key(&mut self, key: &str) -> Result<Option<Booking>, Self::Error> {
        Ok(self
            .shared
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.request.idempotency_key.as_deref() == Some(key))
            .cloned())
    }
}

/// 08:00 to 17:00 every 30 minutes, 12 seats per slot.
pub fn create_test_catalog() -> SlotCatalog {
    SlotCatalog::new(time!(08:00), time!(17:00), 30, 12).unwrap()
}

pub fn create_test_center(center_id: &str, catalog: Option<SlotCatalog>) -> ServiceCenter {
    ServiceCenter::new(CenterId::new(center_id), "North Garage", "UTC", catalog).unwrap()
}

/// A store with center `north` (full-day catalog) and vehicle `ABC-123`.
pub fn create_test_store() -> InMemoryStore {
    let store: InMemoryStore = InMemoryStore::new();
    store.add_center(create_test_center("north", Some(create_test_catalog())));
    store.add_vehicle("ABC-123", 12_000, Some(date!(2026 - 03 - 01)));
    store
}

pub fn create_test_request(date: Date, time: Time) -> ReservationRequest {
    ReservationRequest {
        vehicle_id: VehicleId::new("ABC-123"),
        center_id: CenterId::new("north"),
        date,
        time,
        service_selection: ServiceSelection::default(),
        idempotency_key: None,
    }
}
