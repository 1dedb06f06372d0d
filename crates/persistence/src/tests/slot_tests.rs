// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::diesel_schema::time_slots;
use crate::tests::{NOW, TOMORROW, TempDatabase, create_seeded_persistence, seed};
use crate::{Persistence, PersistenceError};
use diesel::prelude::*;
use servicebay::{SlotAllocator, SlotStore};
use servicebay_domain::{CenterId, DaySlots, SlotStatus, TimeSlot};
use std::sync::{Arc, Barrier};
use std::thread;
use time::Time;
use time::macros::time;

fn north() -> CenterId {
    CenterId::new("north")
}

fn booked(persistence: &mut Persistence, time: Time) -> u32 {
    persistence
        .get_slots(&north(), TOMORROW)
        .unwrap()
        .into_iter()
        .find(|slot| slot.time == time)
        .map(|slot| slot.booked_count)
        .unwrap()
}

#[test]
fn test_get_or_create_is_idempotent() {
    let mut persistence: Persistence = create_seeded_persistence();
    let times: [Time; 2] = [time!(09:00), time!(09:30)];

    persistence
        .get_or_create_slots(&north(), TOMORROW, &times, 12)
        .unwrap();
    assert!(
        persistence
            .try_increment_booked(&north(), TOMORROW, time!(09:00))
            .unwrap()
    );
    persistence
        .get_or_create_slots(&north(), TOMORROW, &times, 99)
        .unwrap();

    let slots: Vec<TimeSlot> = persistence.get_slots(&north(), TOMORROW).unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].time, time!(09:00));
    assert_eq!(slots[0].booked_count, 1);
    assert_eq!(slots[0].capacity, 12);
    assert_eq!(slots[1].capacity, 12);
}

#[test]
fn test_increment_stops_at_capacity() {
    let mut persistence: Persistence = create_seeded_persistence();
    persistence
        .get_or_create_slots(&north(), TOMORROW, &[time!(10:00)], 3)
        .unwrap();

    let results: Vec<bool> = (0..5)
        .map(|_| {
            persistence
                .try_increment_booked(&north(), TOMORROW, time!(10:00))
                .unwrap()
        })
        .collect();

    assert_eq!(results, vec![true, true, true, false, false]);
    assert_eq!(booked(&mut persistence, time!(10:00)), 3);
}

#[test]
fn test_increment_missing_slot_is_false() {
    let mut persistence: Persistence = create_seeded_persistence();

    assert!(
        !persistence
            .try_increment_booked(&north(), TOMORROW, time!(10:00))
            .unwrap()
    );
}

#[test]
fn test_check_constraint_blocks_overbooking() {
    let mut persistence: Persistence = create_seeded_persistence();
    persistence
        .get_or_create_slots(&north(), TOMORROW, &[time!(10:00)], 2)
        .unwrap();

    // Bypass the conditional update and write the counter directly.
    let result: Result<usize, PersistenceError> = diesel::update(time_slots::table)
        .set(time_slots::booked_count.eq(3))
        .execute(&mut persistence.conn)
        .map_err(PersistenceError::from);

    assert!(matches!(
        result,
        Err(PersistenceError::ConstraintViolation(_))
    ));
}

#[test]
fn test_listing_through_allocator_reads_stored_counts() {
    let mut persistence: Persistence = create_seeded_persistence();
    persistence
        .get_or_create_slots(&north(), TOMORROW, &[time!(11:30)], 12)
        .unwrap();
    for _ in 0..10 {
        persistence
            .try_increment_booked(&north(), TOMORROW, time!(11:30))
            .unwrap();
    }

    let slots: DaySlots = SlotAllocator::new(&mut persistence)
        .list_slots(&north(), TOMORROW, NOW)
        .unwrap();

    assert_eq!(slots.morning.len(), 8);
    assert!(slots.afternoon.is_empty());
    let last: &TimeSlot = slots.morning.last().unwrap();
    assert_eq!(last.time, time!(11:30));
    assert_eq!(last.status(), SlotStatus::Few);
}

#[test]
fn test_two_connections_share_capacity() {
    let db: TempDatabase = TempDatabase::new();
    let mut first: Persistence = Persistence::new_with_file(&db.path).unwrap();
    seed(&mut first, 2);
    let mut second: Persistence = Persistence::new_with_file(&db.path).unwrap();

    first
        .get_or_create_slots(&north(), TOMORROW, &[time!(08:00)], 2)
        .unwrap();

    assert!(
        first
            .try_increment_booked(&north(), TOMORROW, time!(08:00))
            .unwrap()
    );
    assert!(
        second
            .try_increment_booked(&north(), TOMORROW, time!(08:00))
            .unwrap()
    );
    assert!(
        !first
            .try_increment_booked(&north(), TOMORROW, time!(08:00))
            .unwrap()
    );
    assert!(
        !second
            .try_increment_booked(&north(), TOMORROW, time!(08:00))
            .unwrap()
    );
    assert_eq!(booked(&mut first, time!(08:00)), 2);
}

#[test]
fn test_concurrent_connections_never_exceed_capacity() {
    let db: TempDatabase = TempDatabase::new();
    {
        let mut setup: Persistence = Persistence::new_with_file(&db.path).unwrap();
        seed(&mut setup, 4);
        setup
            .get_or_create_slots(&north(), TOMORROW, &[time!(08:30)], 4)
            .unwrap();
    }

    let workers: usize = 8;
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let path = db.path.clone();
            let barrier: Arc<Barrier> = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
                barrier.wait();
                persistence
                    .try_increment_booked(&north(), TOMORROW, time!(08:30))
                    .unwrap()
            })
        })
        .collect();

    let taken: usize = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|taken| *taken)
        .count();

    assert_eq!(taken, 4);
    let mut check: Persistence = Persistence::new_with_file(&db.path).unwrap();
    assert_eq!(booked(&mut check, time!(08:30)), 4);
}
