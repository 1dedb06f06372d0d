// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bookable time slots and the per-center slot catalog.
//!
//! ## Invariants
//!
//! - `0 <= booked_count <= capacity` for every slot
//! - Slot status is derived from `booked_count` and `capacity` on every read
//! - Catalog times are generated on a fixed step within business hours
//! - Morning slots start before 12:00, afternoon slots at or after 12:00

use crate::error::DomainError;
use crate::types::CenterId;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Time};

/// Remaining seats at or below which a slot is reported as filling up.
pub const FEW_REMAINING_THRESHOLD: u32 = 3;
/// Default minutes between two consecutive slots.
pub const DEFAULT_STEP_MINUTES: u16 = 30;
/// Default concurrent bookings per slot.
pub const DEFAULT_SLOT_CAPACITY: u32 = 12;
/// Largest accepted number of concurrent bookings per slot.
pub const MAX_SLOT_CAPACITY: u32 = 1_000;

/// Hour at which slots move from the morning group to the afternoon group.
const AFTERNOON_START_HOUR: u8 = 12;

/// Availability of a slot, derived from its counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotStatus {
    /// More than a few seats remain.
    Available,
    /// Between one and three seats remain.
    Few,
    /// No seats remain.
    Full,
}

impl SlotStatus {
    /// Derives the status for the given counters.
    #[must_use]
    pub const fn from_counts(capacity: u32, booked_count: u32) -> Self {
        let remaining: u32 = capacity.saturating_sub(booked_count);
        if remaining == 0 {
            Self::Full
        } else if remaining <= FEW_REMAINING_THRESHOLD {
            Self::Few
        } else {
            Self::Available
        }
    }

    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Few => "few",
            Self::Full => "full",
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bookable time unit at a service center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// The service center offering the slot.
    pub center_id: CenterId,
    /// The calendar date of the slot.
    pub date: Date,
    /// The wall-clock start time of the slot, in the center's timezone.
    pub time: Time,
    /// Maximum concurrent bookings.
    pub capacity: u32,
    /// Bookings confirmed so far.
    pub booked_count: u32,
}

impl TimeSlot {
    /// Creates a slot with no bookings.
    #[must_use]
    pub const fn empty(center_id: CenterId, date: Date, time: Time, capacity: u32) -> Self {
        Self {
            center_id,
            date,
            time,
            capacity,
            booked_count: 0,
        }
    }

    /// Seats still available.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.booked_count)
    }

    /// Derived availability status.
    #[must_use]
    pub const fn status(&self) -> SlotStatus {
        SlotStatus::from_counts(self.capacity, self.booked_count)
    }

    /// Whether this slot belongs to the morning group.
    #[must_use]
    pub const fn is_morning(&self) -> bool {
        self.time.hour() < AFTERNOON_START_HOUR
    }
}

/// The slots of one center and day, split for two-column display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DaySlots {
    /// Slots starting before noon, ascending by time.
    pub morning: Vec<TimeSlot>,
    /// Slots starting at or after noon, ascending by time.
    pub afternoon: Vec<TimeSlot>,
}

impl DaySlots {
    /// Total number of slots in both groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.morning.len() + self.afternoon.len()
    }

    /// Whether no slots are offered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.morning.is_empty() && self.afternoon.is_empty()
    }

    /// Iterates over all slots, morning first.
    pub fn iter(&self) -> impl Iterator<Item = &TimeSlot> {
        self.morning.iter().chain(self.afternoon.iter())
    }
}

/// Partitions slots into morning and afternoon groups, each sorted by time.
///
/// Every input slot ends up in exactly one group.
#[must_use]
pub fn partition_slots(slots: Vec<TimeSlot>) -> DaySlots {
    let (mut morning, mut afternoon): (Vec<TimeSlot>, Vec<TimeSlot>) =
        slots.into_iter().partition(TimeSlot::is_morning);

    morning.sort_by_key(|slot| slot.time);
    afternoon.sort_by_key(|slot| slot.time);

    DaySlots { morning, afternoon }
}

/// A service center's template for generating slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCatalog {
    opens_at: Time,
    closes_at: Time,
    step_minutes: u16,
    capacity: u32,
}

impl SlotCatalog {
    /// Creates a validated slot catalog.
    ///
    /// # Arguments
    ///
    /// * `opens_at` - Start time of the first slot
    /// * `closes_at` - No slot starts at or after this time
    /// * `step_minutes` - Minutes between consecutive slots
    /// * `capacity` - Concurrent bookings per slot
    ///
    /// # Errors
    ///
    /// Returns an error if the opening time is not before the closing time,
    /// if the step or capacity is zero, or if the capacity exceeds
    /// `MAX_SLOT_CAPACITY`.
    pub fn new(
        opens_at: Time,
        closes_at: Time,
        step_minutes: u16,
        capacity: u32,
    ) -> Result<Self, DomainError> {
        if opens_at >= closes_at {
            return Err(DomainError::InvalidSlotCatalog {
                reason: format!("opening time {opens_at} must be before closing time {closes_at}"),
            });
        }
        if step_minutes == 0 {
            return Err(DomainError::InvalidSlotCatalog {
                reason: String::from("step_minutes must be greater than 0"),
            });
        }
        if capacity == 0 {
            return Err(DomainError::InvalidSlotCatalog {
                reason: String::from("capacity must be greater than 0"),
            });
        }
        if capacity > MAX_SLOT_CAPACITY {
            return Err(DomainError::InvalidSlotCatalog {
                reason: format!("capacity must be at most {MAX_SLOT_CAPACITY}, got {capacity}"),
            });
        }

        Ok(Self {
            opens_at,
            closes_at,
            step_minutes,
            capacity,
        })
    }

    #[must_use]
    pub const fn opens_at(&self) -> Time {
        self.opens_at
    }

    #[must_use]
    pub const fn closes_at(&self) -> Time {
        self.closes_at
    }

    #[must_use]
    pub const fn step_minutes(&self) -> u16 {
        self.step_minutes
    }

    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Generates the ordered slot start times of a business day.
    #[must_use]
    pub fn slot_times(&self) -> Vec<Time> {
        let step: Duration = Duration::minutes(i64::from(self.step_minutes));
        let mut times: Vec<Time> = Vec::new();
        let mut current: Time = self.opens_at;

        while current < self.closes_at {
            times.push(current);
            let next: Time = current + step;
            // Time arithmetic wraps at midnight.
            if next <= current {
                break;
            }
            current = next;
        }

        times
    }

    /// Checks that a requested time lies on the catalog grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the time is not one of the generated slot times.
    pub fn validate_time(&self, time: Time) -> Result<(), DomainError> {
        if self.slot_times().contains(&time) {
            Ok(())
        } else {
            Err(DomainError::SlotTimeNotInCatalog { time })
        }
    }
}
