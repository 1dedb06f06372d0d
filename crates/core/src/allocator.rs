// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot listing and at-most-capacity reservation.
//!
//! ## Invariants
//!
//! - Listing never changes a slot's `booked_count`
//! - A reservation takes a seat only through `SlotStore::try_increment_booked`
//! - Past dates and centers without a catalog list as empty, not as errors
//! - Slot status is derived from the stored counters on every read

use crate::booking::{BookingRequest, RejectionReason, ReservationRequest, ReserveOutcome};
use crate::error::{CoreError, store_error};
use crate::ports::{SlotStore, VehicleSource};
use servicebay_domain::{
    CenterId, DaySlots, ServiceCenter, SlotCatalog, TimeSlot, partition_slots,
};
use time::{Date, OffsetDateTime, Time};

/// Lists and reserves slots against a borrowed store.
pub struct SlotAllocator<'s, S> {
    store: &'s mut S,
}

impl<'s, S: SlotStore> SlotAllocator<'s, S> {
    /// Creates an allocator over the given store.
    pub const fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Lists the slots of a center on a date, grouped into morning and afternoon.
    ///
    /// Every catalog time is materialized before reading, so the listing
    /// always contains the full business day.
    ///
    /// # Arguments
    ///
    /// * `center_id` - The service center
    /// * `date` - The requested date, in the center's calendar
    /// * `now` - The current instant, used to derive the center-local date
    ///
    /// # Returns
    ///
    /// Empty groups when the date is in the past or the center has no
    /// slot catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The center is unknown
    /// - The center's timezone is invalid
    /// - The store fails
    pub fn list_slots(
        &mut self,
        center_id: &CenterId,
        date: Date,
        now: OffsetDateTime,
    ) -> Result<DaySlots, CoreError> {
        let center: ServiceCenter = self.find_center(center_id)?;

        let Some(catalog) = center.catalog().copied() else {
            return Ok(DaySlots::default());
        };

        if date < center.local_date(now)? {
            return Ok(DaySlots::default());
        }

        let times: Vec<Time> = catalog.slot_times();
        self.store
            .get_or_create_slots(center_id, date, &times, catalog.capacity())
            .map_err(store_error)?;

        let slots: Vec<TimeSlot> = self
            .store
            .get_slots(center_id, date)
            .map_err(store_error)?
            .into_iter()
            .filter(|slot| times.contains(&slot.time))
            .collect();

        Ok(partition_slots(slots))
    }

    fn find_center(&mut self, center_id: &CenterId) -> Result<ServiceCenter, CoreError> {
        self.store
            .service_center(center_id)
            .map_err(store_error)?
            .ok_or_else(|| CoreError::CenterNotFound(center_id.clone()))
    }
}

impl<S: SlotStore + VehicleSource> SlotAllocator<'_, S> {
    /// Attempts to take one seat in a slot.
    ///
    /// The slot is created on demand with the catalog capacity. The seat is
    /// taken through the store's atomic check-and-increment, so concurrent
    /// reservations never push a slot past its capacity.
    ///
    /// # Returns
    ///
    /// * `ReserveOutcome::Reserved` with the booking request on success
    /// * `ReserveOutcome::Rejected { reason: Full }` when no seat is left
    /// * `ReserveOutcome::Rejected { reason: DateInPast }` for past dates
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The center or vehicle is unknown
    /// - The center offers no slot at the requested time
    /// - The store fails
    pub fn reserve(
        &mut self,
        request: ReservationRequest,
        now: OffsetDateTime,
    ) -> Result<ReserveOutcome, CoreError> {
        let center: ServiceCenter = self.find_center(&request.center_id)?;

        if <S as VehicleSource>::vehicle_service_state(self.store, &request.vehicle_id)
            .map_err(store_error)?
            .is_none()
        {
            return Err(CoreError::VehicleNotFound(request.vehicle_id));
        }

        let catalog: SlotCatalog = center
            .catalog()
            .copied()
            .filter(|catalog| catalog.validate_time(request.time).is_ok())
            .ok_or_else(|| CoreError::SlotNotFound {
                center_id: request.center_id.clone(),
                date: request.date,
                time: request.time,
            })?;

        if request.date < center.local_date(now)? {
            return Ok(ReserveOutcome::Rejected {
                reason: RejectionReason::DateInPast,
            });
        }

        self.store
            .get_or_create_slots(
                &request.center_id,
                request.date,
                &[request.time],
                catalog.capacity(),
            )
            .map_err(store_error)?;

        let taken: bool = self
            .store
            .try_increment_booked(&request.center_id, request.date, request.time)
            .map_err(store_error)?;

        if taken {
            Ok(ReserveOutcome::Reserved(BookingRequest::from(request)))
        } else {
            Ok(ReserveOutcome::Rejected {
                reason: RejectionReason::Full,
            })
        }
    }
}
