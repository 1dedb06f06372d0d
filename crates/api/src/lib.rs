// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Service Bay scheduling system.
//!
//! Translates raw client requests into domain and core operations against
//! the persistence layer and maps every lower-layer error into `ApiError`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod input;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    create_center, create_reservation, get_booking, get_due_status, get_vehicle, list_centers,
    list_slots, record_service, register_vehicle,
};
pub use input::{
    InputError, MAX_EXTRA_LENGTH, MAX_EXTRAS, MAX_IDEMPOTENCY_KEY_LENGTH, normalize_extras,
    parse_package, parse_service_selection, validate_idempotency_key,
};
pub use request_response::{
    BookingInfo, CenterInfo, CreateCenterRequest, CreateReservationRequest, DueStatusResponse,
    ListCentersResponse, ListSlotsResponse, NextDueInfo, RecordServiceRequest,
    RegisterVehicleRequest, ReservationResponse, SlotCatalogInfo, SlotCatalogInput, SlotInfo,
    VehicleInfo,
};
