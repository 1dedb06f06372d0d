// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance due evaluation for a single vehicle.
//!
//! This module provides pure, deterministic evaluation of whether a vehicle
//! is due for service, based on distance traveled and whole calendar months
//! elapsed since the last service. Whichever measure has accumulated more
//! intervals decides the interval level.
//!
//! ## Invariants
//!
//! - Month arithmetic counts whole calendar months, never days
//! - Without a last service date only the distance check applies
//! - Derived flags (`is_due`, `is_overdue`) are recomputed on every call

use crate::error::DomainError;
use crate::policy::MaintenancePolicy;
use crate::types::VehicleServiceState;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

/// The next maintenance point surfaced to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextDue {
    /// The next service is reached by distance first.
    Distance {
        /// Odometer reading at which the next interval begins.
        odometer_km: u64,
        /// Kilometers left until that reading.
        km_remaining: u64,
    },
    /// The next service is reached by elapsed time first.
    Time {
        /// Calendar date at which the next interval begins.
        date: Date,
        /// Whole months left until that date.
        months_remaining: u32,
    },
}

/// Result of evaluating a vehicle against the maintenance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueStatus {
    /// Number of intervals accumulated (max of distance and time levels).
    pub interval_level: u32,
    /// Whether at least one interval has been reached.
    pub is_due: bool,
    /// Whether the vehicle is past its due point by more than a grace margin.
    pub is_overdue: bool,
    /// Whole calendar months since the last service. `None` without a service date.
    pub months_elapsed: Option<u32>,
    /// Kilometers past the current due point. `None` when not due.
    pub km_overdue: Option<i64>,
    /// Months past the current due point. `None` when not due or without a service date.
    pub months_overdue: Option<i64>,
    /// Kilometers until the next interval boundary.
    pub km_remaining_to_next: u64,
    /// Months until the next interval boundary. `None` without a service date.
    pub months_remaining_to_next: Option<u32>,
    /// The sooner of the two next-interval figures.
    pub next_due: NextDue,
}

/// Evaluates vehicles against a fixed maintenance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaintenanceDueEvaluator {
    policy: MaintenancePolicy,
}

impl MaintenanceDueEvaluator {
    /// Creates an evaluator for the given policy.
    #[must_use]
    pub const fn new(policy: MaintenancePolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy this evaluator applies.
    #[must_use]
    pub const fn policy(&self) -> &MaintenancePolicy {
        &self.policy
    }

    /// Evaluates a vehicle's due status as of the given date.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The last service date is after `as_of`
    /// - Date arithmetic for the next due date overflows
    pub fn evaluate(
        &self,
        state: &VehicleServiceState,
        as_of: Date,
    ) -> Result<DueStatus, DomainError> {
        evaluate_due(&self.policy, state, as_of)
    }
}

/// Evaluates a vehicle's due status as of the given date.
///
/// This is a pure calculation that:
/// - Counts distance intervals as `odometer / km_per_interval`
/// - Counts time intervals as whole months elapsed / `months_per_interval`
/// - Takes the larger of the two as the interval level
/// - Flags the vehicle overdue when either overshoot exceeds its grace
///
/// # Arguments
///
/// * `policy` - The maintenance policy to apply
/// * `state` - The vehicle's odometer and last service date
/// * `as_of` - The date to evaluate at
///
/// # Errors
///
/// Returns an error if:
/// - The last service date is after `as_of`
/// - Date arithmetic for the next due date overflows
pub fn evaluate_due(
    policy: &MaintenancePolicy,
    state: &VehicleServiceState,
    as_of: Date,
) -> Result<DueStatus, DomainError> {
    let km_per_interval: u64 = u64::from(policy.km_per_interval());
    let months_per_interval: u32 = policy.months_per_interval();
    let odometer_km: u64 = u64::from(state.odometer_km());

    let months_elapsed: Option<u32> = match state.last_service_date() {
        Some(last_service_date) => {
            if last_service_date > as_of {
                return Err(DomainError::ServiceDateInFuture {
                    last_service_date,
                    as_of,
                });
            }
            Some(whole_months_between(last_service_date, as_of))
        }
        None => None,
    };

    // Both quotients are bounded by their u32 numerators.
    let level_by_distance: u32 = u32::try_from(odometer_km / km_per_interval).unwrap_or(u32::MAX);
    let level_by_time: u32 = months_elapsed.unwrap_or(0) / months_per_interval;
    let interval_level: u32 = level_by_distance.max(level_by_time);
    let is_due: bool = interval_level > 0;

    let (km_overdue, months_overdue): (Option<i64>, Option<i64>) = if is_due {
        let km_boundary: i64 =
            i64::from(interval_level).saturating_mul(i64::from(policy.km_per_interval()));
        let km: i64 = i64::from(state.odometer_km()) - km_boundary;
        let months: Option<i64> = months_elapsed.map(|elapsed| {
            i64::from(elapsed) - i64::from(interval_level) * i64::from(months_per_interval)
        });
        (Some(km), months)
    } else {
        (None, None)
    };

    let is_overdue: bool = km_overdue.is_some_and(|km| km > i64::from(policy.km_grace()))
        || months_overdue.is_some_and(|months| months > i64::from(policy.months_grace()));

    let next_level: u64 = u64::from(interval_level) + 1;
    let next_odometer_km: u64 = next_level.saturating_mul(km_per_interval);
    let km_remaining_to_next: u64 = next_odometer_km.saturating_sub(odometer_km);

    let next_month_boundary: u64 = next_level * u64::from(months_per_interval);
    let months_remaining_to_next: Option<u32> = months_elapsed.map(|elapsed| {
        u32::try_from(next_month_boundary.saturating_sub(u64::from(elapsed))).unwrap_or(u32::MAX)
    });

    let next_due: NextDue = match (state.last_service_date(), months_remaining_to_next) {
        (Some(last_service_date), Some(months_remaining))
            if time_is_sooner(
                km_remaining_to_next,
                km_per_interval,
                months_remaining,
                months_per_interval,
            ) =>
        {
            NextDue::Time {
                date: month_boundary_date(last_service_date, next_month_boundary)?,
                months_remaining,
            }
        }
        _ => NextDue::Distance {
            odometer_km: next_odometer_km,
            km_remaining: km_remaining_to_next,
        },
    };

    Ok(DueStatus {
        interval_level,
        is_due,
        is_overdue,
        months_elapsed,
        km_overdue,
        months_overdue,
        km_remaining_to_next,
        months_remaining_to_next,
        next_due,
    })
}

/// Compares the two remaining figures as fractions of their interval size.
///
/// Distance wins ties.
fn time_is_sooner(
    km_remaining: u64,
    km_per_interval: u64,
    months_remaining: u32,
    months_per_interval: u32,
) -> bool {
    let distance_share: u128 = u128::from(km_remaining) * u128::from(months_per_interval);
    let time_share: u128 = u128::from(months_remaining) * u128::from(km_per_interval);
    time_share < distance_share
}

/// Counts whole calendar months between two dates.
///
/// Months are counted on the `year * 12 + month` scale. A month is only
/// complete once the day of month of `from` has been reached, so
/// January 31 to March 1 is one month. Returns 0 when `to` precedes `from`.
#[must_use]
pub fn whole_months_between(from: Date, to: Date) -> u32 {
    if to <= from {
        return 0;
    }

    let from_index: i64 = i64::from(from.year()) * 12 + i64::from(u8::from(from.month()));
    let to_index: i64 = i64::from(to.year()) * 12 + i64::from(u8::from(to.month()));
    let mut months: i64 = to_index - from_index;

    if to.day() < from.day() {
        months -= 1;
    }

    u32::try_from(months.max(0)).unwrap_or(0)
}

/// Returns the first date on which `months` whole months have elapsed since
/// `from`, as counted by `whole_months_between`.
///
/// When the target month is too short to hold `from`'s day, the month only
/// completes on the first day of the following month.
///
/// # Errors
///
/// Returns an error if the result falls outside the supported date range.
pub fn month_boundary_date(from: Date, months: u64) -> Result<Date, DomainError> {
    let candidate: Date = add_months(from, months)?;
    if candidate.day() == from.day() {
        return Ok(candidate);
    }
    candidate
        .next_day()
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {months} months to {from}"),
        })
}

/// Adds whole calendar months to a date, clamping the day to the target month.
///
/// # Errors
///
/// Returns an error if the result falls outside the supported date range.
pub fn add_months(date: Date, months: u64) -> Result<Date, DomainError> {
    let overflow = || DomainError::DateArithmeticOverflow {
        operation: format!("adding {months} months to {date}"),
    };

    let months: i64 = i64::try_from(months).map_err(|_| overflow())?;
    let start_index: i64 = i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1;
    let target_index: i64 = start_index.checked_add(months).ok_or_else(overflow)?;

    let year: i32 = i32::try_from(target_index.div_euclid(12)).map_err(|_| overflow())?;
    let month_number: u8 = u8::try_from(target_index.rem_euclid(12) + 1).map_err(|_| overflow())?;
    let month: Month = Month::try_from(month_number).map_err(|_| overflow())?;

    // Walk back from the original day until the month can hold it.
    let mut day: u8 = date.day();
    loop {
        if let Ok(result) = Date::from_calendar_date(year, month, day) {
            return Ok(result);
        }
        if day <= 28 {
            return Err(overflow());
        }
        day -= 1;
    }
}
