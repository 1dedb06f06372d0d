// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service centers and their local calendar.
//!
//! Slot dates and times are wall-clock values in the center's declared
//! timezone. Whether a date lies in the past is therefore decided against
//! the center-local date, not the UTC date.

use crate::error::DomainError;
use crate::slot::SlotCatalog;
use crate::types::CenterId;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};

/// A service center offering bookable slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCenter {
    center_id: CenterId,
    name: String,
    timezone: String,
    catalog: Option<SlotCatalog>,
}

impl ServiceCenter {
    /// Creates a validated service center.
    ///
    /// # Arguments
    ///
    /// * `center_id` - The center's identifier
    /// * `name` - Display name
    /// * `timezone` - IANA timezone name (e.g. `Europe/Berlin`)
    /// * `catalog` - Slot template; `None` when the center takes no bookings
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the timezone is unknown.
    pub fn new(
        center_id: CenterId,
        name: &str,
        timezone: &str,
        catalog: Option<SlotCatalog>,
    ) -> Result<Self, DomainError> {
        let name: &str = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidCenterName(String::from(
                "Center name cannot be empty",
            )));
        }
        parse_timezone(timezone)?;

        Ok(Self {
            center_id,
            name: name.to_string(),
            timezone: timezone.to_string(),
            catalog,
        })
    }

    #[must_use]
    pub const fn center_id(&self) -> &CenterId {
        &self.center_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    #[must_use]
    pub const fn catalog(&self) -> Option<&SlotCatalog> {
        self.catalog.as_ref()
    }

    /// Returns the calendar date at this center for the given instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored timezone is unknown or the instant
    /// cannot be represented.
    pub fn local_date(&self, now: OffsetDateTime) -> Result<Date, DomainError> {
        local_date_in(&self.timezone, now)
    }
}

/// Returns the calendar date in the given timezone for an instant.
///
/// # Errors
///
/// Returns an error if the timezone is unknown or the instant cannot be
/// represented.
pub fn local_date_in(timezone: &str, now: OffsetDateTime) -> Result<Date, DomainError> {
    let tz: Tz = parse_timezone(timezone)?;

    let utc: DateTime<Utc> = DateTime::from_timestamp(now.unix_timestamp(), now.nanosecond())
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("converting instant {now} to UTC"),
        })?;

    let local: NaiveDate = utc.with_timezone(&tz).date_naive();

    let month: Month = u8::try_from(local.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("converting local date {local}"),
        })?;
    let day: u8 = u8::try_from(local.day()).map_err(|_| DomainError::DateArithmeticOverflow {
        operation: format!("converting local date {local}"),
    })?;

    Date::from_calendar_date(local.year(), month, day).map_err(|e| {
        DomainError::DateArithmeticOverflow {
            operation: format!("converting local date {local}: {e}"),
        }
    })
}

fn parse_timezone(timezone: &str) -> Result<Tz, DomainError> {
    timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))
}
