// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validation of free-form reservation input.
//!
//! Dates, times and identifiers are validated by the domain crate. This
//! module covers the remaining client-supplied strings of a reservation:
//! the package name, the extra service codes and the idempotency key.

use servicebay_domain::{ServicePackage, ServiceSelection};
use thiserror::Error;

/// Most extra service codes accepted on one booking.
pub const MAX_EXTRAS: usize = 16;

/// Longest accepted extra service code.
pub const MAX_EXTRA_LENGTH: usize = 64;

/// Longest accepted idempotency key.
pub const MAX_IDEMPOTENCY_KEY_LENGTH: usize = 128;

/// Reservation input errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The package name is not a known service package.
    #[error("Unknown service package '{value}'. Must be 'basic', 'intermediate' or 'major'")]
    UnknownPackage { value: String },

    /// Too many extra service codes were supplied.
    #[error("At most {max} extras may be booked, got {found}")]
    TooManyExtras { max: usize, found: usize },

    /// An extra service code is blank or too long.
    #[error("Extra service code '{code}' must be between 1 and {max_length} characters")]
    InvalidExtra { code: String, max_length: usize },

    /// The same extra service code was supplied twice.
    #[error("Extra service code '{code}' was supplied more than once")]
    DuplicateExtra { code: String },

    /// The idempotency key is blank or too long.
    #[error("Idempotency key must be between 1 and {max_length} characters")]
    InvalidIdempotencyKey { max_length: usize },
}

impl InputError {
    /// Returns the request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::UnknownPackage { .. } => "package",
            Self::TooManyExtras { .. }
            | Self::InvalidExtra { .. }
            | Self::DuplicateExtra { .. } => "extras",
            Self::InvalidIdempotencyKey { .. } => "idempotency_key",
        }
    }
}

/// Parses an optional service package name (case-insensitive).
///
/// # Errors
///
/// Returns an error if the name is present but unknown.
pub fn parse_package(value: Option<&str>) -> Result<Option<ServicePackage>, InputError> {
    value
        .map(|name| {
            name.trim()
                .parse::<ServicePackage>()
                .map_err(|_| InputError::UnknownPackage {
                    value: name.to_string(),
                })
        })
        .transpose()
}

/// Normalizes extra service codes.
///
/// Codes are trimmed and lower-cased; order is preserved.
///
/// # Errors
///
/// Returns an error if there are too many codes, a code is blank or too long,
/// or a code repeats.
pub fn normalize_extras(extras: &[String]) -> Result<Vec<String>, InputError> {
    if extras.len() > MAX_EXTRAS {
        return Err(InputError::TooManyExtras {
            max: MAX_EXTRAS,
            found: extras.len(),
        });
    }

    let mut normalized: Vec<String> = Vec::with_capacity(extras.len());
    for extra in extras {
        let code: String = extra.trim().to_lowercase();
        if code.is_empty() || code.chars().count() > MAX_EXTRA_LENGTH {
            return Err(InputError::InvalidExtra {
                code: extra.clone(),
                max_length: MAX_EXTRA_LENGTH,
            });
        }
        if normalized.contains(&code) {
            return Err(InputError::DuplicateExtra { code });
        }
        normalized.push(code);
    }

    Ok(normalized)
}

/// Builds a service selection from raw package and extras input.
///
/// # Errors
///
/// Returns an error if the package or any extra is invalid.
pub fn parse_service_selection(
    package: Option<&str>,
    extras: &[String],
) -> Result<ServiceSelection, InputError> {
    Ok(ServiceSelection {
        package: parse_package(package)?,
        extras: normalize_extras(extras)?,
    })
}

/// Validates an optional idempotency key.
///
/// Keys are compared verbatim; surrounding whitespace is rejected rather
/// than trimmed.
///
/// # Errors
///
/// Returns an error if the key is blank, padded, or too long.
pub fn validate_idempotency_key(key: Option<&str>) -> Result<Option<String>, InputError> {
    let Some(key) = key else {
        return Ok(None);
    };

    if key.is_empty()
        || key.trim() != key
        || key.chars().count() > MAX_IDEMPOTENCY_KEY_LENGTH
    {
        return Err(InputError::InvalidIdempotencyKey {
            max_length: MAX_IDEMPOTENCY_KEY_LENGTH,
        });
    }

    Ok(Some(key.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_package_is_case_insensitive() {
        assert_eq!(
            parse_package(Some(" Major ")),
            Ok(Some(ServicePackage::Major))
        );
        assert_eq!(parse_package(None), Ok(None));
    }

    #[test]
    fn test_unknown_package() {
        let err: InputError = parse_package(Some("deluxe")).unwrap_err();
        assert_eq!(err.field(), "package");
        assert!(err.to_string().contains("deluxe"));
    }

    #[test]
    fn test_extras_are_normalized() {
        let extras: Vec<String> = vec![String::from(" Wipers "), String::from("cabin-filter")];
        assert_eq!(
            normalize_extras(&extras),
            Ok(vec![String::from("wipers"), String::from("cabin-filter")])
        );
    }

    #[test]
    fn test_duplicate_extra_after_normalization() {
        let extras: Vec<String> = vec![String::from("wipers"), String::from("WIPERS")];
        assert_eq!(
            normalize_extras(&extras),
            Err(InputError::DuplicateExtra {
                code: String::from("wipers")
            })
        );
    }

    #[test]
    fn test_blank_extra() {
        let extras: Vec<String> = vec![String::from("  ")];
        assert!(matches!(
            normalize_extras(&extras),
            Err(InputError::InvalidExtra { .. })
        ));
    }

    #[test]
    fn test_too_many_extras() {
        let extras: Vec<String> = (0..=MAX_EXTRAS).map(|i| format!("extra-{i}")).collect();
        assert_eq!(
            normalize_extras(&extras),
            Err(InputError::TooManyExtras {
                max: MAX_EXTRAS,
                found: MAX_EXTRAS + 1
            })
        );
    }

    #[test]
    fn test_idempotency_key_rules() {
        assert_eq!(validate_idempotency_key(None), Ok(None));
        assert_eq!(
            validate_idempotency_key(Some("order-7")),
            Ok(Some(String::from("order-7")))
        );
        assert!(validate_idempotency_key(Some("")).is_err());
        assert!(validate_idempotency_key(Some(" padded")).is_err());
        let long: String = "k".repeat(MAX_IDEMPOTENCY_KEY_LENGTH + 1);
        assert!(validate_idempotency_key(Some(&long)).is_err());
    }
}
