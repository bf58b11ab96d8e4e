//! Pure content validation: measurement range checks and per-owner system
//! name uniqueness. No authorization and no storage access happens here;
//! callers fetch whatever state the checks need first.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::sensor::SensorKind;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("value {value} is outside the allowed range [{min}, {max}] for {kind} sensors")]
    ValueOutOfRange {
        kind: SensorKind,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("a system named \"{name}\" already exists for this owner")]
    DuplicateSystemName { name: String },

    #[error("name cannot be empty")]
    EmptyName,
}

/// Inclusive measurement bounds per sensor kind.
pub fn allowed_range(kind: SensorKind) -> (Decimal, Decimal) {
    match kind {
        SensorKind::Ph => (Decimal::from(0), Decimal::from(14)),
        SensorKind::Temp => (Decimal::from(-50), Decimal::from(150)),
        SensorKind::Tds => (Decimal::from(0), Decimal::from(9999)),
    }
}

/// Reject measurement values outside the owning sensor kind's range.
/// Applied uniformly on create and update.
pub fn validate_measurement_value(kind: SensorKind, value: Decimal) -> Result<(), DomainError> {
    let (min, max) = allowed_range(kind);
    if value < min || value > max {
        return Err(DomainError::ValueOutOfRange { kind, value, min, max });
    }
    Ok(())
}

/// Names must be non-empty once trimmed.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::EmptyName);
    }
    Ok(())
}

/// Uniqueness over already-fetched state: `conflicting` is the id of an
/// existing same-named system for the same owner (if any), `excluding` is the
/// id of the system being updated. Excluding its own id means a no-op rename
/// never self-conflicts.
pub fn validate_unique_system_name(
    name: &str,
    conflicting: Option<Uuid>,
    excluding: Option<Uuid>,
) -> Result<(), DomainError> {
    match conflicting {
        Some(id) if Some(id) != excluding => {
            Err(DomainError::DuplicateSystemName { name: name.to_string() })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn boundary_values_are_accepted() {
        for (kind, low, high) in [
            (SensorKind::Ph, 0, 14),
            (SensorKind::Temp, -50, 150),
            (SensorKind::Tds, 0, 9999),
        ] {
            assert_eq!(validate_measurement_value(kind, dec(low)), Ok(()));
            assert_eq!(validate_measurement_value(kind, dec(high)), Ok(()));
        }
    }

    #[test]
    fn one_unit_beyond_each_bound_is_rejected() {
        for (kind, low, high) in [
            (SensorKind::Ph, 0, 14),
            (SensorKind::Temp, -50, 150),
            (SensorKind::Tds, 0, 9999),
        ] {
            assert!(validate_measurement_value(kind, dec(low - 1)).is_err());
            assert!(validate_measurement_value(kind, dec(high + 1)).is_err());
        }
    }

    #[test]
    fn range_error_carries_bounds_and_kind() {
        let err = validate_measurement_value(SensorKind::Ph, dec(15)).unwrap_err();
        assert_eq!(
            err,
            DomainError::ValueOutOfRange {
                kind: SensorKind::Ph,
                value: dec(15),
                min: dec(0),
                max: dec(14),
            }
        );
        let message = err.to_string();
        assert!(message.contains("15"));
        assert!(message.contains("[0, 14]"));
        assert!(message.contains("pH"));
    }

    #[test]
    fn fractional_values_inside_range_pass() {
        let value: Decimal = "6.85".parse().unwrap();
        assert_eq!(validate_measurement_value(SensorKind::Ph, value), Ok(()));
    }

    #[test]
    fn duplicate_name_detected() {
        let existing = Uuid::new_v4();
        let err = validate_unique_system_name("Tank A", Some(existing), None).unwrap_err();
        assert_eq!(err, DomainError::DuplicateSystemName { name: "Tank A".to_string() });
    }

    #[test]
    fn rename_to_own_name_does_not_conflict() {
        let own_id = Uuid::new_v4();
        assert_eq!(validate_unique_system_name("Tank A", Some(own_id), Some(own_id)), Ok(()));
    }

    #[test]
    fn no_conflict_when_name_is_free() {
        assert_eq!(validate_unique_system_name("Tank A", None, None), Ok(()));
        assert_eq!(validate_unique_system_name("Tank A", None, Some(Uuid::new_v4())), Ok(()));
    }

    #[test]
    fn empty_and_whitespace_names_rejected() {
        assert_eq!(validate_name(""), Err(DomainError::EmptyName));
        assert_eq!(validate_name("   "), Err(DomainError::EmptyName));
        assert_eq!(validate_name("Tank A"), Ok(()));
    }
}
