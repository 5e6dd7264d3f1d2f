//! # Validation Module
//!
//! Input validation for booking and shift operations.
//!
//! Validators run before any business logic or storage access and return
//! the same [`DomainError`] kinds the request layer already maps, so a bad
//! amount fails identically whether it is caught here or deeper down.

use chrono::NaiveDate;

use crate::error::{DomainError, DomainResult};
use crate::money::Money;

// =============================================================================
// Date Validators
// =============================================================================

/// Validates a stay date range.
///
/// ## Rules
/// - `check_out` must be strictly after `check_in` (half-open interval;
///   a zero-night stay is not bookable)
pub fn validate_stay(check_in: NaiveDate, check_out: NaiveDate) -> DomainResult<()> {
    if check_out <= check_in {
        return Err(DomainError::InvalidDateRange {
            check_in,
            check_out,
        });
    }
    Ok(())
}

// =============================================================================
// Money Validators
// =============================================================================

/// Validates a nightly rate.
///
/// ## Rules
/// - Must be non-negative (zero is allowed for comped stays)
pub fn validate_rate(rate: Money) -> DomainResult<()> {
    if rate.is_negative() {
        return Err(DomainError::invalid_amount("nightly rate must not be negative"));
    }
    Ok(())
}

/// Validates an amount that may be zero but never negative
/// (advances, extra charges, late fees, opening cash).
pub fn validate_non_negative(amount: Money, field: &str) -> DomainResult<()> {
    if amount.is_negative() {
        return Err(DomainError::invalid_amount(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

/// Validates a collected payment amount.
///
/// ## Rules
/// - Must be strictly positive; zero-amount transactions would pollute
///   the append-only ledger
pub fn validate_payment_amount(amount: Money) -> DomainResult<()> {
    if !amount.is_positive() {
        return Err(DomainError::invalid_amount("payment amount must be positive"));
    }
    Ok(())
}

// =============================================================================
// Occupancy Validators
// =============================================================================

/// Validates the guest counts on a booking.
///
/// ## Rules
/// - At least one adult
/// - Counts must not be negative
pub fn validate_occupancy(adults: i64, children: i64) -> DomainResult<()> {
    if adults < 1 {
        return Err(DomainError::invalid_amount(
            "booking must have at least one adult",
        ));
    }
    if children < 0 {
        return Err(DomainError::invalid_amount("children count must not be negative"));
    }
    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a UUID string format.
pub fn validate_uuid(id: &str, entity: &'static str) -> DomainResult<()> {
    if id.trim().is_empty() {
        return Err(DomainError::not_found(entity, id));
    }
    uuid::Uuid::parse_str(id).map_err(|_| DomainError::not_found(entity, id))?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_stay() {
        assert!(validate_stay(date(2026, 1, 10), date(2026, 1, 11)).is_ok());
        assert!(validate_stay(date(2026, 1, 10), date(2026, 1, 10)).is_err());
        assert!(validate_stay(date(2026, 1, 10), date(2026, 1, 9)).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate(Money::from_paise(200000)).is_ok());
        assert!(validate_rate(Money::zero()).is_ok());
        assert!(validate_rate(Money::from_paise(-1)).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(Money::zero(), "advance").is_ok());
        let err = validate_non_negative(Money::from_paise(-100), "advance").unwrap_err();
        assert!(err.to_string().contains("advance"));
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_paise(100)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_paise(-100)).is_err());
    }

    #[test]
    fn test_validate_occupancy() {
        assert!(validate_occupancy(2, 1).is_ok());
        assert!(validate_occupancy(1, 0).is_ok());
        assert!(validate_occupancy(0, 2).is_err());
        assert!(validate_occupancy(1, -1).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000", "Booking").is_ok());
        assert!(validate_uuid("", "Booking").is_err());
        assert!(validate_uuid("not-a-uuid", "Booking").is_err());
    }
}
