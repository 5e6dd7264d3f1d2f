//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A front desk reconciles a physical cash drawer against computed        │
//! │  totals every shift. A one-paisa float drift shows up as a variance     │
//! │  a human then has to explain.                                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹7500.00 is stored as 750000. Every sum, split, and comparison is   │
//! │    exact. Rounding happens in exactly one place, explicitly.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use frontdesk_core::money::Money;
//!
//! // Create from paise (preferred)
//! let rate = Money::from_paise(200000); // ₹2000.00
//!
//! // Arithmetic operations
//! let two_nights = rate * 2;                       // ₹4000.00
//! let with_fee = rate + Money::from_paise(5000);   // ₹2050.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for variances and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type: nightly
/// rates, room charges, taxes, payments, drawer counts, variances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    ///
    /// let rate = Money::from_paise(200000); // Represents ₹2000.00
    /// assert_eq!(rate.paise(), 200000);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from major and minor units (rupees and paise).
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    ///
    /// let rate = Money::from_rupees(7500, 0); // ₹7500.00
    /// assert_eq!(rate.paise(), 750000);
    ///
    /// let variance = Money::from_rupees(-5, 50); // -₹5.50 (drawer short)
    /// assert_eq!(variance.paise(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_rupees(-5, 50)` = -₹5.50, not -₹4.50
    #[inline]
    pub const fn from_rupees(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in paise (smallest currency unit).
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (paise) portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a percentage expressed as a [`TaxRate`] (basis points),
    /// rounding half-up to the nearest paisa.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 term rounds
    /// the half-paisa boundary up. i128 intermediate prevents overflow.
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    /// use frontdesk_core::types::TaxRate;
    ///
    /// let charge = Money::from_paise(200000); // ₹2000.00
    /// let rate = TaxRate::from_bps(1200);     // 12%
    ///
    /// // ₹2000.00 × 12% = ₹240.00 (24000 paise)
    /// assert_eq!(charge.percent_of(rate).paise(), 24000);
    /// ```
    pub fn percent_of(&self, rate: TaxRate) -> Money {
        let paise = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(paise as i64)
    }

    /// Splits a non-negative amount into two halves that sum back exactly.
    ///
    /// The first half is rounded half-up to the paisa; the second half is
    /// derived by subtraction. `first + second == self` always holds, which
    /// is what keeps a CGST/SGST split reconcilable against the total.
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    ///
    /// let (a, b) = Money::from_paise(24000).split_half();
    /// assert_eq!((a.paise(), b.paise()), (12000, 12000));
    ///
    /// // Odd totals: the extra paisa lands on the first half
    /// let (a, b) = Money::from_paise(101).split_half();
    /// assert_eq!((a.paise(), b.paise()), (51, 50));
    /// assert_eq!((a + b).paise(), 101);
    /// ```
    pub fn split_half(&self) -> (Money, Money) {
        debug_assert!(self.0 >= 0, "split_half expects a non-negative amount");
        let first = (self.0 + 1) / 2;
        (Money(first), Money(self.0 - first))
    }

    /// Multiplies money by a count (nights, units).
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    ///
    /// let rate = Money::from_paise(200000);      // ₹2000.00 per night
    /// let room_charge = rate.multiply_count(3);  // 3 nights
    /// assert_eq!(room_charge.paise(), 600000);   // ₹6000.00
    /// ```
    #[inline]
    pub const fn multiply_count(&self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The desk UI formats amounts itself
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for night-count calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i32) -> Self {
        Money(self.0 * count as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
