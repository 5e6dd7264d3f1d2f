//! # GST Tax Engine
//!
//! Slab selection and CGST/SGST splitting for room tariffs.
//!
//! ## How GST Applies to Room Tariffs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  nightly rate < ₹7500.00  →  12% slab                                  │
//! │  nightly rate ≥ ₹7500.00  →  18% slab                                  │
//! │                                                                         │
//! │  The slab is chosen from the PER-NIGHT rate, never the stay total,     │
//! │  and is frozen on the booking at creation. Checkout re-derives tax     │
//! │  amounts from the frozen slab against the final taxable base.          │
//! │                                                                         │
//! │  total tax  = taxable base × slab          (rounded half-up, once)     │
//! │  cgst       = half of total, rounded half-up                           │
//! │  sgst       = total − cgst                                              │
//! │                                                                         │
//! │  cgst + sgst == total tax, to the paisa, always.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure and deterministic: same rate and policy in, same breakdown out.
//! Negative rates are rejected by callers before they get here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

// =============================================================================
// Policy
// =============================================================================

/// GST slab configuration for a tenant.
///
/// Defaults match the hotel-tariff GST rules: ₹7500.00 threshold,
/// 12% low slab, 18% high slab, extras tax-exempt.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GstPolicy {
    /// Nightly rates at or above this fall into the high slab.
    pub threshold: Money,
    /// Slab applied below the threshold.
    pub low_slab: TaxRate,
    /// Slab applied at or above the threshold.
    pub high_slab: TaxRate,
    /// When set, extra charges and late fees join the taxable base at
    /// checkout. Off by default: extras are tax-exempt additions.
    pub extras_taxable: bool,
}

impl Default for GstPolicy {
    fn default() -> Self {
        GstPolicy {
            threshold: Money::from_rupees(7500, 0),
            low_slab: TaxRate::from_bps(1200),
            high_slab: TaxRate::from_bps(1800),
            extras_taxable: false,
        }
    }
}

impl GstPolicy {
    /// Selects the slab for a nightly rate.
    pub fn slab_for(&self, rate_per_night: Money) -> TaxRate {
        if rate_per_night < self.threshold {
            self.low_slab
        } else {
            self.high_slab
        }
    }

    /// Computes the CGST/SGST breakdown of `taxable` at a given slab.
    ///
    /// The total tax is rounded half-up to the paisa once; the halves are
    /// then split with half-up on the first component only, so the split
    /// reassembles the total exactly.
    pub fn breakdown(&self, taxable: Money, slab: TaxRate) -> GstBreakdown {
        let total = taxable.percent_of(slab);
        let (cgst, sgst) = total.split_half();
        GstBreakdown { slab, cgst, sgst }
    }

    /// Slab selection and breakdown in one step, for callers taxing a
    /// single night at the nightly rate.
    ///
    /// ## Example
    /// ```rust
    /// use frontdesk_core::money::Money;
    /// use frontdesk_core::tax::GstPolicy;
    ///
    /// let policy = GstPolicy::default();
    /// let gst = policy.compute(Money::from_rupees(2000, 0));
    ///
    /// assert_eq!(gst.slab.bps(), 1200);          // below ₹7500 → 12%
    /// assert_eq!(gst.cgst.paise(), 12000);       // ₹120.00
    /// assert_eq!(gst.sgst.paise(), 12000);       // ₹120.00
    /// ```
    pub fn compute(&self, rate_per_night: Money) -> GstBreakdown {
        self.breakdown(rate_per_night, self.slab_for(rate_per_night))
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// The result of a GST computation: slab used and the two equal halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GstBreakdown {
    /// Slab the amounts were derived from.
    pub slab: TaxRate,
    /// Central half.
    pub cgst: Money,
    /// State half.
    pub sgst: Money,
}

impl GstBreakdown {
    /// Total tax; equals `cgst + sgst` exactly by construction.
    #[inline]
    pub fn total(&self) -> Money {
        self.cgst + self.sgst
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_slab_below_threshold() {
        let policy = GstPolicy::default();
        let gst = policy.compute(Money::from_rupees(1999, 0));

        assert_eq!(gst.slab.bps(), 1200);
        // 12% of ₹1999.00 = ₹239.88 → 119.94 each
        assert_eq!(gst.total().paise(), 23988);
        assert_eq!(gst.cgst.paise(), 11994);
        assert_eq!(gst.sgst.paise(), 11994);
    }

    #[test]
    fn test_high_slab_above_threshold() {
        let policy = GstPolicy::default();
        let gst = policy.compute(Money::from_rupees(9999, 0));

        assert_eq!(gst.slab.bps(), 1800);
        // 18% of ₹9999.00 = ₹1799.82
        assert_eq!(gst.total().paise(), 179982);
        assert_eq!((gst.cgst + gst.sgst).paise(), 179982);
    }

    #[test]
    fn test_threshold_exact_takes_high_slab() {
        let policy = GstPolicy::default();
        assert_eq!(policy.slab_for(Money::from_rupees(7500, 0)).bps(), 1800);
        assert_eq!(policy.slab_for(Money::from_paise(749999)).bps(), 1200);
    }

    #[test]
    fn test_split_reassembles_total_exactly() {
        let policy = GstPolicy::default();
        // Rates chosen to exercise odd-paisa totals in both slabs
        for rate_paise in [1, 99, 12345, 199900, 749999, 750000, 999901] {
            let rate = Money::from_paise(rate_paise);
            let gst = policy.compute(rate);
            let expected_total = rate.percent_of(gst.slab);
            assert_eq!(
                gst.total(),
                expected_total,
                "split must reassemble exactly for rate {rate_paise}"
            );
        }
    }

    #[test]
    fn test_breakdown_uses_caller_slab_not_base() {
        // Checkout taxes the full room charge against the slab frozen from
        // the nightly rate: a ₹2000/night stay of 5 nights is a ₹10000 base
        // still taxed at 12%.
        let policy = GstPolicy::default();
        let slab = policy.slab_for(Money::from_rupees(2000, 0));
        let gst = policy.breakdown(Money::from_rupees(10000, 0), slab);

        assert_eq!(gst.slab.bps(), 1200);
        assert_eq!(gst.total().paise(), 120000); // ₹1200.00
    }

    #[test]
    fn test_deterministic() {
        let policy = GstPolicy::default();
        let rate = Money::from_paise(333333);
        assert_eq!(policy.compute(rate), policy.compute(rate));
    }
}
