/// hist/axis.rs
///
/// # Fixed-Range Binning
///
/// An axis divides a fixed range [low, high] into `bins` regular bins of
/// uniform width. Storage built over an axis carries two extra sentinel
/// slots: slot 0 accumulates everything below the range (underflow) and
/// slot `bins + 1` everything above it (overflow), so a buffer over this
/// axis always has `bins + 2` slots.
///
/// Bin attribution for an in-range position is the truncating division
///
///   floor((pos - low) / ((high - low) / bins)) + 1
///
/// The overflow test is a strict `pos > high`, so the upper edge itself
/// belongs to the last regular bin rather than to overflow. Off-by-one bin
/// attribution at the edges is the classic regression for this kind of
/// container, which is why the boundary cases are pinned down in the tests
/// below.
use serde::{Deserialize, Serialize};

use crate::error::HistError;

/// Absolute tolerance on each axis edge when deciding whether two axes
/// describe the same binning.
pub const EDGE_TOLERANCE: f64 = 0.001;

/// A validated bin-count/range description.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BinAxis {
    bins: u32,
    low: f64,
    high: f64,
}

impl BinAxis {
    /// Create an axis over [low, high] with `bins` regular bins.
    ///
    /// Fails with [`HistError::InvalidShape`] if `bins` is zero, the range
    /// is inverted or degenerate, or either edge is non-finite.
    pub fn new(bins: u32, low: f64, high: f64) -> Result<Self, HistError> {
        if bins == 0 || !low.is_finite() || !high.is_finite() || high <= low {
            return Err(HistError::InvalidShape { bins, low, high });
        }
        Ok(BinAxis { bins, low, high })
    }

    pub fn bins(&self) -> u32 {
        self.bins
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Number of storage slots: the regular bins plus the two sentinels.
    pub fn storage_size(&self) -> usize {
        self.bins as usize + 2
    }

    /// Width of one regular bin.
    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.bins as f64
    }

    /// Index of the overflow sentinel slot.
    pub fn overflow_bin(&self) -> usize {
        self.bins as usize + 1
    }

    /// Map a position to its storage slot.
    ///
    /// Positions below the range map to slot 0 and positions strictly above
    /// it to slot `bins + 1`. The result of the truncating formula is
    /// clamped to the last regular bin so that `pos == high` stays regular
    /// even when the division rounds up.
    pub fn find_bin(&self, pos: f64) -> usize {
        if pos < self.low {
            return 0;
        }
        if pos > self.high {
            return self.overflow_bin();
        }
        let raw = ((pos - self.low) / self.bin_width()) as usize + 1;
        raw.min(self.bins as usize)
    }

    /// Whether another axis describes the same binning. Bin counts must
    /// match exactly; each edge may drift by at most [`EDGE_TOLERANCE`].
    pub fn compatible_with(&self, other: &BinAxis) -> bool {
        self.bins == other.bins
            && (self.low - other.low).abs() <= EDGE_TOLERANCE
            && (self.high - other.high).abs() <= EDGE_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_invalid_shapes() {
        assert!(BinAxis::new(0, 0.0, 1.0).is_err());
        assert!(BinAxis::new(10, 1.0, 1.0).is_err());
        assert!(BinAxis::new(10, 2.0, 1.0).is_err());
        assert!(BinAxis::new(10, f64::NAN, 1.0).is_err());
        assert!(BinAxis::new(10, 0.0, f64::INFINITY).is_err());
        assert!(BinAxis::new(1, -1.0, 1.0).is_ok());
    }

    #[test]
    fn test_storage_size() {
        let axis = BinAxis::new(10, 0.0, 10.0).unwrap();
        assert_eq!(axis.storage_size(), 12);
        assert_eq!(axis.overflow_bin(), 11);
        assert_eq!(axis.bin_width(), 1.0);
    }

    #[test]
    fn test_find_bin_boundaries() {
        let axis = BinAxis::new(10, 0.0, 10.0).unwrap();

        // Lower edge lands in the first regular bin
        assert_eq!(axis.find_bin(0.0), 1);
        // Upper edge lands in the last regular bin, not overflow
        assert_eq!(axis.find_bin(10.0), 10);
        // Strictly outside the range hits the sentinels
        assert_eq!(axis.find_bin(-0.0001), 0);
        assert_eq!(axis.find_bin(10.0001), 11);
    }

    #[test]
    fn test_find_bin_interior() {
        let axis = BinAxis::new(10, 0.0, 10.0).unwrap();
        assert_eq!(axis.find_bin(5.5), 6);
        assert_eq!(axis.find_bin(-1.0), 0);
        assert_eq!(axis.find_bin(0.999), 1);
        assert_eq!(axis.find_bin(1.0), 2); // internal edges belong to the right bin
        assert_eq!(axis.find_bin(9.999), 10);
    }

    #[test]
    fn test_find_bin_negative_range() {
        let axis = BinAxis::new(4, -2.0, 2.0).unwrap();
        assert_eq!(axis.find_bin(-2.0), 1);
        assert_eq!(axis.find_bin(-0.5), 2);
        assert_eq!(axis.find_bin(0.5), 3);
        assert_eq!(axis.find_bin(2.0), 4);
        assert_eq!(axis.find_bin(-3.0), 0);
        assert_eq!(axis.find_bin(3.0), 5);
    }

    #[test]
    fn test_compatibility_tolerance() {
        let axis = BinAxis::new(10, 0.0, 10.0).unwrap();

        let drifted = BinAxis::new(10, 0.0005, 10.0005).unwrap();
        assert!(axis.compatible_with(&drifted));

        let too_far = BinAxis::new(10, 0.002, 10.0).unwrap();
        assert!(!axis.compatible_with(&too_far));

        let wrong_bins = BinAxis::new(20, 0.0, 10.0).unwrap();
        assert!(!axis.compatible_with(&wrong_bins));
    }

    proptest! {
        #[test]
        fn prop_in_range_positions_stay_regular(
            bins in 1u32..500,
            pos in 0.0f64..1.0,
        ) {
            let axis = BinAxis::new(bins, 0.0, 1.0).unwrap();
            let bin = axis.find_bin(pos);
            prop_assert!(bin >= 1);
            prop_assert!(bin <= bins as usize);
        }

        #[test]
        fn prop_out_of_range_hits_sentinels(
            bins in 1u32..500,
            below in -1000.0f64..-0.0001,
            above in 1.0001f64..1000.0,
        ) {
            let axis = BinAxis::new(bins, 0.0, 1.0).unwrap();
            prop_assert_eq!(axis.find_bin(below), 0);
            prop_assert_eq!(axis.find_bin(above), bins as usize + 1);
        }
    }
}
