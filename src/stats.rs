// src/stats.rs

use serde::{Deserialize, Serialize};

use crate::hist::{BinValue, BinnedAccumulator};

/// Summary statistics over a filled accumulator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccumulatorStats {
    // Overall stats
    pub entries: u64,
    pub sum_weights: f64,
    pub underflow: f64,
    pub overflow: f64,

    // Weighted moments over the regular bins (bin centers)
    pub mean: f64,
    pub std_dev: f64,

    // Occupancy analysis
    pub bins_occupied: u32,
    pub total_bins: u32,
    pub occupancy: f64, // percentage of regular bins holding weight
    pub max_bin: usize,
    pub max_bin_weight: f64,
}

impl AccumulatorStats {
    /// Analyze an accumulator's regular bins and sentinels.
    ///
    /// Moments are computed over bin centers, weighted by bin content;
    /// underflow and overflow are reported separately and excluded from the
    /// moments since they have no meaningful center.
    pub fn analyze<T: BinValue>(acc: &BinnedAccumulator<T>) -> Self {
        let bins = acc.bins();
        let width = acc.axis().bin_width();
        let low = acc.low();

        let mut sum_w = 0.0;
        let mut sum_wx = 0.0;
        let mut sum_wx2 = 0.0;
        let mut occupied = 0u32;
        let mut max_bin = 0usize;
        let mut max_weight = 0.0;

        for bin in 1..=bins as usize {
            let w = acc.bin_content(bin).to_f64();
            if w != 0.0 {
                occupied += 1;
            }
            if w > max_weight {
                max_weight = w;
                max_bin = bin;
            }
            let center = low + (bin as f64 - 0.5) * width;
            sum_w += w;
            sum_wx += w * center;
            sum_wx2 += w * center * center;
        }

        let mean = if sum_w != 0.0 { sum_wx / sum_w } else { 0.0 };
        let variance = if sum_w != 0.0 {
            (sum_wx2 / sum_w - mean * mean).max(0.0)
        } else {
            0.0
        };

        AccumulatorStats {
            entries: acc.entries(),
            sum_weights: sum_w,
            underflow: acc.bin_content(0).to_f64(),
            overflow: acc.bin_content(acc.axis().overflow_bin()).to_f64(),
            mean,
            std_dev: variance.sqrt(),
            bins_occupied: occupied,
            total_bins: bins,
            occupancy: occupied as f64 / bins as f64 * 100.0,
            max_bin,
            max_bin_weight: max_weight,
        }
    }

    /// Generate a detailed text report of the accumulator's contents.
    pub fn report(&self) -> String {
        let mut report = String::new();

        report.push_str("\nAccumulator Analysis\n");
        report.push_str("====================\n\n");
        report.push_str(&format!("Entries: {}\n", self.entries));
        report.push_str(&format!("Sum of weights: {:.4}\n", self.sum_weights));
        report.push_str(&format!("Mean: {:.4}\n", self.mean));
        report.push_str(&format!("Std dev: {:.4}\n", self.std_dev));
        report.push_str(&format!("Underflow: {:.4}\n", self.underflow));
        report.push_str(&format!("Overflow: {:.4}\n", self.overflow));
        report.push_str(&format!(
            "Occupancy: {}/{} bins ({:.2}%)\n",
            self.bins_occupied, self.total_bins, self.occupancy
        ));
        report.push_str(&format!(
            "Heaviest bin: {} ({:.4})\n",
            self.max_bin, self.max_bin_weight
        ));

        if self.underflow != 0.0 || self.overflow != 0.0 {
            report.push_str("\nNote: weight outside the axis range is excluded from the moments\n");
        }

        report
    }

    /// Print a condensed summary of the most important stats.
    pub fn print_summary(&self) {
        println!("\nAccumulator Summary");
        println!("===================");
        println!("Entries: {}", self.entries);
        println!("Sum of weights: {:.4}", self.sum_weights);
        println!("Mean: {:.4} +/- {:.4}", self.mean, self.std_dev);
        println!("Occupancy: {:.2}%", self.occupancy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pattern() {
        let mut acc = BinnedAccumulator::<f64>::new("s", "stats", 4, 0.0, 4.0, true).unwrap();
        acc.fill(0.5, 1.0).unwrap(); // bin 1, center 0.5
        acc.fill(2.5, 1.0).unwrap(); // bin 3, center 2.5
        acc.fill(-1.0, 2.0).unwrap(); // underflow
        acc.fill(9.0, 3.0).unwrap(); // overflow

        let stats = AccumulatorStats::analyze(&acc);
        assert_eq!(stats.entries, 4);
        assert_eq!(stats.sum_weights, 2.0);
        assert_eq!(stats.underflow, 2.0);
        assert_eq!(stats.overflow, 3.0);
        assert_eq!(stats.mean, 1.5);
        assert_eq!(stats.std_dev, 1.0);
        assert_eq!(stats.bins_occupied, 2);
        assert_eq!(stats.occupancy, 50.0);
        assert_eq!(stats.max_bin, 1); // equal weights, first wins
        assert_eq!(stats.max_bin_weight, 1.0);
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = BinnedAccumulator::<f64>::new("e", "empty", 10, 0.0, 1.0, true).unwrap();
        let stats = AccumulatorStats::analyze(&acc);
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.bins_occupied, 0);
    }

    #[test]
    fn test_report_mentions_flows() {
        let mut acc = BinnedAccumulator::<f64>::new("r", "report", 4, 0.0, 4.0, true).unwrap();
        acc.fill(-1.0, 1.0).unwrap();
        let report = AccumulatorStats::analyze(&acc).report();
        assert!(report.contains("Underflow: 1.0000"));
        assert!(report.contains("excluded from the moments"));
    }
}
