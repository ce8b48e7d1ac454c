// hist/accumulator.rs

use serde::{Deserialize, Serialize};
use tracing::error;

use super::axis::BinAxis;
use super::value::BinValue;
use crate::error::HistError;

/// Outcome of a batched [`BinnedAccumulator::merge`].
///
/// An empty batch produces `candidates == 0` and is a no-op. A non-empty
/// batch always completes; candidates that failed the compatibility check
/// are counted in `candidates` but not in `merged`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Candidates examined.
    pub candidates: usize,
    /// Candidates actually folded into the receiver.
    pub merged: usize,
}

impl MergeReport {
    /// True when the batch was empty and nothing was touched.
    pub fn is_noop(&self) -> bool {
        self.candidates == 0
    }
}

/// A fixed-range histogram that accumulates weighted observations into
/// contiguous bins and can be combined losslessly with independently filled
/// instances of the same shape.
///
/// Storage is `bins + 2` slots of `T`: slot 0 is the underflow accumulator,
/// slots 1..=bins the regular bins, slot `bins + 1` the overflow
/// accumulator. When error tracking is on, a parallel buffer accumulates
/// the sum of squared weights per slot; the exposed per-bin error is its
/// square root.
///
/// The container is not internally synchronized. Each producer fills its
/// own instance; a single reducer merges them once filling has stopped.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "")]
pub struct BinnedAccumulator<T: BinValue> {
    name: String,
    title: String,
    axis: BinAxis,
    content: Vec<T>,
    sumw2: Option<Vec<T>>,
    entries: u64,
}

impl<T: BinValue> BinnedAccumulator<T> {
    /// Create an accumulator with zeroed buffers.
    ///
    /// `track_errors` decides whether the squared-weight buffer exists for
    /// the lifetime of the instance. Fails with [`HistError::InvalidShape`]
    /// on a non-positive bin count or an inverted/degenerate range.
    pub fn new(
        name: &str,
        title: &str,
        bins: u32,
        low: f64,
        high: f64,
        track_errors: bool,
    ) -> Result<Self, HistError> {
        let axis = BinAxis::new(bins, low, high)?;
        let size = axis.storage_size();
        Ok(BinnedAccumulator {
            name: name.to_string(),
            title: title.to_string(),
            axis,
            content: vec![T::default(); size],
            sumw2: track_errors.then(|| vec![T::default(); size]),
            entries: 0,
        })
    }

    /// Element-wise scalar conversion from an accumulator over another
    /// numeric type. Shape, name and entry count are copied verbatim; no
    /// compatibility check is needed for a straight copy.
    pub fn from_other<U: BinValue>(other: &BinnedAccumulator<U>) -> Self {
        BinnedAccumulator {
            name: other.name.clone(),
            title: other.title.clone(),
            axis: other.axis,
            content: other.content.iter().map(|&v| T::convert_from(v)).collect(),
            sumw2: other
                .sumw2
                .as_ref()
                .map(|w2| w2.iter().map(|&v| T::convert_from(v)).collect()),
            entries: other.entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn axis(&self) -> &BinAxis {
        &self.axis
    }

    pub fn bins(&self) -> u32 {
        self.axis.bins()
    }

    pub fn low(&self) -> f64 {
        self.axis.low()
    }

    pub fn high(&self) -> f64 {
        self.axis.high()
    }

    /// Whether this instance owns a squared-weight buffer.
    pub fn tracks_errors(&self) -> bool {
        self.sumw2.is_some()
    }

    /// Number of fill operations applied, never weight-scaled.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Override the entry counter, e.g. when reconstructing authoritative
    /// state after a merge or deserialization.
    pub fn set_entries(&mut self, entries: u64) {
        self.entries = entries;
    }

    /// Storage slot for a position, sentinels included.
    pub fn find_bin(&self, pos: f64) -> usize {
        self.axis.find_bin(pos)
    }

    /// Attribute one weighted observation to its resolved bin.
    ///
    /// A non-finite position or weight is a contract violation, not a
    /// tolerated input: it is reported at the highest severity and returned
    /// as [`HistError::InvalidInput`] without touching any bin. Most
    /// histogram libraries coerce or drop such input; failing fast here is
    /// deliberate.
    pub fn fill(&mut self, pos: f64, weight: T) -> Result<(), HistError> {
        if !pos.is_finite() || !weight.is_finite_value() {
            error!(
                accumulator = %self.name,
                pos,
                weight = weight.to_f64(),
                "fatal: non-finite fill input"
            );
            return Err(HistError::InvalidInput {
                name: self.name.clone(),
                pos,
                weight: weight.to_f64(),
            });
        }

        let bin = self.axis.find_bin(pos);
        self.content[bin] += weight;
        if let Some(w2) = self.sumw2.as_mut() {
            w2[bin] += weight * weight;
        }
        self.entries += 1;
        Ok(())
    }

    /// Direct slot read. Callers own the range check: panics if
    /// `bin > bins + 1`.
    pub fn bin_content(&self, bin: usize) -> T {
        self.content[bin]
    }

    /// Direct slot write. Panics if `bin > bins + 1`.
    pub fn set_bin_content(&mut self, bin: usize, value: T) {
        self.content[bin] = value;
    }

    /// Checked variant of [`Self::bin_content`].
    pub fn try_bin_content(&self, bin: usize) -> Option<T> {
        self.content.get(bin).copied()
    }

    /// Statistical uncertainty of a slot: the square root of the
    /// accumulated squared weights, or zero when errors are not tracked.
    /// Panics if `bin > bins + 1`.
    pub fn bin_error(&self, bin: usize) -> T {
        match &self.sumw2 {
            Some(w2) => w2[bin].sqrt_value(),
            None => T::default(),
        }
    }

    /// Store an error value, keeping the "stored = squared" convention.
    /// No-op when errors are not tracked. Panics if `bin > bins + 1`.
    pub fn set_bin_error(&mut self, bin: usize, value: T) {
        if let Some(w2) = self.sumw2.as_mut() {
            w2[bin] = value * value;
        }
    }

    fn incompatibility(&self, other: &Self) -> Option<HistError> {
        let reason = if !self.axis.compatible_with(&other.axis) {
            format!(
                "axis mismatch: {} bins over [{}, {}] vs {} bins over [{}, {}]",
                self.bins(),
                self.low(),
                self.high(),
                other.bins(),
                other.low(),
                other.high()
            )
        } else if self.tracks_errors() != other.tracks_errors() {
            format!(
                "error tracking mismatch: {} vs {}",
                self.tracks_errors(),
                other.tracks_errors()
            )
        } else {
            return None;
        };
        Some(HistError::IncompatibleMerge {
            candidate: other.name.clone(),
            reason,
        })
    }

    /// Fold a batch of independently filled accumulators into this one.
    ///
    /// Compatible candidates are added element-wise over every storage slot
    /// (sentinels included), squared weights likewise when tracked, and
    /// their entry counts are summed. Incompatible candidates are reported
    /// at ERROR severity and skipped; one bad candidate never aborts the
    /// batch. Over compatible inputs the operation is commutative and
    /// associative, so a distributed reduction may combine partial results
    /// in any order.
    ///
    /// Candidates are `&Self`, so a type mismatch is impossible by
    /// construction rather than checked at runtime.
    pub fn merge<'a, I>(&mut self, others: I) -> MergeReport
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut report = MergeReport::default();
        for other in others {
            report.candidates += 1;
            if let Some(err) = self.incompatibility(other) {
                error!(receiver = %self.name, %err, "skipping merge candidate");
                continue;
            }
            for (dst, &src) in self.content.iter_mut().zip(&other.content) {
                *dst += src;
            }
            if let (Some(dst), Some(src)) = (self.sumw2.as_mut(), other.sumw2.as_ref()) {
                for (d, &s) in dst.iter_mut().zip(src) {
                    *d += s;
                }
            }
            self.entries += other.entries;
            report.merged += 1;
        }
        report
    }
}
