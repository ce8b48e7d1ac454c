pub mod error;
pub mod export;
pub mod hist;
pub mod stats;

pub use error::HistError;
pub use export::{ExportHistogram, ExportKind, ExportTarget, PersistMode};
pub use hist::{BinAxis, BinValue, BinnedAccumulator, MergeReport};
pub use stats::AccumulatorStats;

#[cfg(test)]
pub(crate) mod test_utils;
