pub mod accumulator;
pub mod axis;
pub mod value;

pub use accumulator::{BinnedAccumulator, MergeReport};
pub use axis::BinAxis;
pub use value::BinValue;
