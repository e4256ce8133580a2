//! Grouped time-series universe for the pair universe.
//!
//! This crate handles:
//! - Per-pair partitioning of a flat sample table
//! - Ascending time index over all samples
//! - Single-pair, cross-sectional and range queries
//! - Calibrating arbitrary instants to the prior indexed timestamp

pub mod grouped;
pub mod index;
pub mod partition;
pub mod samples;

pub use grouped::GroupedUniverse;
pub use index::TimeIndex;
pub use partition::KeyPartition;
pub use samples::Samples;
