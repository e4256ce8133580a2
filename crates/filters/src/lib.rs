//! Flat-table preprocessing for the pair universe.
//!
//! This crate handles:
//! - Narrowing a sample table to a set of trading pairs
//! - Narrowing a sample table to a single trading pair
//!
//! Typically run before building a grouped universe, so the universe only
//! indexes the pairs a strategy trades.

pub mod pair_filter;

pub use pair_filter::{
    filter_column_for_pair_ids, filter_for_pair_ids, filter_for_pairs, filter_for_single_pair,
};
