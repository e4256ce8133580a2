//! Core types and configuration for the pair universe.
//!
//! This crate provides shared types used across all other crates:
//! - Flat sample tables and cells
//! - Time buckets and UTC timestamp handling
//! - Trading pair descriptors
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod pair;
pub mod table;
pub mod types;

pub use config::UniverseConfig;
pub use error::{Error, Result};
pub use pair::{PairDescriptor, TradingPair};
pub use table::{RowRef, Table, Value};
pub use types::*;
