//! Trading pair descriptors.
//!
//! Only the pair id matters to the universe; the rest of the metadata rides
//! along for callers.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::table::RowRef;
use crate::types::{PairId, PAIR_ID_COLUMN};

/// Trading pair metadata, as listed in the server's pair table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPair {
    /// Primary key, matching `pair_id` in sample tables.
    pub pair_id: PairId,
    #[serde(default)]
    pub exchange_id: Option<u64>,
    #[serde(default)]
    pub base_token_symbol: Option<String>,
    #[serde(default)]
    pub quote_token_symbol: Option<String>,
    /// Pool contract address, lowercase.
    #[serde(default)]
    pub address: Option<String>,
}

impl TradingPair {
    pub fn new(pair_id: PairId) -> Self {
        Self {
            pair_id,
            exchange_id: None,
            base_token_symbol: None,
            quote_token_symbol: None,
            address: None,
        }
    }
}

/// Something that identifies a single trading pair.
///
/// Resolution fails with [`Error::InvalidArgument`] when the value does not
/// have the shape of a trading pair.
pub trait PairDescriptor {
    fn resolve_pair_id(&self) -> Result<PairId>;
}

impl PairDescriptor for TradingPair {
    fn resolve_pair_id(&self) -> Result<PairId> {
        Ok(self.pair_id)
    }
}

impl PairDescriptor for serde_json::Value {
    fn resolve_pair_id(&self) -> Result<PairId> {
        if !self.is_object() {
            return Err(Error::invalid_argument(format!("expected a trading pair, got {self}")));
        }
        let pair = TradingPair::deserialize(self)
            .map_err(|e| Error::invalid_argument(format!("expected a trading pair: {e}")))?;
        Ok(pair.pair_id)
    }
}

impl PairDescriptor for RowRef<'_> {
    fn resolve_pair_id(&self) -> Result<PairId> {
        let value = self.get(PAIR_ID_COLUMN).ok_or_else(|| {
            Error::invalid_argument(format!("expected a trading pair row, row has no {PAIR_ID_COLUMN:?}"))
        })?;
        value.as_pair_id().ok_or_else(|| {
            Error::invalid_argument(format!("expected an unsigned pair id, got {} {value}", value.type_name()))
        })
    }
}

impl<T: PairDescriptor + ?Sized> PairDescriptor for &T {
    fn resolve_pair_id(&self) -> Result<PairId> {
        (**self).resolve_pair_id()
    }
}
