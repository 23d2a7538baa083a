//! Order book depth snapshots
//!
//! Read-only projections of one market's live book, recomputed on
//! demand after every state-changing call and pushed to subscribers by
//! the broadcast collaborator.

use crate::ids::{MarketId, OutcomeId};
use crate::numeric::{Amount, Price};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single price level in the order book depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Probability price of this level
    pub price: Price,
    /// Total resting satoshi amount at this price
    pub amount: Amount,
}

/// Aggregated bid/ask depth for a single outcome within a market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSnapshot {
    /// Buy-side levels sorted by price descending (best bid first)
    pub bids: Vec<Level>,
    /// Sell-side levels sorted by price ascending (best ask first)
    pub asks: Vec<Level>,
    /// Best-ask price minus best-bid price. None if either side is empty.
    pub spread: Option<i32>,
}

/// Point-in-time snapshot of an entire market's order book, keyed by
/// outcome. Only outcomes with at least one resting order appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub market_id: MarketId,
    pub outcomes: HashMap<OutcomeId, OutcomeSnapshot>,
}

impl OrderBookSnapshot {
    /// An empty snapshot for a market with no resting orders
    pub fn empty(market_id: MarketId) -> Self {
        Self {
            market_id,
            outcomes: HashMap::new(),
        }
    }

    pub fn outcome(&self, outcome_id: &OutcomeId) -> Option<&OutcomeSnapshot> {
        self.outcomes.get(outcome_id)
    }
}
