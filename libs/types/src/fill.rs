//! Fill and match result types
//!
//! A fill is one execution between a taker and a maker. Fills are
//! created only inside the matching engine and never mutated.

use crate::ids::{FillId, OrderId};
use crate::numeric::{Amount, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How two orders were matched together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchPath {
    /// Standard counterparty match: a buy against a sell on the same
    /// outcome.
    Direct,
    /// A buy on one outcome against a buy on the complementary outcome
    /// whose prices sum to at least 100, forming a complete set that the
    /// mint can settle.
    Complementary,
}

/// A single execution between an incoming (taker) order and a resting
/// (maker) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub id: FillId,
    /// The incoming (aggressor) order that triggered this fill
    pub taker_order_id: OrderId,
    /// The resting order that was matched against
    pub maker_order_id: OrderId,
    /// Satoshis exchanged in this fill
    pub amount: Amount,
    /// Probability price at which this fill executed, expressed in the
    /// taker's own outcome terms
    pub execution_price: Price,
    pub path: MatchPath,
    pub filled_at: DateTime<Utc>,
}

impl Fill {
    pub fn new(
        taker_order_id: OrderId,
        maker_order_id: OrderId,
        amount: Amount,
        execution_price: Price,
        path: MatchPath,
        filled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: FillId::new(),
            taker_order_id,
            maker_order_id,
            amount,
            execution_price,
            path,
            filled_at,
        }
    }
}

/// Result of attempting to match an incoming order against the book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Zero or more fills produced by the match attempt
    pub fills: Vec<Fill>,
    /// Unfilled satoshi amount of the taker after all matches
    pub remaining_amount: Amount,
}

impl MatchResult {
    /// True if the taker was completely filled
    pub fn is_fully_matched(&self) -> bool {
        self.remaining_amount.is_zero()
    }

    /// Total amount executed across all fills
    pub fn filled_amount(&self) -> Amount {
        self.fills
            .iter()
            .fold(Amount::ZERO, |acc, fill| acc + fill.amount)
    }
}
