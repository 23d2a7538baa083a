//! Order lifecycle types
//!
//! An order is created by the API layer from a validated request,
//! matched (and possibly mutated) by the engine, and either rests on
//! the book or is returned to the caller with its final state.

use crate::errors::ValidationError;
use crate::ids::{MarketId, OrderId, OutcomeId, UserId};
use crate::numeric::{Amount, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of an order relative to the outcome token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buying outcome tokens (long the outcome)
    Buy,
    /// Selling outcome tokens (short the outcome)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Execution semantics of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    /// Rests on the book at the specified price until filled or cancelled
    Limit,
    /// Executes immediately against available liquidity; the unfilled
    /// remainder is discarded, never rested
    Market,
}

/// A resting or incoming order on the matching engine's order book.
///
/// `remaining_amount` starts equal to `amount` and only ever decreases;
/// zero means fully filled. Once resting, the book holds the single
/// mutable record for the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub market_id: MarketId,
    pub outcome_id: OutcomeId,
    pub side: Side,
    pub kind: OrderKind,
    /// Probability price in [1, 99]. Always present for limit orders,
    /// always absent for market orders.
    pub price: Option<Price>,
    /// Total order size in satoshis.
    pub amount: Amount,
    /// Unfilled portion of the order.
    pub remaining_amount: Amount,
    pub user_id: UserId,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Build an order from untrusted request fields.
    ///
    /// Rejects limit orders without a price and zero amounts. A price
    /// supplied with a market order is ignored, matching the submit
    /// contract ("required for Limit, ignored for Market").
    pub fn try_new(
        market_id: MarketId,
        outcome_id: OutcomeId,
        side: Side,
        kind: OrderKind,
        price: Option<Price>,
        amount: Amount,
        user_id: UserId,
        placed_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if amount.is_zero() {
            return Err(ValidationError::ZeroAmount);
        }
        let price = match kind {
            OrderKind::Limit => Some(price.ok_or(ValidationError::MissingPrice)?),
            OrderKind::Market => None,
        };
        Ok(Self {
            id: OrderId::new(),
            market_id,
            outcome_id,
            side,
            kind,
            price,
            amount,
            remaining_amount: amount,
            user_id,
            placed_at,
        })
    }

    /// Create a limit order from known-good values.
    ///
    /// # Panics
    /// Panics if `amount` is zero.
    pub fn limit(
        market_id: MarketId,
        outcome_id: OutcomeId,
        side: Side,
        price: Price,
        amount: Amount,
        user_id: UserId,
        placed_at: DateTime<Utc>,
    ) -> Self {
        assert!(!amount.is_zero(), "order amount must be positive");
        Self {
            id: OrderId::new(),
            market_id,
            outcome_id,
            side,
            kind: OrderKind::Limit,
            price: Some(price),
            amount,
            remaining_amount: amount,
            user_id,
            placed_at,
        }
    }

    /// Create a market order from known-good values.
    ///
    /// # Panics
    /// Panics if `amount` is zero.
    pub fn market(
        market_id: MarketId,
        outcome_id: OutcomeId,
        side: Side,
        amount: Amount,
        user_id: UserId,
        placed_at: DateTime<Utc>,
    ) -> Self {
        assert!(!amount.is_zero(), "order amount must be positive");
        Self {
            id: OrderId::new(),
            market_id,
            outcome_id,
            side,
            kind: OrderKind::Market,
            price: None,
            amount,
            remaining_amount: amount,
            user_id,
            placed_at,
        }
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining_amount.is_zero()
    }

    /// Total amount executed so far
    pub fn filled_amount(&self) -> Amount {
        self.amount - self.remaining_amount
    }

    /// Reduce the remaining amount by one fill.
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining amount.
    pub fn fill(&mut self, fill_amount: Amount) {
        assert!(
            fill_amount <= self.remaining_amount,
            "fill {} exceeds remaining amount {}",
            fill_amount,
            self.remaining_amount
        );
        self.remaining_amount = self.remaining_amount - fill_amount;
    }
}
