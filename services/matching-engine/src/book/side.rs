//! One priority-ordered side of an outcome's book
//!
//! Price levels are kept in a BTreeMap for deterministic iteration;
//! each level holds a FIFO queue of order ids, which is what enforces
//! time priority at equal price. The side stores ids only: the single
//! mutable record for every resting order lives in the book's id index.

use std::collections::{BTreeMap, VecDeque};
use types::ids::OrderId;
use types::numeric::Price;

/// Which end of the price range matches first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PricePriority {
    /// Bids: highest price first
    HighestFirst,
    /// Asks: lowest price first
    LowestFirst,
}

/// A bid or ask side for one outcome, ordered by price priority and
/// FIFO within each price level.
#[derive(Debug, Clone)]
pub struct BookSide {
    levels: BTreeMap<Price, VecDeque<OrderId>>,
    priority: PricePriority,
}

impl BookSide {
    /// Create an empty buy side (highest price matches first)
    pub fn bids() -> Self {
        Self {
            levels: BTreeMap::new(),
            priority: PricePriority::HighestFirst,
        }
    }

    /// Create an empty sell side (lowest price matches first)
    pub fn asks() -> Self {
        Self {
            levels: BTreeMap::new(),
            priority: PricePriority::LowestFirst,
        }
    }

    /// Queue an order id at the back of its price level
    pub fn insert(&mut self, price: Price, order_id: OrderId) {
        self.levels.entry(price).or_default().push_back(order_id);
    }

    /// Remove an order id from its price level.
    ///
    /// Empty levels are dropped so `best_price` stays meaningful.
    /// Returns true if the id was present.
    pub fn remove(&mut self, price: Price, order_id: &OrderId) -> bool {
        let Some(queue) = self.levels.get_mut(&price) else {
            return false;
        };
        let Some(position) = queue.iter().position(|id| id == order_id) else {
            return false;
        };
        queue.remove(position);
        if queue.is_empty() {
            self.levels.remove(&price);
        }
        true
    }

    /// The best price on this side, if any
    pub fn best_price(&self) -> Option<Price> {
        match self.priority {
            PricePriority::HighestFirst => self.levels.keys().next_back().copied(),
            PricePriority::LowestFirst => self.levels.keys().next().copied(),
        }
    }

    /// All level prices, best first
    pub fn prices_in_priority(&self) -> Vec<Price> {
        match self.priority {
            PricePriority::HighestFirst => self.levels.keys().rev().copied().collect(),
            PricePriority::LowestFirst => self.levels.keys().copied().collect(),
        }
    }

    /// The FIFO queue at one price level
    pub fn level(&self, price: Price) -> Option<&VecDeque<OrderId>> {
        self.levels.get(&price)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of resting orders across all levels
    pub fn order_count(&self) -> usize {
        self.levels.values().map(VecDeque::len).sum()
    }
}
