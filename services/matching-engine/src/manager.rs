//! Market to order book registry
//!
//! The only globally shared mutable state in the core. Books are
//! created lazily on first reference and live for the process lifetime;
//! eviction is out of scope. The map is sharded (dashmap), so creating
//! or resolving one market's book never blocks callers of another
//! market — the per-book lock inside [`OrderBook`] is a separate
//! concern.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;
use types::ids::MarketId;

use crate::book::OrderBook;

/// Concurrent registry mapping market identifiers to their order books.
#[derive(Default)]
pub struct OrderBookManager {
    books: DashMap<MarketId, Arc<OrderBook>>,
}

impl OrderBookManager {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    /// Resolve the book for a market, creating it on first reference.
    pub fn get_or_create(&self, market_id: &MarketId) -> Arc<OrderBook> {
        if let Some(book) = self.books.get(market_id) {
            return book.value().clone();
        }
        self.books
            .entry(market_id.clone())
            .or_insert_with(|| {
                info!(market = %market_id, "order book created");
                Arc::new(OrderBook::new(market_id.clone()))
            })
            .value()
            .clone()
    }

    /// The book for a market, or None if it was never touched.
    pub fn get(&self, market_id: &MarketId) -> Option<Arc<OrderBook>> {
        self.books.get(market_id).map(|book| book.value().clone())
    }

    /// Identifiers of every market with a book. Used by callers that
    /// must locate an order by id without knowing its market.
    pub fn market_ids(&self) -> Vec<MarketId> {
        self.books.iter().map(|entry| entry.key().clone()).collect()
    }
}
