//! Events emitted to the broadcast and settlement collaborators
//!
//! The core performs no pushing itself: after a state-changing call the
//! API layer assembles the event batch here and hands it to the
//! real-time transport. Complementary fills additionally signal the
//! mint that a complete set was formed and is eligible for settlement.

use serde::{Deserialize, Serialize};
use types::fill::{Fill, MatchPath, MatchResult};
use types::ids::{FillId, MarketId};
use types::numeric::{Amount, Price};
use types::order::{Order, Side};
use types::snapshot::OrderBookSnapshot;

use crate::book::OrderBook;

/// A market-scoped event for subscribers of that market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// One execution happened
    FillExecuted {
        market_id: MarketId,
        taker_side: Side,
        fill: Fill,
    },
    /// A complementary fill funded a complete set; the mint can settle
    /// it without an opposing seller
    CompleteSetFormed {
        market_id: MarketId,
        fill_id: FillId,
        amount: Amount,
        execution_price: Price,
    },
    /// Fresh depth after a state-changing call
    OrderBookUpdated {
        market_id: MarketId,
        snapshot: OrderBookSnapshot,
    },
}

/// Assemble the broadcast batch for one submit: every fill (with its
/// settlement signal where complementary), then the fresh snapshot.
pub fn after_submit(book: &OrderBook, taker: &Order, result: &MatchResult) -> Vec<MarketEvent> {
    let market_id = book.market_id().clone();
    let mut events = Vec::with_capacity(result.fills.len() + 1);

    for fill in &result.fills {
        events.push(MarketEvent::FillExecuted {
            market_id: market_id.clone(),
            taker_side: taker.side,
            fill: fill.clone(),
        });
        if fill.path == MatchPath::Complementary {
            events.push(MarketEvent::CompleteSetFormed {
                market_id: market_id.clone(),
                fill_id: fill.id,
                amount: fill.amount,
                execution_price: fill.execution_price,
            });
        }
    }

    events.push(MarketEvent::OrderBookUpdated {
        market_id,
        snapshot: book.snapshot(),
    });
    events
}

/// The broadcast batch for one cancel: just the fresh snapshot.
pub fn after_cancel(book: &OrderBook) -> Vec<MarketEvent> {
    vec![MarketEvent::OrderBookUpdated {
        market_id: book.market_id().clone(),
        snapshot: book.snapshot(),
    }]
}
