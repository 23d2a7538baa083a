//! Per-market order book
//!
//! Owns one market's matching state and guarantees serialized, atomic
//! order processing: the match, write-back and rest steps of a submit
//! run under one per-book lock, so a concurrent cancel or second submit
//! can never observe a half-updated book. Distinct markets share
//! nothing and proceed fully in parallel.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::debug;
use types::fill::MatchResult;
use types::ids::{MarketId, OrderId, OutcomeId};
use types::numeric::Amount;
use types::order::{Order, OrderKind, Side};
use types::snapshot::{Level, OrderBookSnapshot, OutcomeSnapshot};

use crate::book::side::BookSide;
use crate::matching::engine;

/// The bid and ask queues for one outcome.
#[derive(Debug)]
struct OutcomeSides {
    bids: BookSide,
    asks: BookSide,
}

impl Default for OutcomeSides {
    fn default() -> Self {
        Self {
            bids: BookSide::bids(),
            asks: BookSide::asks(),
        }
    }
}

/// Book state guarded by the per-market lock.
///
/// Invariant: every order in `orders` sits in exactly one side queue of
/// its outcome (and vice versa) and has a positive remaining amount.
#[derive(Debug)]
struct BookState {
    outcomes: HashMap<OutcomeId, OutcomeSides>,
    /// Id index and arena: the single mutable record per resting order.
    orders: HashMap<OrderId, Order>,
    /// Complement links established at construction, keyed by the
    /// uppercased outcome label.
    complements: HashMap<String, OutcomeId>,
}

impl BookState {
    fn ensure_outcome(&mut self, outcome_id: &OutcomeId) {
        if !self.outcomes.contains_key(outcome_id) {
            self.outcomes.insert(outcome_id.clone(), OutcomeSides::default());
        }
    }

    /// The registered complement for an outcome, looked up
    /// case-insensitively. None for categorical outcomes.
    fn complement_of(&self, outcome_id: &OutcomeId) -> Option<&OutcomeId> {
        self.complements.get(&outcome_id.as_str().to_ascii_uppercase())
    }
}

/// Order book for a single market.
pub struct OrderBook {
    market_id: MarketId,
    state: Mutex<BookState>,
}

impl OrderBook {
    /// Create a book for a binary market with the standard YES/NO
    /// complement pair.
    pub fn new(market_id: MarketId) -> Self {
        Self::with_complements(market_id, &[(OutcomeId::new("YES"), OutcomeId::new("NO"))])
    }

    /// Create a book with explicit complement pairs supplied at market
    /// creation. Pass no pairs for a categorical market, whose outcomes
    /// never complementary-match.
    ///
    /// # Panics
    /// Panics if a pair maps an outcome to itself.
    pub fn with_complements(market_id: MarketId, pairs: &[(OutcomeId, OutcomeId)]) -> Self {
        let mut complements = HashMap::new();
        for (a, b) in pairs {
            let key_a = a.as_str().to_ascii_uppercase();
            let key_b = b.as_str().to_ascii_uppercase();
            assert_ne!(key_a, key_b, "an outcome cannot be its own complement");
            complements.insert(key_a, b.clone());
            complements.insert(key_b, a.clone());
        }
        Self {
            market_id,
            state: Mutex::new(BookState {
                outcomes: HashMap::new(),
                orders: HashMap::new(),
                complements,
            }),
        }
    }

    pub fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    /// Match an incoming order and rest any limit remainder.
    ///
    /// Returns the match outcome together with the order in its final
    /// state. If the order rested, the book now holds its sole mutable
    /// record and the returned value is a point-in-time copy.
    pub fn submit(&self, mut order: Order) -> (MatchResult, Order) {
        let mut state = self.state.lock();
        let filled_at = Utc::now();

        // Complementary liquidity is the complement outcome's bids, and
        // only buy takers may use it (a sell already has a direct
        // counterparty in token holders).
        let complement = match order.side {
            Side::Buy => state.complement_of(&order.outcome_id).cloned(),
            Side::Sell => None,
        };

        state.ensure_outcome(&order.outcome_id);
        if let Some(complement_id) = &complement {
            state.ensure_outcome(complement_id);
        }

        let BookState { outcomes, orders, .. } = &mut *state;

        let result = match &complement {
            Some(complement_id) => {
                // Two outcomes are touched in one call; complement
                // registration rejects self-pairs, so the keys are
                // always disjoint.
                let [own, other] = outcomes.get_disjoint_mut([&order.outcome_id, complement_id]);
                let own = own.expect("taker outcome sides present");
                let other = other.expect("complement outcome sides present");
                let direct = match order.side {
                    Side::Buy => &mut own.asks,
                    Side::Sell => &mut own.bids,
                };
                engine::match_order(&mut order, direct, Some(&mut other.bids), orders, filled_at)
            }
            None => {
                let own = outcomes
                    .get_mut(&order.outcome_id)
                    .expect("taker outcome sides present");
                let direct = match order.side {
                    Side::Buy => &mut own.asks,
                    Side::Sell => &mut own.bids,
                };
                engine::match_order(&mut order, direct, None, orders, filled_at)
            }
        };
        debug_assert_eq!(order.remaining_amount, result.remaining_amount);

        // Rest the remainder. Market orders are immediate-or-cancel:
        // their unfilled portion is returned, never rested.
        if !result.remaining_amount.is_zero() && order.kind == OrderKind::Limit {
            let price = order.price.expect("limit order without price");
            let own = outcomes
                .get_mut(&order.outcome_id)
                .expect("taker outcome sides present");
            let resting = match order.side {
                Side::Buy => &mut own.bids,
                Side::Sell => &mut own.asks,
            };
            resting.insert(price, order.id);
            orders.insert(order.id, order.clone());
        }

        debug!(
            market = %self.market_id,
            order = %order.id,
            fills = result.fills.len(),
            remaining = %result.remaining_amount,
            "order submitted"
        );

        (result, order)
    }

    /// Remove a resting order.
    ///
    /// An unknown id is a plain negative result: the order may have
    /// been fully filled, never rested, or already cancelled.
    pub fn cancel(&self, order_id: OrderId) -> bool {
        let mut state = self.state.lock();

        let Some(order) = state.orders.remove(&order_id) else {
            return false;
        };

        let sides = state
            .outcomes
            .get_mut(&order.outcome_id)
            .expect("resting order without outcome sides");
        let resting = match order.side {
            Side::Buy => &mut sides.bids,
            Side::Sell => &mut sides.asks,
        };
        let price = order.price.expect("resting order without price");
        let removed = resting.remove(price, &order_id);
        assert!(removed, "resting order missing from side queue");

        debug!(market = %self.market_id, order = %order_id, "order cancelled");
        true
    }

    /// Project the current depth per outcome, aggregated by price.
    ///
    /// Computed from live state on every call; never cached.
    pub fn snapshot(&self) -> OrderBookSnapshot {
        let state = self.state.lock();

        let mut outcomes = HashMap::new();
        for (outcome_id, sides) in &state.outcomes {
            if sides.bids.is_empty() && sides.asks.is_empty() {
                continue;
            }
            let spread = match (sides.bids.best_price(), sides.asks.best_price()) {
                (Some(bid), Some(ask)) => Some(i32::from(ask.value()) - i32::from(bid.value())),
                _ => None,
            };
            outcomes.insert(
                outcome_id.clone(),
                OutcomeSnapshot {
                    bids: depth_levels(&sides.bids, &state.orders),
                    asks: depth_levels(&sides.asks, &state.orders),
                    spread,
                },
            );
        }

        OrderBookSnapshot {
            market_id: self.market_id.clone(),
            outcomes,
        }
    }
}

/// Aggregate one side into depth levels, best price first.
fn depth_levels(side: &BookSide, orders: &HashMap<OrderId, Order>) -> Vec<Level> {
    side.prices_in_priority()
        .into_iter()
        .map(|price| {
            let queue = side.level(price).expect("listed price level missing");
            let amount = queue.iter().fold(Amount::ZERO, |total, order_id| {
                let order = orders
                    .get(order_id)
                    .expect("resting order missing from id index");
                total + order.remaining_amount
            });
            Level { price, amount }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::UserId;
    use types::numeric::Price;

    fn price(value: i64) -> Price {
        Price::try_new(value).unwrap()
    }

    fn sats(value: u64) -> Amount {
        Amount::from_sats(value)
    }

    fn book() -> OrderBook {
        OrderBook::new(MarketId::new("cond-1"))
    }

    fn limit(outcome: &str, side: Side, price_value: i64, amount: u64) -> Order {
        Order::limit(
            MarketId::new("cond-1"),
            OutcomeId::new(outcome),
            side,
            price(price_value),
            sats(amount),
            UserId::new("npub-a"),
            Utc::now(),
        )
    }

    #[test]
    fn test_limit_order_rests_when_unmatched() {
        let book = book();
        let order = limit("YES", Side::Buy, 55, 100);
        let id = order.id;

        let (result, placed) = book.submit(order);

        assert!(result.fills.is_empty());
        assert_eq!(result.remaining_amount, sats(100));
        assert_eq!(placed.remaining_amount, sats(100));

        let snap = book.snapshot();
        let yes = snap.outcome(&OutcomeId::new("YES")).unwrap();
        assert_eq!(yes.bids.len(), 1);
        assert_eq!(yes.bids[0].amount, sats(100));
        assert!(book.cancel(id));
    }

    #[test]
    fn test_fully_filled_taker_never_rests() {
        let book = book();
        book.submit(limit("YES", Side::Sell, 70, 100));

        let taker = limit("YES", Side::Buy, 70, 40);
        let taker_id = taker.id;
        let (result, placed) = book.submit(taker);

        assert!(result.is_fully_matched());
        assert!(placed.is_filled());
        assert!(!book.cancel(taker_id));
    }

    #[test]
    fn test_complementary_counterparty_is_complement_bids() {
        let book = book();
        book.submit(limit("YES", Side::Buy, 55, 50));

        let (result, _) = book.submit(limit("NO", Side::Buy, 50, 30));

        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].execution_price, price(45));

        // YES maker partially consumed, still resting.
        let snap = book.snapshot();
        let yes = snap.outcome(&OutcomeId::new("YES")).unwrap();
        assert_eq!(yes.bids[0].amount, sats(20));
        // The fully filled NO taker left nothing resting.
        assert!(snap.outcome(&OutcomeId::new("NO")).is_none());
    }

    #[test]
    fn test_complement_lookup_is_case_insensitive() {
        let book = book();
        book.submit(limit("YES", Side::Buy, 60, 50));

        let (result, _) = book.submit(limit("no", Side::Buy, 45, 20));

        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].execution_price, price(40));
    }

    #[test]
    fn test_sell_orders_never_complementary_match() {
        let book = book();
        book.submit(limit("NO", Side::Buy, 50, 30));

        // Sell YES @ 40 would "cross" a NO bid numerically, but sells
        // only match their own outcome's bids.
        let (result, _) = book.submit(limit("YES", Side::Sell, 40, 30));

        assert!(result.fills.is_empty());
        assert_eq!(result.remaining_amount, sats(30));
    }

    #[test]
    fn test_categorical_outcomes_have_no_complement() {
        let book = OrderBook::with_complements(MarketId::new("cond-cat"), &[]);
        book.submit(limit("CANDIDATE_A", Side::Buy, 60, 50));

        let (result, _) = book.submit(limit("CANDIDATE_B", Side::Buy, 60, 50));

        assert!(result.fills.is_empty());
    }

    #[test]
    #[should_panic(expected = "cannot be its own complement")]
    fn test_self_complement_rejected() {
        OrderBook::with_complements(
            MarketId::new("cond-bad"),
            &[(OutcomeId::new("YES"), OutcomeId::new("yes"))],
        );
    }

    #[test]
    fn test_cancel_unknown_id_is_false() {
        let book = book();
        assert!(!book.cancel(OrderId::new()));
    }

    #[test]
    fn test_cancel_removes_from_book_and_index() {
        let book = book();
        let order = limit("YES", Side::Buy, 55, 100);
        let id = order.id;
        book.submit(order);

        assert!(book.cancel(id));
        assert!(!book.cancel(id));
        assert!(book.snapshot().outcomes.is_empty());
    }

    #[test]
    fn test_snapshot_aggregates_levels_and_spread() {
        let book = book();
        book.submit(limit("YES", Side::Buy, 55, 100));
        book.submit(limit("YES", Side::Buy, 55, 50));
        book.submit(limit("YES", Side::Buy, 50, 25));
        book.submit(limit("YES", Side::Sell, 70, 60));

        let snap = book.snapshot();
        let yes = snap.outcome(&OutcomeId::new("YES")).unwrap();

        assert_eq!(yes.bids.len(), 2);
        assert_eq!(yes.bids[0].price, price(55));
        assert_eq!(yes.bids[0].amount, sats(150));
        assert_eq!(yes.bids[1].price, price(50));
        assert_eq!(yes.asks.len(), 1);
        assert_eq!(yes.spread, Some(15));
    }

    #[test]
    fn test_spread_absent_with_one_sided_book() {
        let book = book();
        book.submit(limit("YES", Side::Buy, 55, 100));

        let snap = book.snapshot();
        assert_eq!(snap.outcome(&OutcomeId::new("YES")).unwrap().spread, None);
    }

    #[test]
    fn test_snapshot_idempotent_without_mutation() {
        let book = book();
        book.submit(limit("YES", Side::Buy, 55, 100));
        book.submit(limit("YES", Side::Sell, 60, 40));
        book.submit(limit("NO", Side::Buy, 30, 10));

        assert_eq!(book.snapshot(), book.snapshot());
    }
}
