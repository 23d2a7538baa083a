//! Core match algorithm
//!
//! A stateless two-pass walk over the counterparty sides: direct first,
//! then complementary for limit buys with remaining size. The engine
//! mutates the incoming order's remainder, the resting makers, and the
//! counterparty sides in place; everything else it touches is returned
//! in the `MatchResult`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::trace;
use types::fill::{Fill, MatchPath, MatchResult};
use types::ids::OrderId;
use types::numeric::{Amount, Price};
use types::order::{Order, OrderKind};

use crate::book::side::BookSide;
use crate::matching::crossing;

/// Match an incoming order against the direct counterparty side and,
/// when supplied, the complementary outcome's bid side.
///
/// `orders` is the book's id index holding the single mutable record of
/// every resting order; fully consumed makers are removed from both the
/// side and the index. The caller only supplies `complementary` for buy
/// takers, and the engine additionally ignores it for market orders,
/// which never complementary-match.
///
/// Infallible for a well-formed book. A resting id missing from the
/// index or a resting order with no remainder is book corruption and
/// panics.
pub fn match_order(
    incoming: &mut Order,
    direct: &mut BookSide,
    complementary: Option<&mut BookSide>,
    orders: &mut HashMap<OrderId, Order>,
    filled_at: DateTime<Utc>,
) -> MatchResult {
    let mut fills = Vec::new();

    match_pass(incoming, direct, orders, &mut fills, MatchPath::Direct, filled_at);

    if !incoming.remaining_amount.is_zero() && incoming.kind == OrderKind::Limit {
        if let Some(complementary) = complementary {
            match_pass(
                incoming,
                complementary,
                orders,
                &mut fills,
                MatchPath::Complementary,
                filled_at,
            );
        }
    }

    MatchResult {
        fills,
        remaining_amount: incoming.remaining_amount,
    }
}

/// Walk one resting side in priority order, filling until the taker is
/// exhausted or the first non-crossing level ends the walk.
fn match_pass(
    incoming: &mut Order,
    resting: &mut BookSide,
    orders: &mut HashMap<OrderId, Order>,
    fills: &mut Vec<Fill>,
    path: MatchPath,
    filled_at: DateTime<Utc>,
) {
    // Fully consumed makers are collected here and removed only after
    // the walk, so the side is never mutated mid-iteration.
    let mut consumed: Vec<(Price, OrderId)> = Vec::new();

    'walk: for level_price in resting.prices_in_priority() {
        let crosses = match path {
            MatchPath::Direct => crossing::crosses_direct(incoming, level_price),
            MatchPath::Complementary => crossing::crosses_complementary(incoming, level_price),
        };
        // Sides are price-priority ordered: once one level fails to
        // cross, no later level can cross either.
        if !crosses {
            break;
        }

        let queue = resting
            .level(level_price)
            .expect("walked price level missing from side");

        for maker_id in queue {
            if incoming.remaining_amount.is_zero() {
                break 'walk;
            }

            let maker = orders
                .get_mut(maker_id)
                .expect("resting order missing from id index");
            assert!(
                !maker.remaining_amount.is_zero(),
                "zero-remainder order resting on book"
            );

            let fill_amount = Amount::min(incoming.remaining_amount, maker.remaining_amount);
            // Price-time priority favors the resting order's price. A
            // complementary maker's price is quoted in the opposite
            // outcome, so it is translated into the taker's terms.
            let execution_price = match path {
                MatchPath::Direct => level_price,
                MatchPath::Complementary => level_price.complement(),
            };

            trace!(
                taker = %incoming.id,
                maker = %maker_id,
                amount = %fill_amount,
                price = %execution_price,
                ?path,
                "fill"
            );

            fills.push(Fill::new(
                incoming.id,
                *maker_id,
                fill_amount,
                execution_price,
                path,
                filled_at,
            ));

            incoming.fill(fill_amount);
            maker.fill(fill_amount);

            if maker.is_filled() {
                consumed.push((level_price, *maker_id));
            }
        }
    }

    for (price, order_id) in consumed {
        let removed = resting.remove(price, &order_id);
        assert!(removed, "consumed maker missing from side queue");
        orders.remove(&order_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use types::ids::{MarketId, OutcomeId, UserId};
    use types::order::Side;

    fn price(value: i64) -> Price {
        Price::try_new(value).unwrap()
    }

    fn sats(value: u64) -> Amount {
        Amount::from_sats(value)
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

    /// Rest a maker on a side and register it in the index.
    fn rest(
        side: &mut BookSide,
        orders: &mut HashMap<OrderId, Order>,
        maker: Order,
    ) -> OrderId {
        let id = maker.id;
        side.insert(maker.price.unwrap(), id);
        orders.insert(id, maker);
        id
    }

    #[test]
    fn test_direct_match_uses_maker_price() {
        let mut asks = BookSide::asks();
        let mut orders = HashMap::new();
        let maker_id = rest(&mut asks, &mut orders, limit("YES", Side::Sell, 65, 100));

        let mut taker = limit("YES", Side::Buy, 70, 40);
        let result = match_order(&mut taker, &mut asks, None, &mut orders, Utc::now());

        assert_eq!(result.fills.len(), 1);
        let fill = &result.fills[0];
        assert_eq!(fill.execution_price, price(65));
        assert_eq!(fill.amount, sats(40));
        assert_eq!(fill.maker_order_id, maker_id);
        assert_eq!(fill.path, MatchPath::Direct);
        assert!(result.is_fully_matched());

        // Maker partially consumed, still resting and indexed.
        assert_eq!(orders[&maker_id].remaining_amount, sats(60));
        assert_eq!(asks.order_count(), 1);
    }

    #[test]
    fn test_consumed_makers_removed_after_walk() {
        let mut asks = BookSide::asks();
        let mut orders = HashMap::new();
        let first = rest(&mut asks, &mut orders, limit("YES", Side::Sell, 60, 30));
        let second = rest(&mut asks, &mut orders, limit("YES", Side::Sell, 62, 30));

        let mut taker = limit("YES", Side::Buy, 65, 100);
        let result = match_order(&mut taker, &mut asks, None, &mut orders, Utc::now());

        assert_eq!(result.fills.len(), 2);
        assert_eq!(result.remaining_amount, sats(40));
        assert!(asks.is_empty());
        assert!(!orders.contains_key(&first));
        assert!(!orders.contains_key(&second));
    }

    #[test]
    fn test_walk_stops_at_first_non_crossing_level() {
        let mut asks = BookSide::asks();
        let mut orders = HashMap::new();
        let cheap = rest(&mut asks, &mut orders, limit("YES", Side::Sell, 50, 10));
        let expensive = rest(&mut asks, &mut orders, limit("YES", Side::Sell, 80, 10));

        let mut taker = limit("YES", Side::Buy, 60, 100);
        let result = match_order(&mut taker, &mut asks, None, &mut orders, Utc::now());

        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].maker_order_id, cheap);
        assert_eq!(result.remaining_amount, sats(90));
        assert!(orders.contains_key(&expensive));
    }

    #[test]
    fn test_time_priority_within_level() {
        let mut asks = BookSide::asks();
        let mut orders = HashMap::new();
        let first = rest(&mut asks, &mut orders, limit("YES", Side::Sell, 60, 10));
        let second = rest(&mut asks, &mut orders, limit("YES", Side::Sell, 60, 20));

        let mut taker = limit("YES", Side::Buy, 60, 15);
        let result = match_order(&mut taker, &mut asks, None, &mut orders, Utc::now());

        assert_eq!(result.fills.len(), 2);
        assert_eq!(result.fills[0].maker_order_id, first);
        assert_eq!(result.fills[0].amount, sats(10));
        assert_eq!(result.fills[1].maker_order_id, second);
        assert_eq!(result.fills[1].amount, sats(5));
        assert_eq!(orders[&second].remaining_amount, sats(15));
    }

    #[test]
    fn test_complementary_pass_after_direct() {
        // No asks on NO; the YES bid funds the complete set instead.
        let mut no_asks = BookSide::asks();
        let mut yes_bids = BookSide::bids();
        let mut orders = HashMap::new();
        let yes_maker = rest(&mut yes_bids, &mut orders, limit("YES", Side::Buy, 55, 50));

        let mut taker = limit("NO", Side::Buy, 50, 30);
        let result = match_order(
            &mut taker,
            &mut no_asks,
            Some(&mut yes_bids),
            &mut orders,
            Utc::now(),
        );

        assert_eq!(result.fills.len(), 1);
        let fill = &result.fills[0];
        assert_eq!(fill.path, MatchPath::Complementary);
        assert_eq!(fill.execution_price, price(45)); // 100 - 55
        assert_eq!(fill.amount, sats(30));
        assert!(result.is_fully_matched());
        assert_eq!(orders[&yes_maker].remaining_amount, sats(20));
    }

    #[test]
    fn test_complementary_skips_non_crossing_prices() {
        let mut no_asks = BookSide::asks();
        let mut yes_bids = BookSide::bids();
        let mut orders = HashMap::new();
        rest(&mut yes_bids, &mut orders, limit("YES", Side::Buy, 55, 50));

        // 44 + 55 = 99 < 100: no complete set.
        let mut taker = limit("NO", Side::Buy, 44, 30);
        let result = match_order(
            &mut taker,
            &mut no_asks,
            Some(&mut yes_bids),
            &mut orders,
            Utc::now(),
        );

        assert!(result.fills.is_empty());
        assert_eq!(result.remaining_amount, sats(30));
        assert_eq!(yes_bids.order_count(), 1);
    }

    #[test]
    fn test_market_order_consumes_book_and_skips_complementary() {
        let mut no_asks = BookSide::asks();
        let mut yes_bids = BookSide::bids();
        let mut orders = HashMap::new();
        rest(&mut no_asks, &mut orders, limit("NO", Side::Sell, 90, 10));
        rest(&mut yes_bids, &mut orders, limit("YES", Side::Buy, 99, 1000));

        let mut taker = Order::market(
            MarketId::new("cond-1"),
            OutcomeId::new("NO"),
            Side::Buy,
            sats(100),
            UserId::new("npub-b"),
            Utc::now(),
        );
        let result = match_order(
            &mut taker,
            &mut no_asks,
            Some(&mut yes_bids),
            &mut orders,
            Utc::now(),
        );

        // Takes all direct liquidity regardless of price, but never
        // touches the complementary side.
        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].execution_price, price(90));
        assert_eq!(result.remaining_amount, sats(90));
        assert_eq!(yes_bids.order_count(), 1);
    }

    #[test]
    fn test_direct_preferred_over_complementary() {
        let mut no_asks = BookSide::asks();
        let mut yes_bids = BookSide::bids();
        let mut orders = HashMap::new();
        let direct_maker = rest(&mut no_asks, &mut orders, limit("NO", Side::Sell, 50, 30));
        rest(&mut yes_bids, &mut orders, limit("YES", Side::Buy, 60, 30));

        let mut taker = limit("NO", Side::Buy, 50, 30);
        let result = match_order(
            &mut taker,
            &mut no_asks,
            Some(&mut yes_bids),
            &mut orders,
            Utc::now(),
        );

        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].maker_order_id, direct_maker);
        assert_eq!(result.fills[0].path, MatchPath::Direct);
        assert_eq!(yes_bids.order_count(), 1);
    }

    #[test]
    fn test_conservation_across_both_passes() {
        let mut no_asks = BookSide::asks();
        let mut yes_bids = BookSide::bids();
        let mut orders = HashMap::new();
        rest(&mut no_asks, &mut orders, limit("NO", Side::Sell, 48, 25));
        rest(&mut yes_bids, &mut orders, limit("YES", Side::Buy, 52, 40));

        let mut taker = limit("NO", Side::Buy, 50, 100);
        let result = match_order(
            &mut taker,
            &mut no_asks,
            Some(&mut yes_bids),
            &mut orders,
            Utc::now(),
        );

        assert_eq!(result.fills.len(), 2);
        assert_eq!(
            result.filled_amount() + result.remaining_amount,
            taker.amount
        );
        assert_eq!(result.remaining_amount, sats(35));
    }
}
