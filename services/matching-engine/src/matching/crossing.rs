//! Crossing detection logic
//!
//! Determines when an incoming order can match a resting price level.
//! Both resting sides are walked in price-priority order, so the first
//! level that fails its crossing check ends the walk: every later level
//! has a strictly worse price.

use types::numeric::Price;
use types::order::{Order, OrderKind, Side};

/// Check if the incoming order crosses a resting level on the direct
/// counterparty side.
///
/// A buy crosses a resting ask when its price is at least the ask
/// price; a sell crosses a resting bid when its price is at most the
/// bid price. Market orders always cross.
pub fn crosses_direct(incoming: &Order, maker_price: Price) -> bool {
    if incoming.kind == OrderKind::Market {
        return true;
    }
    let Some(price) = incoming.price else {
        return false;
    };
    match incoming.side {
        Side::Buy => price >= maker_price,
        Side::Sell => price <= maker_price,
    }
}

/// Check if an incoming limit buy crosses a resting bid on the
/// complementary outcome.
///
/// Buy A @ P matches Buy complement(A) @ Q when P + Q >= 100: the two
/// buys jointly fund a complete set worth exactly 100 regardless of
/// which outcome is attested.
pub fn crosses_complementary(incoming: &Order, maker_price: Price) -> bool {
    let Some(price) = incoming.price else {
        return false;
    };
    u16::from(price.value()) + u16::from(maker_price.value()) >= 100
}
