//! Matching core for a binary/categorical prediction market
//!
//! Accepts buy/sell orders priced as probabilities, matches them with
//! price-time priority, and additionally supports complementary
//! matching: a buy on outcome A crosses a buy on A's complement when
//! their prices sum to at least 100, since together they fund a
//! complete set the mint can settle without an opposing seller.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced within each side
//! - Exact integer conservation: fills plus remainder always equal the
//!   submitted amount
//! - Per-book serialization: submit, cancel and snapshot for one market
//!   never interleave; distinct markets proceed in parallel

pub mod book;
pub mod events;
pub mod manager;
pub mod matching;

pub use book::OrderBook;
pub use manager::OrderBookManager;
