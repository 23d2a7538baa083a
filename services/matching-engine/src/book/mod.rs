//! Order book infrastructure module
//!
//! Contains the per-market order book and its priority-ordered sides.

pub mod order_book;
pub mod side;

pub use order_book::OrderBook;
pub use side::BookSide;
