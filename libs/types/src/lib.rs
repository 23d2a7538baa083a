//! Types library for the prediction market exchange
//!
//! Core type definitions shared between the matching engine and its
//! collaborators (API layer, broadcast layer, mint-side settlement).
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, FillId, MarketId, OutcomeId, UserId)
//! - `numeric`: Integer value types (Amount, Price)
//! - `order`: Order lifecycle types
//! - `fill`: Fill and match result types
//! - `snapshot`: Order book depth snapshots
//! - `errors`: Error taxonomy

pub mod errors;
pub mod fill;
pub mod ids;
pub mod numeric;
pub mod order;
pub mod snapshot;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::fill::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::snapshot::*;
}
