//! Error taxonomy for the matching core
//!
//! Only construction from untrusted input can fail. A cancel miss is a
//! plain negative result, and invariant violations inside the book are
//! treated as corruption and panic rather than surfacing as errors.

use thiserror::Error;

/// Errors raised when building domain values from untrusted input.
///
/// Always recoverable by the caller: the API layer rejects the request
/// and nothing reaches the book.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid amount {0}: must be non-negative")]
    InvalidAmount(i64),

    #[error("invalid price {0}: must be between 1 and 99")]
    InvalidPrice(i64),

    #[error("limit orders require a price")]
    MissingPrice,

    #[error("order amount must be positive")]
    ZeroAmount,
}
