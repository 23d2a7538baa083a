//! Matching logic module
//!
//! Price-time priority matching with a complementary pass for binary
//! outcome markets.

pub mod crossing;
pub mod engine;
