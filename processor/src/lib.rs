//! Launchpad event projection engine.
//!
//! Consumes an ordered stream of launchpad contract events (token creates,
//! launches, buys, sells, claims, liquidity events) and derives consistent
//! relational state under strict idempotence and clamping rules.

pub mod curve;
pub mod events;
pub mod handlers;
pub mod metadata;
pub mod retry;
pub mod schema;
pub mod service;
pub mod store;
pub mod stream;
