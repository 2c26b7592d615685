//! Resource service modules.
//!
//! Plain async functions mapping one resource operation to one HTTP call
//! against the collaborator backend. No batching, no retries, no caching;
//! errors propagate to the caller unchanged.

pub mod bank;
pub mod budgets;
pub mod streams;
