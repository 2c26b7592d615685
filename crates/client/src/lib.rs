//! Client-side state-synchronization layer for BudgetBox.
//!
//! Reconciles locally-held financial entities (budgets, streams, imported
//! bank transactions) with the collaborator REST backend across three
//! independent state containers, all funneled through one authenticated
//! request gateway.

pub use auth::{AuthError, Session, StaticTokenProvider, TokenFuture, TokenProvider};
pub use error::ClientError;
pub use gateway::Gateway;
pub use link::{LinkError, LinkFlow, LinkPhase};
pub use stores::{BudgetStore, EntriesStore, TransactionsStore};

pub mod auth;
pub mod error;
pub mod gateway;
pub mod link;
pub mod services;
pub mod stores;
