use std::time::Duration;

use api_types::bank::{ImportedTransaction, TransactionApprove};
use tokio::time::Instant;

use crate::{
    auth::Session,
    error::ClientError,
    gateway::Gateway,
    services::bank::{
        approve_transaction, delete_transaction, import_transactions, list_transactions,
        refresh_transactions, unlink_bank_account,
    },
    stores::{merge_new, remove_by_id},
};

/// How long a review-flow error stays visible.
const ERROR_TTL: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct TransientError {
    message: String,
    expires_at: Instant,
}

/// Container for imported bank transactions pending review.
///
/// Unlike the other containers this one carries a transient user-visible
/// error slot: the review flow surfaces failures inline and auto-clears
/// them, where the other flows use blocking confirmation dialogs.
#[derive(Debug)]
pub struct TransactionsStore {
    gateway: Gateway,
    session: Session,
    fetched_epoch: Option<u64>,
    transactions: Vec<ImportedTransaction>,
    error: Option<TransientError>,
    pub loading: bool,
}

impl TransactionsStore {
    pub fn new(gateway: Gateway, session: Session) -> Self {
        Self {
            gateway,
            session,
            fetched_epoch: None,
            transactions: Vec::new(),
            error: None,
            loading: false,
        }
    }

    pub fn transactions(&self) -> &[ImportedTransaction] {
        &self.transactions
    }

    /// Current review-flow error, if any and not yet expired.
    pub fn error(&self) -> Option<&str> {
        let transient = self.error.as_ref()?;
        if Instant::now() >= transient.expires_at {
            return None;
        }
        Some(&transient.message)
    }

    fn set_error(&mut self, message: String) {
        self.error = Some(TransientError {
            message,
            expires_at: Instant::now() + ERROR_TTL,
        });
    }

    /// Initial fetch, once per sign-in. Resets the container when signed
    /// out.
    pub async fn sync(&mut self) {
        if !self.session.is_signed_in() {
            self.reset();
            return;
        }
        let epoch = self.session.epoch();
        if self.fetched_epoch == Some(epoch) {
            return;
        }
        self.fetched_epoch = Some(epoch);
        self.fetch_more().await;
    }

    /// List server-held transactions and merge the ones not already held.
    /// Existing entries are never replaced or reordered.
    pub async fn fetch_more(&mut self) {
        if !self.session.is_signed_in() {
            return;
        }
        let epoch = self.session.epoch();
        self.loading = true;
        let result = list_transactions(&self.gateway).await;
        if self.session.epoch() != epoch || !self.session.is_signed_in() {
            self.loading = false;
            return;
        }
        match result {
            Ok(batch) => merge_new(&mut self.transactions, batch, |tx| tx.id),
            Err(err) => tracing::error!("failed to fetch transactions: {err}"),
        }
        self.loading = false;
    }

    /// Trigger a provider-side refresh, then pull and merge the newly
    /// imported rows.
    pub async fn refresh(&mut self) {
        if !self.session.is_signed_in() {
            return;
        }
        let epoch = self.session.epoch();
        self.loading = true;
        let result = match refresh_transactions(&self.gateway).await {
            Ok(()) => import_transactions(&self.gateway).await,
            Err(err) => Err(err),
        };
        if self.session.epoch() != epoch || !self.session.is_signed_in() {
            self.loading = false;
            return;
        }
        match result {
            Ok(batch) => merge_new(&mut self.transactions, batch, |tx| tx.id),
            Err(err) => {
                tracing::error!("failed to refresh transactions: {err}");
                self.set_error(format!("Could not refresh transactions: {err}"));
            }
        }
        self.loading = false;
    }

    /// Approve a transaction into a budget stream: optimistic removal plus
    /// exactly one approve call; a remote failure reinserts the entry at
    /// its original index and surfaces a transient error.
    pub async fn approve(&mut self, id: i64, description: Option<String>, budget_id: Option<i64>) {
        let Some((index, removed)) = remove_by_id(&mut self.transactions, id, |tx| tx.id) else {
            return;
        };
        let body = TransactionApprove {
            transaction_id: id,
            description,
            budget_id,
        };
        if let Err(err) = approve_transaction(&self.gateway, &body).await {
            tracing::error!("failed to approve transaction {id}, restoring: {err}");
            self.transactions.insert(index, removed);
            self.set_error(format!("Could not approve transaction: {err}"));
        }
    }

    /// Dismiss a transaction without approving it. Same optimistic shape
    /// as [`approve`](Self::approve) against the delete endpoint.
    pub async fn dismiss(&mut self, id: i64) {
        let Some((index, removed)) = remove_by_id(&mut self.transactions, id, |tx| tx.id) else {
            return;
        };
        if let Err(err) = delete_transaction(&self.gateway, id).await {
            tracing::error!("failed to dismiss transaction {id}, restoring: {err}");
            self.transactions.insert(index, removed);
            self.set_error(format!("Could not dismiss transaction: {err}"));
        }
    }

    /// Unlink the bank connection, clearing local holdings. Returns how
    /// many stored transactions the server removed.
    pub async fn unlink(&mut self) -> Result<u64, ClientError> {
        let removed = unlink_bank_account(&self.gateway).await?;
        self.transactions.clear();
        Ok(removed)
    }

    pub fn reset(&mut self) {
        self.fetched_epoch = None;
        self.transactions.clear();
        self.error = None;
        self.loading = false;
    }
}
