use api_types::stream::{Stream, StreamKind, StreamNew, StreamUpdate};

use crate::{
    auth::Session,
    error::ClientError,
    gateway::Gateway,
    services::streams::{create_stream, delete_stream, list_streams, update_stream},
    stores::{remove_by_id, replace_by_id},
};

/// Container for the streams of the currently selected budget.
///
/// The stream list is refetched wholesale whenever the budget selection
/// changes; there is no incremental merge here.
#[derive(Debug)]
pub struct EntriesStore {
    gateway: Gateway,
    session: Session,
    fetched_epoch: Option<u64>,
    budget_date: Option<String>,
    streams: Vec<Stream>,
    pub loading: bool,
}

impl EntriesStore {
    pub fn new(gateway: Gateway, session: Session) -> Self {
        Self {
            gateway,
            session,
            fetched_epoch: None,
            budget_date: None,
            streams: Vec::new(),
            loading: false,
        }
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Month of the budget the held streams belong to.
    pub fn budget_date(&self) -> Option<&str> {
        self.budget_date.as_deref()
    }

    /// Initial fetch, once per sign-in. Resets the container when signed
    /// out.
    pub async fn sync(&mut self, date: &str) {
        if !self.session.is_signed_in() {
            self.reset();
            return;
        }
        let epoch = self.session.epoch();
        if self.fetched_epoch == Some(epoch) {
            return;
        }
        self.fetched_epoch = Some(epoch);
        self.load_for(date).await;
    }

    /// Wholesale reload for a (possibly different) budget month. Leaves
    /// prior state untouched on error.
    pub async fn load_for(&mut self, date: &str) {
        if !self.session.is_signed_in() {
            return;
        }
        let epoch = self.session.epoch();
        self.loading = true;
        let result = list_streams(&self.gateway, date).await;
        if self.session.epoch() != epoch || !self.session.is_signed_in() {
            self.loading = false;
            return;
        }
        match result {
            Ok(streams) => {
                self.streams = streams;
                self.budget_date = Some(date.to_string());
            }
            Err(err) => tracing::error!("failed to fetch streams for {date}: {err}"),
        }
        self.loading = false;
    }

    /// Create a stream and append the server's row on success.
    pub async fn create(
        &mut self,
        kind: StreamKind,
        mut body: StreamNew,
    ) -> Result<(), ClientError> {
        body.amount = validate(kind, &body.merchant_name, body.amount)?;
        let created = create_stream(&self.gateway, kind, &body).await?;
        self.streams.push(created);
        Ok(())
    }

    /// Update a stream; the matching local entry is structurally replaced
    /// with the server's row.
    pub async fn update(
        &mut self,
        kind: StreamKind,
        mut body: StreamUpdate,
    ) -> Result<(), ClientError> {
        body.amount = validate(kind, &body.merchant_name, body.amount)?;
        let updated = update_stream(&self.gateway, kind, &body).await?;
        replace_by_id(&mut self.streams, updated, |stream| stream.id);
        Ok(())
    }

    /// Delete a stream: optimistic local removal, rolled back by
    /// reinserting the entry at its original index if the remote call
    /// fails.
    pub async fn delete(&mut self, kind: StreamKind, id: i64) -> Result<(), ClientError> {
        let Some((index, removed)) = remove_by_id(&mut self.streams, id, |stream| stream.id)
        else {
            return Ok(());
        };
        match delete_stream(&self.gateway, kind, id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::error!("failed to delete stream {id}, restoring: {err}");
                self.streams.insert(index, removed);
                Err(err)
            }
        }
    }

    pub fn reset(&mut self) {
        self.fetched_epoch = None;
        self.budget_date = None;
        self.streams.clear();
        self.loading = false;
    }
}

/// Form checks mirrored client-side: non-empty name, non-zero finite
/// amount. The sign convention (income positive, expense negative) is
/// server-enforced; mirror it here so local and remote state agree.
fn validate(kind: StreamKind, merchant_name: &str, amount: f64) -> Result<f64, ClientError> {
    if merchant_name.trim().is_empty() {
        return Err(ClientError::Validation(
            "merchant name must not be empty".to_string(),
        ));
    }
    if !amount.is_finite() || amount == 0.0 {
        return Err(ClientError::Validation(
            "amount must be a non-zero number".to_string(),
        ));
    }
    Ok(match kind {
        StreamKind::Income => amount.abs(),
        StreamKind::Expense => -amount.abs(),
    })
}
