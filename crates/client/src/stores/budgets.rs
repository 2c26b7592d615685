use api_types::budget::Budget;

use crate::{
    auth::Session,
    error::ClientError,
    gateway::Gateway,
    services::budgets::{delete_budget, get_or_create_budget, list_budgets},
};

/// Pure selection/collection state of the budget container.
#[derive(Debug, Default)]
pub struct BudgetsState {
    budgets: Vec<Budget>,
    selected_id: Option<i64>,
    pub loading: bool,
}

impl BudgetsState {
    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected_id
    }

    pub fn selected(&self) -> Option<&Budget> {
        let id = self.selected_id?;
        self.budgets.iter().find(|budget| budget.id == id)
    }

    /// Select a budget. Ids not present in the current list are rejected.
    pub fn select(&mut self, id: i64) -> bool {
        if self.budgets.iter().any(|budget| budget.id == id) {
            self.selected_id = Some(id);
            return true;
        }
        false
    }

    /// Replace the list with a refreshed one, keeping the current selection
    /// when it survived; otherwise fall back to the first budget (or clear).
    fn apply_list(&mut self, budgets: Vec<Budget>) {
        self.budgets = budgets;
        let still_present = self
            .selected_id
            .is_some_and(|id| self.budgets.iter().any(|budget| budget.id == id));
        if !still_present {
            self.selected_id = self.budgets.first().map(|budget| budget.id);
        }
    }

    fn reset(&mut self) {
        self.budgets.clear();
        self.selected_id = None;
        self.loading = false;
    }
}

/// Budget container: the list of budgets plus the client-local selection.
#[derive(Debug)]
pub struct BudgetStore {
    gateway: Gateway,
    session: Session,
    fetched_epoch: Option<u64>,
    pub state: BudgetsState,
}

impl BudgetStore {
    pub fn new(gateway: Gateway, session: Session) -> Self {
        Self {
            gateway,
            session,
            fetched_epoch: None,
            state: BudgetsState::default(),
        }
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
        self.refresh().await;
    }

    /// Re-list budgets, applying the selection fallback rule. Leaves prior
    /// state untouched on error.
    pub async fn refresh(&mut self) {
        if !self.session.is_signed_in() {
            return;
        }
        let epoch = self.session.epoch();
        self.state.loading = true;
        let result = list_budgets(&self.gateway).await;
        // A sign-out or a newer sign-in supersedes this fetch.
        if self.session.epoch() != epoch || !self.session.is_signed_in() {
            self.state.loading = false;
            return;
        }
        match result {
            Ok(budgets) => self.state.apply_list(budgets),
            Err(err) => tracing::error!("failed to fetch budgets: {err}"),
        }
        self.state.loading = false;
    }

    /// Upsert the budget for `(date, name)` and refresh the list. Returns
    /// the upserted budget.
    pub async fn get_or_create(&mut self, date: &str, name: &str) -> Result<Budget, ClientError> {
        let envelope = get_or_create_budget(&self.gateway, date, name).await?;
        self.refresh().await;
        Ok(envelope.budget)
    }

    /// Delete a budget, then refresh. The refreshed list is the source of
    /// truth for what survived, including the selection fallback.
    pub async fn delete(&mut self, id: i64) -> Result<(), ClientError> {
        delete_budget(&self.gateway, id).await?;
        self.refresh().await;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.fetched_epoch = None;
        self.state.reset();
    }
}
