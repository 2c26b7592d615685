use api_types::budget::{Budget, BudgetDelete, BudgetEnvelope, BudgetsResponse};

use crate::{error::ClientError, gateway::Gateway};

/// List all budgets of the authenticated user.
pub async fn list_budgets(gateway: &Gateway) -> Result<Vec<Budget>, ClientError> {
    let response: BudgetsResponse = gateway.get_json("entries/budgets/", &[]).await?;
    Ok(response.budgets)
}

/// Fetch the budget for `(date, name)`, creating it server-side if absent.
///
/// `date` accepts `YYYY-MM` or `YYYY-MM-DD`; the server normalizes to the
/// first of the month.
pub async fn get_or_create_budget(
    gateway: &Gateway,
    date: &str,
    name: &str,
) -> Result<BudgetEnvelope, ClientError> {
    gateway
        .get_json("entries/budget/", &[("date", date), ("name", name)])
        .await
}

/// Delete a budget by id.
pub async fn delete_budget(gateway: &Gateway, id: i64) -> Result<(), ClientError> {
    gateway
        .delete_unit("entries/budget/", &BudgetDelete { id })
        .await
}
