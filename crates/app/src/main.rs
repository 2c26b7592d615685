use std::sync::Arc;

use budgetbox_client::{
    BudgetStore, EntriesStore, Gateway, Session, StaticTokenProvider, TransactionsStore,
};

mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budgetbox={level},budgetbox_client={level}",
            level = config.level
        ))
        .init();

    if config.token.is_empty() {
        if config.publishable_key.is_empty() {
            tracing::error!("no session token configured; set BUDGETBOX_TOKEN");
        } else {
            tracing::error!(
                publishable_key = %config.publishable_key,
                "no session token configured; obtain one for this client key and set BUDGETBOX_TOKEN"
            );
        }
        return Ok(());
    }

    let session = Session::new();
    let provider = Arc::new(StaticTokenProvider::new(
        config.token.clone(),
        session.clone(),
    ));
    let gateway = Gateway::new(&config.base_url, provider)?;

    session.sign_in();

    let mut budgets = BudgetStore::new(gateway.clone(), session.clone());
    let mut entries = EntriesStore::new(gateway.clone(), session.clone());
    let mut transactions = TransactionsStore::new(gateway, session.clone());

    budgets.sync().await;
    let month = budgets
        .state
        .selected()
        .map(|budget| budget.month_label().to_string())
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m").to_string());
    entries.sync(&month).await;
    transactions.sync().await;

    tracing::info!(
        budgets = budgets.state.budgets().len(),
        selected = ?budgets.state.selected().map(|b| b.name.as_str()),
        streams = entries.streams().len(),
        pending_transactions = transactions.transactions().len(),
        "synchronized"
    );
    if let Some(message) = transactions.error() {
        tracing::warn!(message, "review flow reported an error");
    }

    session.sign_out();
    budgets.reset();
    entries.reset();
    transactions.reset();

    Ok(())
}
