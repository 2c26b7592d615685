use api_types::bank::{
    ImportedTransaction, LinkTokenResponse, PublicTokenExchange, TransactionApprove,
    TransactionDelete, TransactionsResponse, UnlinkResponse,
};

use crate::{error::ClientError, gateway::Gateway};

/// Request a short-lived link token for the vendor's hosted link widget.
pub async fn create_link_token(gateway: &Gateway) -> Result<String, ClientError> {
    let response: LinkTokenResponse = gateway.post_empty("plaid/create-link-token/").await?;
    Ok(response.link_token)
}

/// Exchange the widget's public token for a durable access credential
/// stored server-side.
pub async fn exchange_public_token(
    gateway: &Gateway,
    public_token: &str,
) -> Result<(), ClientError> {
    gateway
        .post_unit(
            "plaid/exchange-public-token/",
            &PublicTokenExchange {
                public_token: public_token.to_string(),
            },
        )
        .await
}

/// List imported transactions already held server-side.
pub async fn list_transactions(
    gateway: &Gateway,
) -> Result<Vec<ImportedTransaction>, ClientError> {
    let response: TransactionsResponse = gateway.get_json("plaid/list-transactions/", &[]).await?;
    Ok(response.transactions)
}

/// Pull fresh transactions from the aggregation provider.
///
/// Returns only the rows newly created by this pull.
pub async fn import_transactions(
    gateway: &Gateway,
) -> Result<Vec<ImportedTransaction>, ClientError> {
    let response: TransactionsResponse = gateway.get_json("plaid/get-transactions/", &[]).await?;
    Ok(response.transactions)
}

/// Trigger a provider-side refresh of the linked accounts.
pub async fn refresh_transactions(gateway: &Gateway) -> Result<(), ClientError> {
    gateway.get_unit("plaid/refresh-transactions/").await
}

/// Approve an imported transaction into a budget stream.
pub async fn approve_transaction(
    gateway: &Gateway,
    body: &TransactionApprove,
) -> Result<(), ClientError> {
    gateway.post_unit("plaid/transactions/", body).await
}

/// Dismiss an imported transaction without approving it.
pub async fn delete_transaction(gateway: &Gateway, id: i64) -> Result<(), ClientError> {
    gateway
        .delete_unit("plaid/transactions/", &TransactionDelete { id })
        .await
}

/// Unlink the bank connection; returns how many stored transactions the
/// server removed with it.
pub async fn unlink_bank_account(gateway: &Gateway) -> Result<u64, ClientError> {
    let response: UnlinkResponse = gateway.post_empty("plaid/unlink-bank-account/").await?;
    Ok(response.total_transactions_removed)
}
