use api_types::{
    budget::BudgetEnvelope,
    stream::{Stream, StreamDelete, StreamKind, StreamNew, StreamUpdate},
};

use crate::{error::ClientError, gateway::Gateway};

/// List the streams of the budget for `date`.
///
/// Same endpoint as the budget upsert; only the stream list is returned.
pub async fn list_streams(gateway: &Gateway, date: &str) -> Result<Vec<Stream>, ClientError> {
    let envelope: BudgetEnvelope = gateway
        .get_json("entries/budget/", &[("date", date)])
        .await?;
    Ok(envelope.streams)
}

/// Create an income or expense stream.
pub async fn create_stream(
    gateway: &Gateway,
    kind: StreamKind,
    body: &StreamNew,
) -> Result<Stream, ClientError> {
    gateway
        .post_json(&format!("entries/{}/", kind.path_segment()), body)
        .await
}

/// Update a stream in place by id.
pub async fn update_stream(
    gateway: &Gateway,
    kind: StreamKind,
    body: &StreamUpdate,
) -> Result<Stream, ClientError> {
    gateway
        .put_json(&format!("entries/{}/", kind.path_segment()), body)
        .await
}

/// Delete a stream by id and kind.
pub async fn delete_stream(
    gateway: &Gateway,
    kind: StreamKind,
    id: i64,
) -> Result<(), ClientError> {
    gateway
        .delete_unit(
            &format!("entries/{}/", kind.path_segment()),
            &StreamDelete { id },
        )
        .await
}
