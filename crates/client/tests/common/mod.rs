//! In-process stub of the collaborator backend.
//!
//! Serves the endpoint surface the client talks to, asserts the bearer
//! header, counts hits per route, and can be told to fail a route so the
//! rollback paths can be exercised.

// Each test binary uses a different subset of the stub.
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

pub const TOKEN: &str = "stub-bearer-token";

#[derive(Clone, Default)]
pub struct Backend {
    inner: Arc<Mutex<Data>>,
}

#[derive(Default)]
struct Data {
    hits: HashMap<String, usize>,
    failing: HashSet<String>,
    budgets: Vec<Value>,
    streams: Vec<Value>,
    transactions: Vec<Value>,
    importable: Vec<Value>,
    exchanged_tokens: Vec<String>,
    next_id: i64,
}

impl Backend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.lock().next_id = 100;
        backend
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Data> {
        self.inner.lock().unwrap()
    }

    pub fn hits(&self, route: &str) -> usize {
        self.lock().hits.get(route).copied().unwrap_or(0)
    }

    /// Make a route answer 500 until told otherwise.
    pub fn fail_route(&self, route: &str) {
        self.lock().failing.insert(route.to_string());
    }

    pub fn heal_route(&self, route: &str) {
        self.lock().failing.remove(route);
    }

    pub fn add_budget(&self, id: i64, date: &str, name: &str) {
        self.lock()
            .budgets
            .push(json!({"id": id, "date": date, "name": name}));
    }

    pub fn add_stream(&self, id: i64, merchant: &str, amount: &str, category: &str) {
        self.lock().streams.push(json!({
            "id": id,
            "merchant_name": merchant,
            "description": "",
            "amount": amount,
            "category": category,
            "recurrence": false,
        }));
    }

    pub fn add_transaction(&self, id: i64, merchant: &str, amount: &str) {
        self.lock().transactions.push(transaction(id, merchant, amount));
    }

    /// Queue a transaction the next provider pull will create.
    pub fn add_importable(&self, id: i64, merchant: &str, amount: &str) {
        self.lock().importable.push(transaction(id, merchant, amount));
    }

    pub fn budget_ids(&self) -> Vec<i64> {
        self.lock()
            .budgets
            .iter()
            .filter_map(|b| b["id"].as_i64())
            .collect()
    }

    pub fn transaction_ids(&self) -> Vec<i64> {
        self.lock()
            .transactions
            .iter()
            .filter_map(|t| t["id"].as_i64())
            .collect()
    }

    pub fn exchanged_tokens(&self) -> Vec<String> {
        self.lock().exchanged_tokens.clone()
    }
}

fn transaction(id: i64, merchant: &str, amount: &str) -> Value {
    json!({
        "id": id,
        "merchant_name": merchant,
        "amount": amount,
        "date_paid": "2025-08-20",
        "category": "FOOD_AND_DRINK",
        "description": null,
    })
}

/// Bind on an ephemeral port and serve the stub; returns the base url.
pub async fn spawn(backend: Backend) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(backend)).await.unwrap();
    });
    format!("http://{addr}/")
}

fn router(backend: Backend) -> Router {
    Router::new()
        .route("/entries/budgets/", get(list_budgets))
        .route("/entries/budget/", get(get_budget).delete(delete_budget))
        .route(
            "/entries/income-stream/",
            post(create_stream).put(update_stream).delete(delete_stream),
        )
        .route(
            "/entries/expense-stream/",
            post(create_stream).put(update_stream).delete(delete_stream),
        )
        .route("/plaid/create-link-token/", post(create_link_token))
        .route("/plaid/exchange-public-token/", post(exchange_public_token))
        .route("/plaid/list-transactions/", get(list_transactions))
        .route("/plaid/get-transactions/", get(import_transactions))
        .route("/plaid/refresh-transactions/", get(refresh_transactions))
        .route(
            "/plaid/transactions/",
            post(approve_transaction).delete(delete_transaction),
        )
        .route("/plaid/unlink-bank-account/", post(unlink))
        .with_state(backend)
}

/// Count the hit, check auth, honor forced failures.
fn gate(backend: &Backend, route: &str, headers: &HeaderMap) -> Result<(), Response> {
    let mut data = backend.lock();
    *data.hits.entry(route.to_string()).or_insert(0) += 1;

    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"));
    if !authorized {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized"})),
        )
            .into_response());
    }

    if data.failing.contains(route) {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "stub failure"})),
        )
            .into_response());
    }
    Ok(())
}

async fn list_budgets(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(response) = gate(&backend, "list_budgets", &headers) {
        return response;
    }
    let data = backend.lock();
    Json(json!({"budgets": data.budgets})).into_response()
}

async fn get_budget(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = gate(&backend, "get_budget", &headers) {
        return response;
    }
    let mut data = backend.lock();
    let date = params.get("date").cloned().unwrap_or_default();
    let name = params.get("name").cloned().unwrap_or_default();

    let existing = data
        .budgets
        .iter()
        .find(|b| b["date"] == date.as_str() && (name.is_empty() || b["name"] == name.as_str()))
        .cloned();
    let budget = match existing {
        Some(budget) => budget,
        None => {
            let id = data.next_id;
            data.next_id += 1;
            let budget = json!({"id": id, "date": date, "name": name});
            data.budgets.push(budget.clone());
            budget
        }
    };
    Json(json!({"budget": budget, "streams": data.streams})).into_response()
}

async fn delete_budget(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = gate(&backend, "delete_budget", &headers) {
        return response;
    }
    let mut data = backend.lock();
    let id = body["id"].as_i64();
    data.budgets.retain(|b| b["id"].as_i64() != id);
    Json(json!({"message": "deleted"})).into_response()
}

async fn create_stream(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = gate(&backend, "create_stream", &headers) {
        return response;
    }
    let mut data = backend.lock();
    let id = data.next_id;
    data.next_id += 1;
    let stream = json!({
        "id": id,
        "merchant_name": body["merchant_name"],
        "description": body["description"],
        "amount": body["amount"],
        "category": if body["amount"].as_f64().unwrap_or(0.0) >= 0.0 { "income" } else { "expense" },
        "recurrence": body["recurrence"].as_bool().unwrap_or(false),
    });
    data.streams.push(stream.clone());
    Json(stream).into_response()
}

async fn update_stream(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = gate(&backend, "update_stream", &headers) {
        return response;
    }
    let mut data = backend.lock();
    let id = body["id"].as_i64();
    let Some(slot) = data.streams.iter_mut().find(|s| s["id"].as_i64() == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "no such stream"}))).into_response();
    };
    let category = slot["category"].clone();
    *slot = json!({
        "id": body["id"],
        "merchant_name": body["merchant_name"],
        "description": body["description"],
        "amount": body["amount"],
        "category": category,
        "recurrence": body["recurrence"].as_bool().unwrap_or(false),
    });
    Json(slot.clone()).into_response()
}

async fn delete_stream(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = gate(&backend, "delete_stream", &headers) {
        return response;
    }
    let mut data = backend.lock();
    let id = body["id"].as_i64();
    data.streams.retain(|s| s["id"].as_i64() != id);
    Json(json!({"message": "deleted"})).into_response()
}

async fn create_link_token(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(response) = gate(&backend, "create_link_token", &headers) {
        return response;
    }
    Json(json!({"link_token": "link-sandbox-token", "message": "Link token created successfully"}))
        .into_response()
}

async fn exchange_public_token(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = gate(&backend, "exchange_public_token", &headers) {
        return response;
    }
    let Some(token) = body["public_token"].as_str() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "public_token is required"})),
        )
            .into_response();
    };
    backend.lock().exchanged_tokens.push(token.to_string());
    Json(json!({"message": "ok"})).into_response()
}

async fn list_transactions(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(response) = gate(&backend, "list_transactions", &headers) {
        return response;
    }
    let data = backend.lock();
    Json(json!({"transactions": data.transactions, "count": data.transactions.len()}))
        .into_response()
}

async fn import_transactions(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(response) = gate(&backend, "import_transactions", &headers) {
        return response;
    }
    let mut data = backend.lock();
    let created: Vec<Value> = data.importable.drain(..).collect();
    data.transactions.extend(created.iter().cloned());
    Json(json!({"transactions": created})).into_response()
}

async fn refresh_transactions(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(response) = gate(&backend, "refresh_transactions", &headers) {
        return response;
    }
    Json(json!({"message": "refresh queued"})).into_response()
}

async fn approve_transaction(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = gate(&backend, "approve_transaction", &headers) {
        return response;
    }
    let mut data = backend.lock();
    let id = body["transaction_id"].as_i64();
    let before = data.transactions.len();
    data.transactions.retain(|t| t["id"].as_i64() != id);
    if data.transactions.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "no such transaction"})),
        )
            .into_response();
    }
    Json(json!({"message": "approved"})).into_response()
}

async fn delete_transaction(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = gate(&backend, "delete_transaction", &headers) {
        return response;
    }
    let mut data = backend.lock();
    let id = body["id"].as_i64();
    data.transactions.retain(|t| t["id"].as_i64() != id);
    Json(json!({"message": "deleted"})).into_response()
}

async fn unlink(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(response) = gate(&backend, "unlink", &headers) {
        return response;
    }
    let mut data = backend.lock();
    let removed = data.transactions.len();
    data.transactions.clear();
    Json(json!({"total_transactions_removed": removed})).into_response()
}
