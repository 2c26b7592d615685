use serde::{Deserialize, Serialize};

/// Serde helper for decimal amount fields.
///
/// The backend serializes amounts as decimal strings (`"42.50"`) but accepts
/// plain JSON numbers on write. Deserialize either shape into `f64`,
/// serialize as a number.
pub mod amount {
    use serde::{Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        struct AmountVisitor;

        impl de::Visitor<'_> for AmountVisitor {
            type Value = f64;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a number or a decimal string")
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
                Ok(value)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
                Ok(value as f64)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
                Ok(value as f64)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
                value
                    .parse()
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

pub mod budget {
    use super::*;
    use crate::stream::Stream;

    /// A monthly budget.
    ///
    /// Budgets are unique per (user, month); the server upserts on fetch.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Budget {
        pub id: i64,
        /// Month label, `YYYY-MM` or a first-of-month `YYYY-MM-DD` date.
        pub date: String,
        #[serde(default)]
        pub name: String,
    }

    impl Budget {
        /// The `YYYY-MM` month label, regardless of which date shape the
        /// server sent.
        pub fn month_label(&self) -> &str {
            self.date.get(..7).unwrap_or(&self.date)
        }
    }

    /// Response of the budget upsert endpoint: the budget plus its streams.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetEnvelope {
        pub budget: Budget,
        pub streams: Vec<Stream>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetsResponse {
        pub budgets: Vec<Budget>,
    }

    /// Request body for deleting a budget.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetDelete {
        pub id: i64,
    }
}

pub mod stream {
    use super::*;

    /// Whether a stream is income or an expense.
    ///
    /// Also selects the endpoint path segment (`income-stream/`,
    /// `expense-stream/`).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum StreamKind {
        Income,
        Expense,
    }

    impl StreamKind {
        /// Endpoint path segment under `entries/`.
        pub fn path_segment(self) -> &'static str {
            match self {
                Self::Income => "income-stream",
                Self::Expense => "expense-stream",
            }
        }
    }

    /// A recurring income or expense stream belonging to a budget.
    ///
    /// Sign convention: income positive, expense negative. The server
    /// enforces it; clients mirror it when building display state.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Stream {
        pub id: i64,
        pub merchant_name: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(with = "amount")]
        pub amount: f64,
        pub category: StreamKind,
        #[serde(default)]
        pub recurrence: bool,
    }

    /// Request body for creating a stream.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct StreamNew {
        pub merchant_name: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(with = "amount")]
        pub amount: f64,
        /// Month of the owning budget (`YYYY-MM`). Server defaults to the
        /// current month when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date: Option<String>,
        #[serde(default)]
        pub recurrence: bool,
    }

    /// Request body for updating a stream in place (same id).
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct StreamUpdate {
        pub id: i64,
        pub merchant_name: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(with = "amount")]
        pub amount: f64,
        #[serde(default)]
        pub recurrence: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StreamDelete {
        pub id: i64,
    }
}

pub mod bank {
    use super::*;
    use chrono::NaiveDate;

    /// Response of `plaid/create-link-token/`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct LinkTokenResponse {
        pub link_token: String,
    }

    /// Request body for `plaid/exchange-public-token/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PublicTokenExchange {
        pub public_token: String,
    }

    /// A bank transaction imported through the aggregation provider,
    /// pending review.
    ///
    /// `amount` carries the provider's raw positive magnitude; expense
    /// display negates it.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ImportedTransaction {
        pub id: i64,
        pub merchant_name: String,
        #[serde(with = "amount")]
        pub amount: f64,
        pub date_paid: NaiveDate,
        pub category: String,
        #[serde(default)]
        pub description: Option<String>,
    }

    impl ImportedTransaction {
        /// Signed amount for expense display: the provider's raw magnitude,
        /// negated.
        pub fn display_amount(&self) -> f64 {
            -self.amount.abs()
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<ImportedTransaction>,
        /// Sent by the list endpoint, absent from the import endpoint.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub count: Option<u64>,
    }

    /// Request body for approving an imported transaction into a budget
    /// stream.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionApprove {
        pub transaction_id: i64,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub budget_id: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionDelete {
        pub id: i64,
    }

    /// Response of `plaid/unlink-bank-account/`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct UnlinkResponse {
        pub total_transactions_removed: u64,
    }
}
