use std::sync::Arc;

use reqwest::{RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{auth::TokenProvider, error::ClientError};

/// Error body shape of the collaborator backend.
///
/// Most endpoints answer `{"error": …}`; validation failures may answer
/// `{"detail": …}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Authenticated request gateway.
///
/// One long-lived handle per session. Every outbound call fetches a fresh
/// bearer token from the [`TokenProvider`] and attaches it; there is exactly
/// one attachment site by construction. Token-fetch failure fails the
/// request locally — nothing leaves the process unauthenticated.
///
/// No retries, no backoff, no timeouts.
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Gateway {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenProvider>) -> Result<Self, ClientError> {
        // Url::join treats a missing trailing slash as a file component.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|err| ClientError::Url(err.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            tokens,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::Url(err.to_string()))
    }

    async fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.tokens.bearer_token().await?;
        Ok(req.bearer_auth(token))
    }

    async fn check(&self, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body
                .error
                .or(body.detail)
                .unwrap_or_else(|| "server error".to_string()),
            Err(_) => "server error".to_string(),
        };
        tracing::debug!(%status, message, "request failed");
        Err(ClientError::from_status(status, message))
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let req = self.authorize(req).await?;
        let response = self.check(req.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_unit(&self, req: RequestBuilder) -> Result<(), ClientError> {
        let req = self.authorize(req).await?;
        self.check(req.send().await?).await?;
        Ok(())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let req = self.http.get(self.endpoint(path)?).query(query);
        self.send_json(req).await
    }

    pub(crate) async fn get_unit(&self, path: &str) -> Result<(), ClientError> {
        let req = self.http.get(self.endpoint(path)?);
        self.send_unit(req).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let req = self.http.post(self.endpoint(path)?).json(body);
        self.send_json(req).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let req = self.http.post(self.endpoint(path)?);
        self.send_json(req).await
    }

    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        let req = self.http.post(self.endpoint(path)?).json(body);
        self.send_unit(req).await
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let req = self.http.put(self.endpoint(path)?).json(body);
        self.send_json(req).await
    }

    pub(crate) async fn delete_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        let req = self.http.delete(self.endpoint(path)?).json(body);
        self.send_unit(req).await
    }
}
