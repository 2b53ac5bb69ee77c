//! HTTP client for the hosted backend (data, auth and function endpoints).

use std::sync::RwLock;

use gymflow_core::error::{GymError, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{is_no_rows, map_http_error, map_transport_error};
use super::query::TableQuery;
use crate::config::BackendConfig;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Raw reply from a serverless function; status handling is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionReply {
    pub status: StatusCode,
    pub body: String,
}

/// Thin wrapper around [`reqwest::Client`] that adds the project key, the
/// caller's bearer token and error mapping to every request.
///
/// No deadline is configured here; callers wrap requests in the timeout
/// manager so that aborts are tracked in one place.
pub struct RestClient {
    http: Client,
    base_url: String,
    anon_key: String,
    access_token: RwLock<Option<String>>,
}

impl RestClient {
    pub fn new(backend: &BackendConfig) -> Result<Self> {
        backend.validate()?;
        let http = Client::builder()
            .build()
            .map_err(|e| GymError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: backend.url.trim_end_matches('/').to_string(),
            anon_key: backend.anon_key.clone(),
            access_token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sets (or clears) the user token used for data requests.
    pub fn set_access_token(&self, token: Option<String>) {
        let mut slot = self
            .access_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = token;
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        let token = match bearer {
            Some(token) => token.to_string(),
            None => self.access_token().unwrap_or_else(|| self.anon_key.clone()),
        };
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = map_http_error(status, &body);
        tracing::debug!(%status, error = %err, "backend request failed");
        Err(err)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    // ============================================================================
    // Data endpoints
    // ============================================================================

    pub async fn select<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<Vec<T>> {
        let request = self
            .http
            .get(self.url(&query.path()))
            .query(&query.to_params());
        let response = self.send(self.authorized(request, None)).await?;
        Self::read_json(response).await
    }

    /// Reads exactly one row; a "no rows" answer becomes `None`.
    pub async fn select_single<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<Option<T>> {
        let request = self
            .http
            .get(self.url(&query.path()))
            .query(&query.to_params())
            .header("Accept", SINGLE_OBJECT);
        match self.send(self.authorized(request, None)).await {
            Ok(response) => Self::read_json(response).await.map(Some),
            Err(err) if is_no_rows(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Inserts one row and returns it as stored.
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.url(&TableQuery::from(table).path()))
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(row);
        let response = self.send(self.authorized(request, None)).await?;
        Self::read_json(response).await
    }

    pub async fn update<B>(&self, query: &TableQuery, patch: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .http
            .patch(self.url(&query.path()))
            .query(&query.to_params())
            .json(patch);
        self.send(self.authorized(request, None)).await?;
        Ok(())
    }

    pub async fn delete(&self, query: &TableQuery) -> Result<()> {
        let request = self
            .http
            .delete(self.url(&query.path()))
            .query(&query.to_params());
        self.send(self.authorized(request, None)).await?;
        Ok(())
    }

    /// Calls a stored procedure and decodes its result.
    pub async fn rpc<B, T>(&self, function: &str, args: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.url(&format!("rest/v1/rpc/{function}")))
            .json(args);
        let response = self.send(self.authorized(request, None)).await?;
        Self::read_json(response).await
    }

    /// Calls a stored procedure whose result is ignored.
    pub async fn rpc_void<B>(&self, function: &str, args: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .http
            .post(self.url(&format!("rest/v1/rpc/{function}")))
            .json(args);
        self.send(self.authorized(request, None)).await?;
        Ok(())
    }

    // ============================================================================
    // Auth endpoints
    // ============================================================================

    /// POSTs to an auth endpoint with the project key as bearer.
    pub async fn auth_post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);
        let anon_key = self.anon_key.clone();
        let response = self.send(self.authorized(request, Some(&anon_key))).await?;
        Self::read_json(response).await
    }

    /// POSTs to an auth endpoint, discarding the reply body.
    pub async fn auth_post_empty<B>(&self, path: &str, body: &B, bearer: Option<&str>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.http.post(self.url(path)).json(body);
        let bearer = bearer.unwrap_or(&self.anon_key).to_string();
        self.send(self.authorized(request, Some(&bearer))).await?;
        Ok(())
    }

    // ============================================================================
    // Functions
    // ============================================================================

    /// Invokes a serverless function with the caller's token.
    ///
    /// Only transport failures are errors; any HTTP status is returned.
    pub async fn invoke_function<B>(
        &self,
        name: &str,
        access_token: &str,
        body: &B,
    ) -> Result<FunctionReply>
    where
        B: Serialize + ?Sized,
    {
        let request = self
            .http
            .post(self.url(&format!("functions/v1/{name}")))
            .json(body);
        let response = self
            .authorized(request, Some(access_token))
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        Ok(FunctionReply { status, body })
    }
}
