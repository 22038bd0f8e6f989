//! Platform REST client
//!
//! Attaches the session's bearer token to every request and unwraps the
//! `{success, data, message, errors}` envelope the backend answers with.
//! Requests are issued once: no retry, backoff, deduplication or caching.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::session::Session;

/// Response envelope shared by every endpoint
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_errors")]
    pub errors: Vec<String>,
}

impl<T> Envelope<T> {
    /// Take `data`, failing if the server omitted it
    pub fn into_data(self) -> ApiResult<T> {
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Error bodies list strings, but validators sometimes send `{msg}` objects
fn lenient_errors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => map
                .get("msg")
                .or_else(|| map.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        })
        .collect())
}

/// Best-effort message/errors from a failed response body
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_errors")]
    errors: Vec<String>,
}

/// Authenticated client for the platform API
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client for `config.base_url` bound to `session`
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request without a body, returning the unwrapped envelope
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> ApiResult<Envelope<T>> {
        let builder = self.http.request(method.clone(), self.url(path));
        self.dispatch(builder, method, path).await
    }

    /// Request with a JSON body, returning the unwrapped envelope
    pub(crate) async fn call_with<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.request(method.clone(), self.url(path)).json(body);
        self.dispatch(builder, method, path).await
    }

    /// `data` of a bodiless request
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> ApiResult<T> {
        self.call(method, path).await?.into_data()
    }

    /// `data` of a request with a JSON body
    pub(crate) async fn submit<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call_with(method, path, body).await?.into_data()
    }

    /// Bodiless request whose `data` is irrelevant; yields the server message
    pub(crate) async fn command(&self, method: Method, path: &str) -> ApiResult<Option<String>> {
        let envelope: Envelope<IgnoredAny> = self.call(method, path).await?;
        Ok(envelope.message)
    }

    /// Request with a JSON body whose `data` is irrelevant
    pub(crate) async fn command_with<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<Option<String>>
    where
        B: Serialize + ?Sized,
    {
        let envelope: Envelope<IgnoredAny> = self.call_with(method, path, body).await?;
        Ok(envelope.message)
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        mut builder: RequestBuilder,
        method: Method,
        path: &str,
    ) -> ApiResult<Envelope<T>> {
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        let started = std::time::Instant::now();
        let response = builder.send().await.map_err(|e| {
            tracing::debug!(%method, path, error = %e, "Request failed");
            ApiError::from_transport(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::from_transport)?;

        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API call"
        );

        if status == StatusCode::UNAUTHORIZED {
            self.session.expire().await;
        }

        if !status.is_success() {
            let details: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: details.message,
                errors: details.errors,
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

        if !envelope.success {
            return Err(ApiError::Rejected {
                message: envelope.message,
                errors: envelope.errors,
            });
        }

        Ok(envelope)
    }
}
