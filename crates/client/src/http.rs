//! Request pipeline: authentication, dispatch, logging, and the global
//! session-expiry reaction.
//!
//! Every logical API call funnels through [`ApiClient::request`]. It merges
//! default headers, injects the bearer token when one is stored, and logs
//! the request/response pair as structured tracing events. On HTTP 401 it
//! tears the local session down and fires the [`AuthExpiredHook`] before
//! the error ever reaches the caller.

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ClientError;
use crate::store::SessionStore;

/// Cross-cutting reaction to a rejected session.
///
/// The pipeline invokes this exactly once per 401 response, after clearing
/// the session store, regardless of which operation triggered it. The CLI
/// installs a hook that points the user back at `login`; tests install a
/// recorder.
pub trait AuthExpiredHook: Send + Sync {
    fn on_auth_expired(&self);
}

/// HTTP front door for the reminder service.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    store: SessionStore,
    on_auth_expired: Option<Arc<dyn AuthExpiredHook>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            store,
            on_auth_expired: None,
        }
    }

    pub fn with_auth_expired_hook(mut self, hook: Arc<dyn AuthExpiredHook>) -> Self {
        self.on_auth_expired = Some(hook);
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.request(Method::GET, path, None, HeaderMap::new()).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.request(Method::POST, path, Some(body), HeaderMap::new())
            .await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.request(Method::PUT, path, Some(body), HeaderMap::new())
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.request(Method::DELETE, path, None, HeaderMap::new())
            .await
    }

    /// Issue one request and parse the body as JSON, success or not.
    ///
    /// Non-2xx statuses come back as [`ClientError::Api`] carrying the
    /// server's `message` field when present; the raw body is never handed
    /// to the caller.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        extra_headers: HeaderMap,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(extra_headers);
        if let Some(token) = self.store.token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ClientError::Store("stored token is not a valid header value".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        tracing::debug!(
            target: "remiaq::api",
            %url,
            method = %method,
            headers = ?headers,
            body = ?body.map(serde_json::Value::to_string),
            timestamp = %Utc::now().to_rfc3339(),
            "api request"
        );

        let mut builder = self.http.request(method, &url).headers(headers);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("");

        // Session teardown happens before the caller sees anything, no
        // matter which operation hit the 401.
        if status == reqwest::StatusCode::UNAUTHORIZED {
            if let Err(e) = self.store.clear() {
                tracing::warn!(target: "remiaq::api", error = %e, "failed to clear session");
            }
            if let Some(hook) = &self.on_auth_expired {
                hook.on_auth_expired();
            }
        }

        let text = response.text().await?;
        let data: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        tracing::debug!(
            target: "remiaq::api",
            status = status.as_u16(),
            status_text,
            body = %data,
            timestamp = %Utc::now().to_rfc3339(),
            "api response"
        );

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::AuthExpired {
                message: server_message(&data).unwrap_or_else(|| "session expired".into()),
            });
        }
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: server_message(&data),
            });
        }

        Ok(data)
    }
}

fn server_message(data: &Value) -> Option<String> {
    data.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
