// src/core/service_client.rs
//! Gateway HTTP client - bearer auth, session expiry and error shaping for every call

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

use crate::auth::{AuthGuard, SessionEvents};
use crate::core::config_manager::ClientConfig;
use crate::core::token_store::{FileTokenStore, TokenStore};
use crate::error::{ApiError, Result, UNKNOWN_ERROR};
use crate::types::response::ApiErrorBody;
use crate::utils::{content_type_for, join_url};

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ClientConfig,
    auth: AuthGuard,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        events: SessionEvents,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let auth = AuthGuard::new(store, events, &config.login_path);

        Ok(Self {
            client,
            config,
            auth,
        })
    }

    /// Client backed by the token file named in the configuration
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let store = Arc::new(FileTokenStore::new(config.token_path.clone()));
        Self::new(config, store, SessionEvents::new())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthGuard {
        &self.auth
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        self.auth.store()
    }

    pub fn gateway_url(&self, path: &str) -> String {
        join_url(&self.config.api_base_url, path)
    }

    pub fn ai_url(&self, path: &str) -> String {
        join_url(&self.config.ai_base(), path)
    }

    pub fn arc_url(&self, path: &str) -> String {
        join_url(&self.config.arc_base(), path)
    }

    // ===== Authenticated verbs =====

    pub async fn get_json<R>(&self, url: &str, context: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let builder = self.authorized(Method::GET, url)?;
        let response = self.dispatch(builder, url, context, true).await?;
        read_json(response, context).await
    }

    /// GET with a query string encoded from `query`.
    pub async fn get_json_query<Q, R>(&self, url: &str, query: &Q, context: &str) -> Result<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let builder = self.authorized(Method::GET, url)?.query(query);
        let response = self.dispatch(builder, url, context, true).await?;
        read_json(response, context).await
    }

    /// GET that bypasses intermediary caches, used after a write the
    /// gateway may still be serving stale.
    pub async fn get_json_uncached<R>(&self, url: &str, context: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let builder = self
            .authorized(Method::GET, url)?
            .header(CACHE_CONTROL, "no-cache");
        let response = self.dispatch(builder, url, context, true).await?;
        read_json(response, context).await
    }

    pub async fn post_json<T, R>(&self, url: &str, payload: &T, context: &str) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let builder = self.authorized(Method::POST, url)?.json(payload);
        let response = self.dispatch(builder, url, context, true).await?;
        read_json(response, context).await
    }

    pub async fn put_json<T, R>(&self, url: &str, payload: &T, context: &str) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let builder = self.authorized(Method::PUT, url)?.json(payload);
        let response = self.dispatch(builder, url, context, true).await?;
        read_json(response, context).await
    }

    pub async fn patch_json<T, R>(&self, url: &str, payload: &T, context: &str) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let builder = self.authorized(Method::PATCH, url)?.json(payload);
        let response = self.dispatch(builder, url, context, true).await?;
        read_json(response, context).await
    }

    pub async fn delete_json<R>(&self, url: &str, context: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let builder = self.authorized(Method::DELETE, url)?;
        let response = self.dispatch(builder, url, context, true).await?;
        read_json(response, context).await
    }

    /// POST with no body
    pub async fn post_empty<R>(&self, url: &str, context: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let builder = self
            .authorized(Method::POST, url)?
            .header(CONTENT_TYPE, "application/json");
        let response = self.dispatch(builder, url, context, true).await?;
        read_json(response, context).await
    }

    pub async fn post_multipart<R>(&self, url: &str, form: Form, context: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let builder = self.authorized(Method::POST, url)?.multipart(form);
        let response = self.dispatch(builder, url, context, true).await?;
        read_json(response, context).await
    }

    pub async fn get_bytes(&self, url: &str, context: &str) -> Result<Vec<u8>> {
        let builder = self.authorized(Method::GET, url)?;
        let response = self.dispatch(builder, url, context, true).await?;
        let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
            context: context.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    // ===== Unauthenticated verbs =====

    pub async fn get_public<R>(&self, url: &str, context: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let builder = self.client.get(url);
        let response = self.dispatch(builder, url, context, false).await?;
        read_json(response, context).await
    }

    pub async fn post_public<T, R>(&self, url: &str, payload: &T, context: &str) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let builder = self.client.post(url).json(payload);
        let response = self.dispatch(builder, url, context, false).await?;
        read_json(response, context).await
    }

    /// Build a multipart form holding one file under `field`.
    pub async fn file_form(&self, file_path: &Path, field: &str) -> Result<Form> {
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ApiError::InvalidInput(format!("Invalid file name: {}", file_path.display()))
            })?
            .to_string();
        let content_type = content_type_for(&file_name)?;

        let content = tokio::fs::read(file_path)
            .await
            .map_err(|e| ApiError::io(file_path.display().to_string(), e))?;

        if content.is_empty() {
            return Err(ApiError::InvalidInput(format!("{} is empty", file_name)));
        }

        let part = Part::bytes(content)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(|e| ApiError::InvalidInput(format!("Failed to create multipart: {}", e)))?;

        Ok(Form::new().part(field.to_string(), part))
    }

    fn authorized(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let token = self.auth.require_session()?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn dispatch(
        &self,
        builder: RequestBuilder,
        url: &str,
        context: &str,
        authed: bool,
    ) -> Result<Response> {
        debug!("Calling gateway: {}", url);

        let response = builder.send().await.map_err(|source| {
            error!("Request to {} failed: {}", url, source);
            ApiError::Transport {
                context: context.to_string(),
                source,
            }
        })?;

        let status = response.status();
        trace!("Response status from {}: {}", url, status);

        if status.is_success() {
            return Ok(response);
        }

        if authed && status == StatusCode::UNAUTHORIZED {
            warn!("Gateway rejected session token for {}", url);
            self.auth.end_session()?;
            return Err(self.auth.redirect());
        }

        let body = response.text().await.unwrap_or_default();
        let err = http_error(status, context, &body);
        info!("{} ({}): {}", context, status, err.user_message());
        Err(err)
    }
}

async fn read_json<R>(response: Response, context: &str) -> Result<R>
where
    R: DeserializeOwned,
{
    let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
        context: context.to_string(),
        source,
    })?;

    // 204 and empty 200 bodies decode as JSON null
    let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &bytes
    };

    serde_json::from_slice(raw).map_err(|source| {
        error!("{}: failed to decode response body: {}", context, source);
        ApiError::Decode {
            context: context.to_string(),
            source,
        }
    })
}

/// Shape a non-2xx response into an error with a non-empty message.
pub fn http_error(status: StatusCode, context: &str, body: &str) -> ApiError {
    let (message, kind) = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(text)) if !text.trim().is_empty() => (text, None),
        Ok(value @ Value::Object(_)) => {
            let parsed: ApiErrorBody = serde_json::from_value(value).unwrap_or_default();
            (
                parsed.message().unwrap_or_else(|| context.to_string()),
                parsed.error_type(),
            )
        }
        Ok(_) => (context.to_string(), None),
        Err(_) => (UNKNOWN_ERROR.to_string(), None),
    };

    ApiError::Http {
        status,
        context: context.to_string(),
        message,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::response::ApiErrorType;

    fn message_of(err: ApiError) -> String {
        err.user_message()
    }

    #[test]
    fn test_http_error_detail_body() {
        let err = http_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Failed to generate CV",
            r#"{"detail":"Slow down","type":"rate_limit_error"}"#,
        );
        match &err {
            ApiError::Http { kind, .. } => assert_eq!(*kind, Some(ApiErrorType::RateLimitError)),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(message_of(err), "Slow down");
    }

    #[test]
    fn test_http_error_non_json_body_is_unknown() {
        let err = http_error(StatusCode::BAD_GATEWAY, "Failed to fetch jobs", "<html>502</html>");
        assert_eq!(message_of(err), UNKNOWN_ERROR);

        let err = http_error(StatusCode::BAD_GATEWAY, "Failed to fetch jobs", "");
        assert_eq!(message_of(err), UNKNOWN_ERROR);
    }

    #[test]
    fn test_http_error_json_without_message_uses_context() {
        let err = http_error(StatusCode::NOT_FOUND, "Failed to fetch job", r#"{"code":404}"#);
        assert_eq!(message_of(err), "Failed to fetch job");

        let err = http_error(StatusCode::NOT_FOUND, "Failed to fetch job", "[]");
        assert_eq!(message_of(err), "Failed to fetch job");
    }

    #[test]
    fn test_http_error_plain_json_string() {
        let err = http_error(StatusCode::CONFLICT, "Failed to create job", r#""duplicate""#);
        assert_eq!(message_of(err), "duplicate");
    }

    #[test]
    fn test_url_helpers() {
        let client = ApiClient::new(
            ClientConfig::for_base_url("http://gw.local/"),
            Arc::new(crate::core::token_store::MemoryTokenStore::new()),
            SessionEvents::new(),
        )
        .unwrap();
        assert_eq!(client.gateway_url("/api/jobs"), "http://gw.local/api/jobs");
        assert_eq!(client.arc_url("health"), "http://gw.local/api/arc/health");
        assert_eq!(client.ai_url("/analyze"), "http://gw.local/api/ai/analyze");
    }
}
