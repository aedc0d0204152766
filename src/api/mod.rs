//! The single HTTP client every screen talks to the backend through.
//!
//! Each request is built against the configured base URL and passed through
//! [`ApiClient::authorize`], which copies the current session token into an
//! `Authorization: Bearer` header. There is no retry, queuing or caching:
//! one call is one request, and its outcome is returned to the caller.

pub mod form;

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::error::{ClientError, Result};
use crate::session::{AuthUser, SessionContext};

pub use form::{FormPayload, Upload};

/// Body of a successful `POST /login`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: AuthUser,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionContext) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("school-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_http(http, base_url, session)
    }

    /// Client built from the global [`crate::config::AppConfig`]
    pub fn from_config(session: SessionContext) -> Result<Self> {
        let cfg = &crate::config::config().api;
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Self::with_http(http, &cfg.base_url, session)
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, session: SessionContext) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with '/'
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Attach the stored token, if any, as a bearer credential
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "api request");
        Ok(self
            .authorize(self.http.request(method, url))
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    /// Send and return the raw body of a 2xx response
    async fn execute(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let err = ClientError::from_response(status.as_u16(), &body);
        match &err {
            ClientError::Validation { errors, .. } => {
                tracing::debug!(status = status.as_u16(), fields = errors.len(), "validation failed")
            }
            ClientError::Unauthorized(_) => tracing::warn!("backend rejected the session token"),
            _ => tracing::error!(status = status.as_u16(), "api request failed: {}", err),
        }
        Err(err)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.execute(request).await?;
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute_json(self.request(Method::GET, path)?).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute_json(self.request(Method::GET, path)?.query(query))
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute_json(self.request(Method::POST, path)?.json(body))
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute_json(self.request(Method::PUT, path)?.json(body))
            .await
    }

    /// Response bodies of deletes are ignored
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, payload: FormPayload) -> Result<T> {
        let form = payload.into_form().await?;
        self.execute_json(self.request(Method::POST, path)?.multipart(form))
            .await
    }

    /// Multipart update, sent as POST with `_method=PUT` so the backend can
    /// read the uploaded file
    pub async fn put_multipart<T: DeserializeOwned>(&self, path: &str, payload: FormPayload) -> Result<T> {
        self.post_multipart(path, payload.text("_method", "PUT")).await
    }

    /// Exchange credentials for a token. Every failure reads as invalid
    /// credentials; the cause is only logged.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let credentials = json!({ "email": email, "password": password });

        match self.post::<LoginResponse, _>("login", &credentials).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!("login failed: {}", e);
                Err(ClientError::InvalidCredentials)
            }
        }
    }

    /// Profile of the logged-in user
    pub async fn current_user(&self) -> Result<Value> {
        self.get("user").await
    }
}
