//! REST client for the QC backend.
//!
//! Every backend response is wrapped in an [`ApiResponse`] envelope. The
//! helpers here unwrap it and translate HTTP failures into
//! [`RepositoryError`] variants the services know how to surface.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::domain::auth::{LoginRequest, LoginResponse};
use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::repository::AuthGateway;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Header carrying the acting user's id next to the bearer token.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Standard response envelope of the backend.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Clone, Debug)]
struct Credentials {
    token: String,
    user_id: UserId,
}

/// Backend client, optionally bound to a signed-in user.
#[derive(Clone, Debug)]
pub struct BackendRepository {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl BackendRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RepositoryError::Unexpected(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    /// A copy of the client that authenticates as `user`.
    pub fn for_user(&self, user: &AuthenticatedUser) -> Self {
        self.with_credentials(&user.token, user.user_id())
    }

    pub fn with_credentials(&self, token: &str, user_id: UserId) -> Self {
        Self {
            credentials: Some(Credentials {
                token: token.to_string(),
                user_id,
            }),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("{method} {url}");
        let builder = self.http.request(method, url);
        match &self.credentials {
            Some(credentials) => builder
                .header(AUTHORIZATION, format!("Bearer {}", credentials.token))
                .header(USER_ID_HEADER, credentials.user_id.to_string()),
            None => builder,
        }
    }

    /// Sends the request and returns the envelope's `data`.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> RepositoryResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }

        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.success {
            return Err(RepositoryError::Backend {
                status: status.as_u16(),
                message: envelope.message.unwrap_or_default(),
            });
        }
        envelope
            .data
            .ok_or_else(|| RepositoryError::Unexpected("Backend response has no data".to_string()))
    }

    /// Sends the request, ignoring any payload.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> RepositoryResult<()> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }
        Ok(())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> RepositoryResult<T> {
        self.send(self.request(Method::GET, path)).await
    }

    /// Like [`Self::get`] but maps 404 to `None`.
    pub(crate) async fn find<T: DeserializeOwned>(&self, path: &str) -> RepositoryResult<Option<T>> {
        match self.get(path).await {
            Ok(value) => Ok(Some(value)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> RepositoryResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> RepositoryResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub(crate) async fn put_text<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &str,
    ) -> RepositoryResult<T> {
        self.send(
            self.request(Method::PUT, path)
                .header(CONTENT_TYPE, "text/plain")
                .body(body.to_string()),
        )
        .await
    }

    pub(crate) async fn delete(&self, path: &str) -> RepositoryResult<()> {
        self.send_empty(self.request(Method::DELETE, path)).await
    }
}

async fn error_from_response(status: StatusCode, response: reqwest::Response) -> RepositoryError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or(body);
    log::debug!("Backend responded {status}: {message}");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::SessionExpired,
        StatusCode::NOT_FOUND => RepositoryError::NotFound,
        _ => RepositoryError::Backend {
            status: status.as_u16(),
            message,
        },
    }
}

impl AuthGateway for BackendRepository {
    async fn login(&self, username: &str, password: &str) -> RepositoryResult<LoginResponse> {
        let request = self
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest { username, password });
        match self.send(request).await {
            Err(RepositoryError::SessionExpired) => Err(RepositoryError::InvalidCredentials),
            other => other,
        }
    }

    async fn current_user(&self) -> RepositoryResult<User> {
        self.get("/auth/me").await
    }
}
