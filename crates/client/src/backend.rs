//! Bindings for the backend's authentication endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tradenest_auth::{Role, TokenPair};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http;

pub const LOGIN_ENDPOINT: &str = "/api/Auth/login";
pub const REFRESH_ENDPOINT: &str = "/api/Auth/refresh-token";

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Serialize)]
pub struct RefreshRequest {
    pub email: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Role code as sent by the backend: a number, or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoleCode {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub email: String,
    pub role: RoleCode,
    #[serde(default)]
    pub message: Option<String>,
}

/// The backend's auth surface, as the client consumes it.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Exchange a refresh token for a new pair. Non-2xx is an error.
    async fn refresh(&self, request: &RefreshRequest) -> Result<TokenPair, ApiError>;
}

/// `AuthApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpAuthApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: config.api_base_url.clone(),
            http: http::build_client(config)?,
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: serde::de::DeserializeOwned,
    {
        let url = http::endpoint(&self.base_url, path);
        let resp = http::send(self.http.post(&url).json(body)).await?;
        http::read_json(resp).await
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post(LOGIN_ENDPOINT, request).await
    }

    async fn refresh(&self, request: &RefreshRequest) -> Result<TokenPair, ApiError> {
        self.post(REFRESH_ENDPOINT, request).await
    }
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl RoleCode {
    pub fn role(&self) -> Option<Role> {
        match self {
            RoleCode::Number(code) => Role::from_code(*code),
            RoleCode::Text(text) => text.trim().parse::<i64>().ok().and_then(Role::from_code),
        }
    }
}

impl core::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RoleCode::Number(code) => write!(f, "{code}"),
            RoleCode::Text(text) => f.write_str(text),
        }
    }
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl core::fmt::Debug for RefreshRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RefreshRequest")
            .field("email", &self.email)
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_accepts_numeric_role() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"token":"t","refreshToken":"r","email":"a@b.io","role":1,"message":"Login successful"}"#,
        )
        .unwrap();
        assert_eq!(resp.role.role(), Some(Role::Seller));
        assert_eq!(resp.tokens.refresh_token, "r");
        assert_eq!(resp.message.as_deref(), Some("Login successful"));
    }

    #[test]
    fn login_response_accepts_string_role_and_missing_message() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"token":"t","refreshToken":"r","email":"a@b.io","role":"2"}"#)
                .unwrap();
        assert_eq!(resp.role.role(), Some(Role::Customer));
        assert!(resp.message.is_none());
    }

    #[test]
    fn out_of_table_role_code_has_no_role() {
        assert_eq!(RoleCode::Number(5).role(), None);
        assert_eq!(RoleCode::Text("admin".into()).role(), None);
        assert_eq!(RoleCode::Number(5).to_string(), "5");
    }

    #[test]
    fn refresh_request_uses_backend_field_names() {
        let body = serde_json::to_value(RefreshRequest {
            email: "a@b.io".into(),
            refresh_token: "r".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"email": "a@b.io", "refreshToken": "r"}));
    }
}
