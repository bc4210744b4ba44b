use tradenest_auth::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No credential stored; the request was not sent.
    #[error("not logged in")]
    NotAuthenticated,
    /// The backend rejected the bearer token (HTTP 401).
    #[error("access token rejected by the API")]
    Unauthorized,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// The backend's `message` field, when the error body carries one.
    pub fn backend_message(&self) -> Option<String> {
        let ApiError::Status { body, .. } = self else {
            return None;
        };
        serde_json::from_str::<serde_json::Value>(body)
            .ok()?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }

    /// Whether the failure means the session is no longer usable.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::NotAuthenticated | ApiError::Unauthorized)
    }
}
