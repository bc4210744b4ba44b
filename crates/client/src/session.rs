//! Login and logout.

use std::sync::Arc;

use tradenest_auth::routes::LOGIN_PATH;
use tradenest_auth::{Credential, Role, Session, SessionStore, StoreError};

use crate::backend::{AuthApi, LoginRequest};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub email: String,
    pub role: Role,
    /// Where to go next: the role's own dashboard.
    pub landing: &'static str,
    /// Backend's greeting, if any.
    pub message: Option<String>,
}

/// The stored session's owner. `role` is `None` when the stored indicator
/// does not decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub email: String,
    pub role: Option<Role>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("login failed: {}", describe(.0))]
    Api(#[from] ApiError),
    #[error("invalid user role '{0}'")]
    InvalidRole(String),
    #[error("failed to persist session: {0}")]
    Store(#[from] StoreError),
}

fn describe(err: &ApiError) -> String {
    err.backend_message().unwrap_or_else(|| err.to_string())
}

/// Login/logout flow over the session store.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn AuthApi>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, api: Arc<dyn AuthApi>) -> Self {
        Self { store, api }
    }

    /// Authenticate and persist the session.
    ///
    /// The role code is validated before anything is written, so a rejected
    /// login never leaves a credential without a role behind. The session is
    /// the last write: an `Err` always means no new session was stored.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoginOutcome, LoginError> {
        let resp = self.api.login(&LoginRequest::new(email, password)).await?;

        let role = resp
            .role
            .role()
            .ok_or_else(|| LoginError::InvalidRole(resp.role.to_string()))?;

        let session = Session {
            credential: Credential::new(resp.tokens.token, resp.tokens.refresh_token, &resp.email),
            role,
        };
        let remembered = remember.then_some(resp.email.as_str());
        self.store.set_remembered_email(remembered)?;
        self.store.save_session(&session)?;

        tracing::info!(email = %resp.email, %role, "logged in");

        Ok(LoginOutcome {
            email: resp.email,
            role,
            landing: role.dashboard_path(),
            message: resp.message,
        })
    }

    /// Clear all stored state and return the login path.
    pub fn logout(&self) -> Result<&'static str, StoreError> {
        self.store.clear()?;
        tracing::info!("logged out");
        Ok(LOGIN_PATH)
    }

    /// Who is logged in, if anyone.
    pub fn current(&self) -> Result<Option<CurrentUser>, StoreError> {
        let Some(credential) = self.store.credential()? else {
            return Ok(None);
        };
        Ok(Some(CurrentUser {
            email: credential.owner_email,
            role: self.store.role()?,
        }))
    }

    pub fn remembered_email(&self) -> Result<Option<String>, StoreError> {
        self.store.remembered_email()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{LoginResponse, RefreshRequest, RoleCode};
    use async_trait::async_trait;
    use tradenest_auth::{InMemorySessionStore, RefreshIdentity, TokenPair};

    struct FixedLogin(Result<serde_json::Value, ApiError>);

    #[async_trait]
    impl AuthApi for FixedLogin {
        async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse, ApiError> {
            match &self.0 {
                Ok(body) => Ok(serde_json::from_value(body.clone()).unwrap()),
                Err(ApiError::Status { status, body }) => Err(ApiError::Status {
                    status: *status,
                    body: body.clone(),
                }),
                Err(other) => Err(ApiError::Network(other.to_string())),
            }
        }

        async fn refresh(&self, _request: &RefreshRequest) -> Result<TokenPair, ApiError> {
            unreachable!("refresh is not part of login")
        }
    }

    fn service(response: Result<serde_json::Value, ApiError>) -> (Arc<InMemorySessionStore>, SessionService) {
        let store = Arc::new(InMemorySessionStore::new());
        let svc = SessionService::new(store.clone(), Arc::new(FixedLogin(response)));
        (store, svc)
    }

    #[tokio::test]
    async fn login_persists_session_and_lands_on_dashboard() {
        let (store, svc) = service(Ok(serde_json::json!({
            "token": "t", "refreshToken": "r", "email": "ada@shop.io", "role": 0,
            "message": "Login successful"
        })));

        let outcome = svc.login("ada@shop.io", "pw", false).await.unwrap();
        assert_eq!(outcome.role, Role::Admin);
        assert_eq!(outcome.landing, "/admin/dashboard");
        assert_eq!(outcome.message.as_deref(), Some("Login successful"));

        let entries = store.entries();
        assert_eq!(entries.token.as_deref(), Some("t"));
        assert_eq!(entries.role.as_deref(), Some("0"));
        assert!(entries.remembered_email.is_none());
    }

    #[tokio::test]
    async fn remember_me_keeps_email_until_unticked() {
        let body = serde_json::json!({
            "token": "t", "refreshToken": "r", "email": "cara@shop.io", "role": "2"
        });

        let (store, svc) = service(Ok(body));
        svc.login("cara@shop.io", "pw", true).await.unwrap();
        assert_eq!(svc.remembered_email().unwrap().as_deref(), Some("cara@shop.io"));

        svc.login("cara@shop.io", "pw", false).await.unwrap();
        assert!(store.entries().remembered_email.is_none());
    }

    #[tokio::test]
    async fn invalid_role_persists_nothing() {
        let (store, svc) = service(Ok(serde_json::json!({
            "token": "t", "refreshToken": "r", "email": "x@shop.io", "role": 9
        })));

        let err = svc.login("x@shop.io", "pw", true).await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidRole(ref code) if code == "9"));
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn backend_message_surfaces_in_error() {
        let (store, svc) = service(Err(ApiError::Status {
            status: 400,
            body: r#"{"message":"Invalid email or password"}"#.into(),
        }));

        let err = svc.login("x@shop.io", "bad", false).await.unwrap_err();
        assert_eq!(err.to_string(), "login failed: Invalid email or password");
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let (store, svc) = service(Ok(serde_json::json!({
            "token": "t", "refreshToken": "r", "email": "sam@shop.io", "role": 1
        })));
        svc.login("sam@shop.io", "pw", true).await.unwrap();
        assert_eq!(
            svc.current().unwrap(),
            Some(CurrentUser {
                email: "sam@shop.io".to_string(),
                role: Some(Role::Seller),
            })
        );

        assert_eq!(svc.logout().unwrap(), LOGIN_PATH);
        assert!(store.entries().is_empty());
        assert_eq!(svc.current().unwrap(), None);
    }

    /// In-memory store whose remembered-email write always fails.
    struct NoRememberStore(InMemorySessionStore);

    impl SessionStore for NoRememberStore {
        fn credential(&self) -> Result<Option<Credential>, StoreError> {
            self.0.credential()
        }
        fn refresh_identity(&self) -> Result<Option<RefreshIdentity>, StoreError> {
            self.0.refresh_identity()
        }
        fn role(&self) -> Result<Option<Role>, StoreError> {
            self.0.role()
        }
        fn save_session(&self, session: &Session) -> Result<(), StoreError> {
            self.0.save_session(session)
        }
        fn replace_tokens(
            &self,
            sent: &RefreshIdentity,
            tokens: &TokenPair,
        ) -> Result<bool, StoreError> {
            self.0.replace_tokens(sent, tokens)
        }
        fn remembered_email(&self) -> Result<Option<String>, StoreError> {
            self.0.remembered_email()
        }
        fn set_remembered_email(&self, _email: Option<&str>) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: "session.json".into(),
                source: std::io::Error::other("disk full"),
            })
        }
        fn clear(&self) -> Result<(), StoreError> {
            self.0.clear()
        }
    }

    #[tokio::test]
    async fn failed_login_write_stores_no_session() {
        let store = Arc::new(NoRememberStore(InMemorySessionStore::new()));
        let svc = SessionService::new(
            store.clone(),
            Arc::new(FixedLogin(Ok(serde_json::json!({
                "token": "t", "refreshToken": "r", "email": "sam@shop.io", "role": 1
            })))),
        );

        let err = svc.login("sam@shop.io", "pw", true).await.unwrap_err();
        assert!(matches!(err, LoginError::Store(_)));
        assert!(store.credential().unwrap().is_none());
        assert!(store.role().unwrap().is_none());
        assert_eq!(svc.current().unwrap(), None);
    }

    #[test]
    fn role_code_display_is_used_for_invalid_role() {
        let err = LoginError::InvalidRole(RoleCode::Number(4).to_string());
        assert_eq!(err.to_string(), "invalid user role '4'");
    }
}
