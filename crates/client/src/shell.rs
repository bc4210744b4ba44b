//! Application shell: owns the session state and wires guard, gate and API.

use std::sync::Arc;

use tradenest_auth::routes::LOGIN_PATH;
use tradenest_auth::{FileSessionStore, RouteGate, RouteTable, SessionStore, StoreError, View};

use crate::api_client::ApiClient;
use crate::backend::{AuthApi, HttpAuthApi};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::guard::{ActivityHandle, SessionGuard};
use crate::refresher::TokenRefresher;
use crate::session::{LoginError, LoginOutcome, SessionService};

/// Result of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(View),
    Redirect(&'static str),
}

pub struct AppShell {
    config: ClientConfig,
    store: Arc<dyn SessionStore>,
    routes: RouteTable<View>,
    gate: RouteGate,
    session: SessionService,
    refresher: Arc<TokenRefresher>,
    api: ApiClient,
    guard: Option<SessionGuard>,
}

impl AppShell {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
        auth: Arc<dyn AuthApi>,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config, store.clone())?;
        Ok(Self {
            routes: RouteTable::storefront(),
            gate: RouteGate::new(store.clone()),
            session: SessionService::new(store.clone(), auth.clone()),
            refresher: Arc::new(TokenRefresher::new(store.clone(), auth)),
            api,
            store,
            config,
            guard: None,
        })
    }

    /// Durable store at `config.session_file`, HTTP backend at `config.api_base_url`.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
        let auth = Arc::new(HttpAuthApi::new(&config)?);
        Self::new(config, store, auth)
    }

    pub fn with_routes(mut self, routes: RouteTable<View>) -> Self {
        self.routes = routes;
        self
    }

    /// Start the Session Guard (idempotent) and return its activity listener.
    pub fn mount(&mut self) -> ActivityHandle {
        let guard = self.guard.get_or_insert_with(|| {
            SessionGuard::mount(self.refresher.clone(), self.config.refresh_after)
        });
        guard.listener()
    }

    pub fn unmount(&mut self) {
        if let Some(guard) = self.guard.take() {
            guard.unmount();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.guard.is_some()
    }

    /// Resolve `path` and run the gate when the route is protected.
    pub fn navigate(&self, path: &str) -> Navigation {
        let route = self.routes.resolve(path);
        let Some(allowed) = route.allowed else {
            return Navigation::Render(*route.view);
        };

        match self.gate.check(allowed).redirect_target() {
            None => Navigation::Render(*route.view),
            Some(target) => {
                tracing::debug!(path, target, "navigation redirected");
                Navigation::Redirect(target)
            }
        }
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoginOutcome, LoginError> {
        self.session.login(email, password, remember).await
    }

    pub fn logout(&self) -> Result<Navigation, StoreError> {
        self.session.logout().map(Navigation::Redirect)
    }

    /// React to a failed API call. A rejected or missing token forces a
    /// re-login: the session is cleared and the login page is the next stop.
    pub fn on_api_error(&self, err: &ApiError) -> Option<Navigation> {
        if !err.requires_login() {
            return None;
        }
        if let Err(clear_err) = self.store.clear() {
            tracing::warn!(error = %clear_err, "failed to clear session after auth failure");
        }
        Some(Navigation::Redirect(LOGIN_PATH))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn refresher(&self) -> &Arc<TokenRefresher> {
        &self.refresher
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Drop for AppShell {
    fn drop(&mut self) {
        self.unmount();
    }
}
