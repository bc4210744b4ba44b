//! `tradenest-client`
//!
//! **Responsibility:** client-side session lifecycle for the storefront.
//!
//! This crate provides:
//! - HTTP bindings for the backend's auth endpoints and bearer-authenticated calls
//! - A debounce primitive and the activity-driven Session Guard that refreshes tokens
//! - Login/logout and the application shell that routes through the gate
//!
//! The backend owns all business logic; this crate is a **thin shell** around it.

pub mod api_client;
pub mod backend;
pub mod config;
pub mod debounce;
pub mod error;
pub mod guard;
pub mod refresher;
pub mod session;
pub mod shell;

mod http;

pub use api_client::ApiClient;
pub use backend::{AuthApi, HttpAuthApi, LoginRequest, LoginResponse, RefreshRequest};
pub use config::{ClientConfig, ConfigError};
pub use debounce::Debouncer;
pub use error::ApiError;
pub use guard::{ActivityEvent, ActivityHandle, SessionGuard};
pub use refresher::{RefreshError, RefreshOutcome, TokenRefresher};
pub use session::{CurrentUser, LoginError, LoginOutcome, SessionService};
pub use shell::{AppShell, Navigation};
