//! `tradenest-auth`: client-side session state and role-gated routing.
//!
//! This crate is intentionally decoupled from HTTP and timers: it owns the
//! stored session, the route table and the authorization gate, all of which
//! are synchronous and testable against an in-memory store.

pub mod authorize;
pub mod credential;
pub mod file_store;
pub mod roles;
pub mod routes;
pub mod store;

pub use authorize::{GateDecision, GateState, RouteGate};
pub use credential::{Credential, RefreshIdentity, Session, TokenPair};
pub use file_store::FileSessionStore;
pub use roles::{Role, UnknownRole};
pub use routes::{RouteMatch, RouteTable, View};
pub use store::{InMemorySessionStore, SessionStore, StorageEntries, StoreError};
