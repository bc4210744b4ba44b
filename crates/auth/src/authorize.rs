//! Route authorization gate.
//!
//! - No IO beyond reading the session store
//! - No caching: every navigation re-reads the role indicator
//! - No error path: unreadable state counts as "no role"

use std::sync::Arc;

use crate::routes::LOGIN_PATH;
use crate::{Role, SessionStore};

/// Classification of the viewer for one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    WrongRole(Role),
    Authorized(Role),
}

/// Terminal action of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    RedirectLogin,
    RedirectOwnDashboard(Role),
}

impl GateState {
    pub fn evaluate(role: Option<Role>, allowed: &[Role]) -> Self {
        match role {
            None => GateState::Unauthenticated,
            Some(role) if allowed.contains(&role) => GateState::Authorized(role),
            Some(role) => GateState::WrongRole(role),
        }
    }

    pub fn decision(self) -> GateDecision {
        match self {
            GateState::Unauthenticated => GateDecision::RedirectLogin,
            GateState::WrongRole(role) => GateDecision::RedirectOwnDashboard(role),
            GateState::Authorized(_) => GateDecision::Render,
        }
    }
}

impl GateDecision {
    /// Where to navigate instead of rendering, if anywhere.
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            GateDecision::Render => None,
            GateDecision::RedirectLogin => Some(LOGIN_PATH),
            GateDecision::RedirectOwnDashboard(role) => Some(role.dashboard_path()),
        }
    }
}

/// Gate over an injected session store.
#[derive(Clone)]
pub struct RouteGate {
    store: Arc<dyn SessionStore>,
}

impl RouteGate {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Classify the current viewer against `allowed`.
    pub fn state(&self, allowed: &[Role]) -> GateState {
        let role = match self.store.role() {
            Ok(role) => role,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read role indicator; treating as logged out");
                None
            }
        };
        GateState::evaluate(role, allowed)
    }

    pub fn check(&self, allowed: &[Role]) -> GateDecision {
        let state = self.state(allowed);
        let decision = state.decision();
        tracing::debug!(?state, ?decision, "route gate evaluated");
        decision
    }
}
