//! Role-based navigation gate.
//!
//! The gate is the single authority deciding, for every render, whether the
//! shell shows a spinner, redirects, shows the invalid-role view, or renders
//! the requested screen. It is a pure function of the auth state and the
//! current location; it performs no I/O.

use super::role::Role;
use super::route;
use super::session::AuthState;

/// Derived gate state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Unauthenticated,
    InvalidRole,
    Authenticated(Role),
}

/// What the shell must do for the current render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session resolution is still in flight: show a blocking spinner.
    ShowLoading,
    /// Navigate to the given route.
    Redirect(&'static str),
    /// Show the account error view. The view must offer sign-out, which is
    /// the only way out of this state.
    ShowInvalidRole { email: Option<String> },
    /// Render the requested screen unchanged.
    RenderChildren,
}

impl GateDecision {
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GateDecision::Redirect(target) => Some(*target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGate;

impl AuthGate {
    pub fn new() -> Self {
        Self
    }

    /// Classifies the auth state. A provider error counts as "no session".
    pub fn state(&self, auth: &AuthState) -> GateState {
        if auth.loading {
            return GateState::Loading;
        }
        match auth.valid_session() {
            None => GateState::Unauthenticated,
            Some(session) => match session.role() {
                Role::Unknown => GateState::InvalidRole,
                role => GateState::Authenticated(role),
            },
        }
    }

    /// Decides what to render at `location`.
    ///
    /// Role redirects only fire from `/` or `/login`, so a role change picked
    /// up by a background refresh can never bounce a user off a deep screen.
    pub fn decide(&self, auth: &AuthState, location: &str) -> GateDecision {
        match self.state(auth) {
            GateState::Loading => GateDecision::ShowLoading,
            GateState::Unauthenticated => {
                if route::is_public(location) {
                    GateDecision::RenderChildren
                } else {
                    tracing::debug!(location, "no session, redirecting to login");
                    GateDecision::Redirect(route::LOGIN)
                }
            }
            GateState::InvalidRole => GateDecision::ShowInvalidRole {
                email: auth
                    .session
                    .as_ref()
                    .and_then(|session| session.user.email.clone()),
            },
            GateState::Authenticated(role) => {
                if !route::is_entry_point(location) {
                    return GateDecision::RenderChildren;
                }
                match role.home_route() {
                    Some(home) => {
                        tracing::debug!(location, %role, home, "redirecting to role home");
                        GateDecision::Redirect(home)
                    }
                    None => GateDecision::ShowInvalidRole {
                        email: auth
                            .session
                            .as_ref()
                            .and_then(|session| session.user.email.clone()),
                    },
                }
            }
        }
    }
}
