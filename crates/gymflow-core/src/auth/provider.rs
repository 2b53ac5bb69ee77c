//! Identity provider contract.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::session::AuthSession;
use crate::error::Result;

/// Result of resolving the current session.
///
/// Mirrors the provider's shape: a session-or-none plus an optional error.
/// Consumers treat an error identically to "no session".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLookup {
    pub session: Option<AuthSession>,
    pub error: Option<String>,
}

impl SessionLookup {
    pub fn found(session: AuthSession) -> Self {
        Self {
            session: Some(session),
            error: None,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            session: None,
            error: Some(error.into()),
        }
    }
}

/// Push notifications from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(AuthSession),
    TokenRefreshed(AuthSession),
    SignedOut,
}

impl SessionEvent {
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            SessionEvent::SignedIn(session) | SessionEvent::TokenRefreshed(session) => {
                Some(session)
            }
            SessionEvent::SignedOut => None,
        }
    }
}

/// Handle returned by [`IdentityProvider::subscribe`].
///
/// Dropping the handle (or calling [`unsubscribe`](Self::unsubscribe))
/// detaches the listener.
pub struct SessionSubscription {
    receiver: broadcast::Receiver<SessionEvent>,
}

impl SessionSubscription {
    pub fn new(receiver: broadcast::Receiver<SessionEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event. Returns `None` once the provider is gone.
    ///
    /// Lagged receivers skip the missed events; only the latest state matters.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session subscriber lagged behind");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}

/// External identity provider (credential exchange, refresh, sign-out).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the current session, possibly from persisted local state.
    async fn current_session(&self) -> SessionLookup;

    /// Subscribes to session changes.
    fn subscribe(&self) -> SessionSubscription;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Exchanges the refresh token for a new session.
    async fn refresh_session(&self) -> Result<AuthSession>;

    async fn sign_out(&self) -> Result<()>;

    /// Sends a password-reset email.
    async fn request_password_reset(&self, email: &str) -> Result<()>;
}
