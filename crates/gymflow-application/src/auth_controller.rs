//! Publishes the authentication state to the UI shell and applies the gate.

use std::sync::{Arc, Weak};

use gymflow_core::auth::{
    AuthGate, AuthSession, AuthState, GateDecision, IdentityProvider, SessionEvent,
};
use gymflow_core::error::Result;
use gymflow_core::validation::{validate_email, validate_password};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::context::AppContext;

/// Owns the [`AuthState`] the gate reads.
///
/// The state starts as loading, is resolved once by [`initialize`](Self::initialize)
/// and then follows the provider's session events. Sign-out, from any source,
/// tears down the shared context.
pub struct AuthController {
    provider: Arc<dyn IdentityProvider>,
    context: Arc<AppContext>,
    gate: AuthGate,
    state: watch::Sender<AuthState>,
}

impl AuthController {
    pub fn new(provider: Arc<dyn IdentityProvider>, context: Arc<AppContext>) -> Arc<Self> {
        let (state, _) = watch::channel(AuthState::loading());
        Arc::new(Self {
            provider,
            context,
            gate: AuthGate::new(),
            state,
        })
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published state.
    pub fn watch(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn publish(&self, next: AuthState) {
        self.state.send_replace(next);
    }

    /// Resolves the session once at start-up.
    ///
    /// A provider error is published as "no session" with the error kept for
    /// display.
    pub async fn initialize(&self) {
        let lookup = self.provider.current_session().await;
        match &lookup.error {
            Some(error) => tracing::warn!(error = %error, "session resolution failed"),
            None => tracing::debug!(signed_in = lookup.session.is_some(), "session resolved"),
        }
        let session = if lookup.error.is_some() {
            None
        } else {
            lookup.session
        };
        self.publish(AuthState::resolved(session, lookup.error));
    }

    /// Follows provider events until the controller is dropped.
    pub fn spawn_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut subscription = self.provider.subscribe();
        let controller: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            while let Some(event) = subscription.next().await {
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                controller.apply_event(event);
            }
        })
    }

    pub fn apply_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::SignedIn(session) | SessionEvent::TokenRefreshed(session) => {
                self.publish(AuthState::resolved(Some(session), None));
            }
            SessionEvent::SignedOut => {
                self.context.teardown();
                self.publish(AuthState::signed_out());
            }
        }
    }

    pub fn decide(&self, location: &str) -> GateDecision {
        self.gate.decide(&self.state.borrow(), location)
    }

    pub fn current_session(&self) -> Option<AuthSession> {
        self.state.borrow().valid_session().cloned()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let email = validate_email(email)?;
        validate_password(password)?;
        let session = self
            .context
            .timeouts()
            .run(
                "auth.sign_in",
                self.provider.sign_in_with_password(&email, password),
            )
            .await?;
        self.publish(AuthState::resolved(Some(session.clone()), None));
        Ok(session)
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let email = validate_email(email)?;
        self.context
            .timeouts()
            .run(
                "auth.password_reset",
                self.provider.request_password_reset(&email),
            )
            .await
    }

    /// Signs out locally even when the provider call fails; the failure is
    /// still returned.
    pub async fn sign_out(&self) -> Result<()> {
        self.context.teardown();
        let result = self.provider.sign_out().await;
        self.publish(AuthState::signed_out());
        if let Err(err) = &result {
            tracing::warn!(error = %err, "provider sign-out failed");
        }
        result
    }
}
