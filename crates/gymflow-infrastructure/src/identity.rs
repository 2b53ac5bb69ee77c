//! Identity provider backed by the hosted auth service.
//!
//! The session is held in memory and mirrored to the local key-value store so
//! it survives restarts. Every change is broadcast as a [`SessionEvent`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use gymflow_core::auth::{
    AuthSession, IdentityProvider, SessionEvent, SessionLookup, SessionSubscription,
};
use gymflow_core::error::{GymError, Result};
use gymflow_core::storage::{KeyValueStore, keys};
use serde_json::json;
use tokio::sync::{RwLock, broadcast};

use crate::dto::TokenResponse;
use crate::rest::RestClient;

const EVENT_CAPACITY: usize = 16;

const PASSWORD_GRANT: &str = "auth/v1/token?grant_type=password";
const REFRESH_GRANT: &str = "auth/v1/token?grant_type=refresh_token";
const LOGOUT: &str = "auth/v1/logout";
const RECOVER: &str = "auth/v1/recover";

pub struct HttpIdentityProvider {
    rest: Arc<RestClient>,
    store: Arc<dyn KeyValueStore>,
    session: RwLock<Option<AuthSession>>,
    events: broadcast::Sender<SessionEvent>,
}

impl HttpIdentityProvider {
    pub fn new(rest: Arc<RestClient>, store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            rest,
            store,
            session: RwLock::new(None),
            events,
        }
    }

    /// Reads the persisted session, if any, into memory.
    async fn restore(&self) -> Result<Option<AuthSession>> {
        let Some(raw) = self.store.get(keys::SESSION).await? else {
            return Ok(None);
        };
        let session: AuthSession = serde_json::from_str(&raw)?;
        self.rest.set_access_token(Some(session.access_token.clone()));
        *self.session.write().await = Some(session.clone());
        tracing::debug!(user_id = %session.user_id(), "restored persisted session");
        Ok(Some(session))
    }

    async fn install(&self, session: AuthSession, refreshed: bool) -> Result<AuthSession> {
        let raw = serde_json::to_string(&session)?;
        self.store.set(keys::SESSION, &raw).await?;
        self.rest.set_access_token(Some(session.access_token.clone()));
        *self.session.write().await = Some(session.clone());

        let event = if refreshed {
            SessionEvent::TokenRefreshed(session.clone())
        } else {
            SessionEvent::SignedIn(session.clone())
        };
        // no subscribers is fine
        let _ = self.events.send(event);
        Ok(session)
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.refresh_token.clone());
        }
        Ok(self.restore().await?.and_then(|s| s.refresh_token))
    }
}

/// Auth endpoints answer bad credentials with a 400; surface those as auth failures.
fn as_auth_error(err: GymError) -> GymError {
    match err {
        GymError::Remote { message, .. } => GymError::auth(message),
        other => other,
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn current_session(&self) -> SessionLookup {
        let cached = self.session.read().await.clone();
        let session = match cached {
            Some(session) => session,
            None => match self.restore().await {
                Ok(Some(session)) => session,
                Ok(None) => return SessionLookup::none(),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to restore persisted session");
                    return SessionLookup::failed(err.user_message());
                }
            },
        };

        if !session.is_expired_at(Utc::now()) {
            return SessionLookup::found(session);
        }
        match self.refresh_session().await {
            Ok(session) => SessionLookup::found(session),
            Err(err) => {
                tracing::info!(error = %err, "session expired and could not be refreshed");
                SessionLookup::failed(err.user_message())
            }
        }
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.events.subscribe())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let response: TokenResponse = self
            .rest
            .auth_post(PASSWORD_GRANT, &json!({ "email": email, "password": password }))
            .await
            .map_err(as_auth_error)?;
        let session = response.into_session(Utc::now());
        tracing::info!(user_id = %session.user_id(), role = %session.role(), "signed in");
        self.install(session, false).await
    }

    async fn refresh_session(&self) -> Result<AuthSession> {
        let refresh_token = self
            .refresh_token()
            .await?
            .ok_or_else(|| GymError::auth("No refresh token available. Sign in again."))?;
        let response: TokenResponse = self
            .rest
            .auth_post(REFRESH_GRANT, &json!({ "refresh_token": refresh_token }))
            .await
            .map_err(as_auth_error)?;
        let session = response.into_session(Utc::now());
        tracing::debug!(user_id = %session.user_id(), "session refreshed");
        self.install(session, true).await
    }

    async fn sign_out(&self) -> Result<()> {
        let previous = self.session.write().await.take();
        if let Some(session) = previous
            && let Err(err) = self
                .rest
                .auth_post_empty(LOGOUT, &json!({}), Some(&session.access_token))
                .await
        {
            // local sign-out proceeds regardless
            tracing::warn!(error = %err, "remote sign-out failed");
        }

        self.rest.set_access_token(None);
        let removed = self.store.remove(keys::SESSION).await;
        let _ = self.events.send(SessionEvent::SignedOut);
        tracing::info!("signed out");
        removed
    }

    async fn request_password_reset(&self, email: &str) -> Result<()> {
        self.rest
            .auth_post_empty(RECOVER, &json!({ "email": email }), None)
            .await
            .map_err(as_auth_error)
    }
}
