//! Local projection of the identity provider's session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::Role;

/// Identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// For students: the instructor who invited them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<String>,
}

/// An authenticated session as last reported by the identity provider.
///
/// The client never mutates a session; refreshes replace it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUser,
}

impl AuthSession {
    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Snapshot of session resolution published to the navigation gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// True until the first resolution against the provider completes.
    pub loading: bool,
    pub session: Option<AuthSession>,
    /// Provider error from the last resolution, kept for display only.
    pub error: Option<String>,
}

impl AuthState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            session: None,
            error: None,
        }
    }

    pub fn resolved(session: Option<AuthSession>, error: Option<String>) -> Self {
        Self {
            loading: false,
            session,
            error,
        }
    }

    pub fn signed_out() -> Self {
        Self::resolved(None, None)
    }

    /// The session, unless the provider reported an error alongside it.
    pub fn valid_session(&self) -> Option<&AuthSession> {
        if self.error.is_some() {
            return None;
        }
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: Option<DateTime<Utc>>) -> AuthSession {
        AuthSession {
            access_token: "token".into(),
            refresh_token: None,
            expires_at,
            user: AuthUser {
                id: "u-1".into(),
                email: Some("ana@example.com".into()),
                role: Role::Instructor,
                instructor_id: None,
            },
        }
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        assert!(!session(None).is_expired_at(now));
        assert!(session(Some(now - Duration::seconds(1))).is_expired_at(now));
        assert!(!session(Some(now + Duration::minutes(5))).is_expired_at(now));
    }

    #[test]
    fn test_error_hides_session() {
        let state = AuthState::resolved(Some(session(None)), Some("refresh failed".into()));
        assert!(state.valid_session().is_none());

        let state = AuthState::resolved(Some(session(None)), None);
        assert_eq!(state.valid_session().map(|s| s.role()), Some(Role::Instructor));
    }
}
