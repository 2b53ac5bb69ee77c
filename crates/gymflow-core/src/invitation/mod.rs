//! Student invitations.
//!
//! Inviting is delegated to a separately deployed function that checks the
//! caller is an instructor, rejects emails that already have an account, and
//! sends the invitation email carrying role and instructor metadata.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRequest {
    pub email: String,
    pub full_name: String,
    pub instructor_id: String,
    pub role: Role,
}

/// Outcome reported by the invitation function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InviteResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[async_trait]
pub trait InvitationGateway: Send + Sync {
    /// Submits an invitation on behalf of the session identified by `access_token`.
    ///
    /// A rejected invitation is a successful call returning
    /// `InviteResponse { success: false, .. }`; `Err` is reserved for
    /// transport failures.
    async fn invite(&self, access_token: &str, request: &InviteRequest) -> Result<InviteResponse>;
}
