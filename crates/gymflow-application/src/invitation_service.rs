//! Inviting new students by email.

use std::sync::Arc;

use gymflow_core::auth::{AuthSession, Role};
use gymflow_core::cache::collections;
use gymflow_core::error::{GymError, Result};
use gymflow_core::invitation::{InvitationGateway, InviteRequest, InviteResponse};
use gymflow_core::validation::{require_non_empty, validate_email};

use crate::context::AppContext;

pub struct InvitationService {
    gateway: Arc<dyn InvitationGateway>,
    context: Arc<AppContext>,
}

impl InvitationService {
    pub fn new(gateway: Arc<dyn InvitationGateway>, context: Arc<AppContext>) -> Self {
        Self { gateway, context }
    }

    /// Sends an invitation and calls `on_success` only if the backend accepted it.
    ///
    /// A rejection (for example an already registered email) comes back as
    /// `Ok` with `success == false` and the backend's message.
    pub async fn invite_student<F>(
        &self,
        session: &AuthSession,
        email: &str,
        full_name: &str,
        on_success: F,
    ) -> Result<InviteResponse>
    where
        F: FnOnce(&InviteResponse),
    {
        let email = validate_email(email)?;
        let full_name = require_non_empty("full name", full_name)?.to_string();
        if !session.role().can_invite_students() {
            return Err(GymError::permission("only instructors can invite students"));
        }

        let request = InviteRequest {
            email,
            full_name,
            instructor_id: session.user_id().to_string(),
            role: Role::Student,
        };
        let response = self
            .context
            .timeouts()
            .run(
                "invitations.invite",
                self.gateway.invite(&session.access_token, &request),
            )
            .await?;

        if response.success {
            tracing::info!(email = %request.email, "student invited");
            self.context
                .students()
                .invalidate_collection(collections::STUDENTS);
            on_success(&response);
        } else {
            tracing::info!(
                email = %request.email,
                reason = response.message.as_deref().unwrap_or("unspecified"),
                "invitation rejected"
            );
        }
        Ok(response)
    }
}
