//! Student invitation through the backend's `invite-student` function.

use std::sync::Arc;

use async_trait::async_trait;
use gymflow_core::error::{GymError, Result};
use gymflow_core::invitation::{InvitationGateway, InviteRequest, InviteResponse};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::rest::{FunctionReply, RestClient};

pub struct FunctionInvitationGateway {
    rest: Arc<RestClient>,
    function: String,
}

impl FunctionInvitationGateway {
    pub fn new(rest: Arc<RestClient>, function: impl Into<String>) -> Self {
        Self {
            rest,
            function: function.into(),
        }
    }
}

#[derive(Serialize)]
struct InvitePayload<'a> {
    email: &'a str,
    full_name: &'a str,
    instructor_id: &'a str,
    role: String,
}

#[derive(Debug, Default, Deserialize)]
struct InviteReplyBody {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Interprets a function reply.
///
/// Client errors carry a human-readable reason and are reported as a failed
/// invitation; server errors are remote failures the caller may retry.
fn interpret(reply: FunctionReply) -> Result<InviteResponse> {
    let body = serde_json::from_str::<InviteReplyBody>(&reply.body).unwrap_or_default();
    let reason = body.error.or(body.message);

    if reply.status.is_success() {
        return Ok(match body.success {
            Some(false) => {
                InviteResponse::failed(reason.unwrap_or_else(|| "Invitation was rejected".into()))
            }
            _ => InviteResponse {
                success: true,
                message: reason,
            },
        });
    }

    let message = reason.unwrap_or_else(|| format!("Invitation failed with status {}", reply.status));
    match reply.status {
        StatusCode::UNAUTHORIZED => Err(GymError::auth(message)),
        status if status.is_client_error() => Ok(InviteResponse::failed(message)),
        _ => Err(GymError::remote(message, None)),
    }
}

#[async_trait]
impl InvitationGateway for FunctionInvitationGateway {
    async fn invite(&self, access_token: &str, request: &InviteRequest) -> Result<InviteResponse> {
        let payload = InvitePayload {
            email: &request.email,
            full_name: &request.full_name,
            instructor_id: &request.instructor_id,
            role: request.role.to_string(),
        };
        let reply = self
            .rest
            .invoke_function(&self.function, access_token, &payload)
            .await?;
        let status = reply.status;
        let response = interpret(reply)?;
        tracing::info!(%status, success = response.success, "invitation function answered");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: StatusCode, body: &str) -> FunctionReply {
        FunctionReply {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_success() {
        let response = interpret(reply(StatusCode::OK, r#"{"success":true}"#)).unwrap();
        assert_eq!(response, InviteResponse::ok());
    }

    #[test]
    fn test_already_registered_is_a_failed_invitation() {
        let response = interpret(reply(
            StatusCode::BAD_REQUEST,
            r#"{"error":"A user with this email address has already been registered"}"#,
        ))
        .unwrap();
        assert!(!response.success);
        assert_eq!(
            response.message.as_deref(),
            Some("A user with this email address has already been registered")
        );
    }

    #[test]
    fn test_success_flag_false_in_ok_reply() {
        let response = interpret(reply(
            StatusCode::OK,
            r#"{"success":false,"message":"Instructor not found"}"#,
        ))
        .unwrap();
        assert_eq!(response, InviteResponse::failed("Instructor not found"));
    }

    #[test]
    fn test_server_and_auth_failures_are_errors() {
        assert!(matches!(
            interpret(reply(StatusCode::INTERNAL_SERVER_ERROR, "boom")),
            Err(GymError::Remote { .. })
        ));
        assert!(matches!(
            interpret(reply(StatusCode::UNAUTHORIZED, r#"{"error":"Invalid JWT"}"#)),
            Err(GymError::Auth(m)) if m == "Invalid JWT"
        ));
    }
}
