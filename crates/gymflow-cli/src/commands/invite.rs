use anyhow::{Result, bail};

use crate::app::App;

pub async fn invite(app: &App, email: &str, full_name: &str) -> Result<()> {
    let session = app.require_session()?;
    let response = app
        .invitations
        .invite_student(&session, email, full_name, |_| {
            println!("Invitation sent to {email}");
        })
        .await?;
    if !response.success {
        bail!(
            "{}",
            response
                .message
                .unwrap_or_else(|| "Invitation was rejected".to_string())
        );
    }
    Ok(())
}
