use anyhow::Result;
use gymflow_core::auth::GateDecision;

use crate::app::App;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let session = app.auth.sign_in(email, password).await?;
    println!(
        "Signed in as {} ({})",
        session.user.email.as_deref().unwrap_or(session.user_id()),
        session.role()
    );
    match app.auth.decide("/login") {
        GateDecision::Redirect(home) => println!("Home: {home}"),
        GateDecision::ShowInvalidRole { .. } => {
            println!("This account has no recognized role. Run `gymflow logout`.")
        }
        _ => {}
    }
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.auth.sign_out().await?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(app: &App) -> Result<()> {
    let state = app.auth.state();
    match (state.valid_session(), state.error.as_deref()) {
        (Some(session), _) => {
            println!("user:  {}", session.user_id());
            if let Some(email) = &session.user.email {
                println!("email: {email}");
            }
            println!("role:  {}", session.role());
            if let Some(expires_at) = session.expires_at {
                println!("expires: {}", expires_at.to_rfc3339());
            }
        }
        (None, Some(error)) => println!("Not signed in ({error})"),
        (None, None) => println!("Not signed in"),
    }
    Ok(())
}

/// Prints what the navigation gate would do at `location`.
pub fn gate(app: &App, location: &str) -> Result<()> {
    match app.auth.decide(location) {
        GateDecision::ShowLoading => println!("loading"),
        GateDecision::Redirect(target) => println!("redirect {target}"),
        GateDecision::ShowInvalidRole { email } => println!(
            "invalid-role{}",
            email.map(|e| format!(" ({e})")).unwrap_or_default()
        ),
        GateDecision::RenderChildren => println!("render {location}"),
    }
    Ok(())
}

pub async fn reset_password(app: &App, email: &str) -> Result<()> {
    app.auth.request_password_reset(email).await?;
    println!("If an account exists for {email}, a reset link is on its way.");
    Ok(())
}
