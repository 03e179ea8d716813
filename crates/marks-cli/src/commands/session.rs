//! Session command handlers

use anyhow::{bail, Context as _, Result};

use marks_core::{LoginResponse, User};

use crate::context::Context;
use crate::output::Output;

/// Store a session credential, optionally with the signed-in user
pub fn login(
    context: &Context,
    token: String,
    user_json: Option<String>,
    output: &Output,
) -> Result<()> {
    let token = token.trim().to_string();
    if token.is_empty() {
        bail!("Token must not be empty");
    }

    match user_json {
        Some(json) => {
            let user: User = serde_json::from_str(&json).context("Invalid user JSON")?;
            context
                .session()
                .establish(&LoginResponse { token, user })
                .context("Failed to save session")?;
        }
        None => {
            context
                .session()
                .set_token(&token)
                .context("Failed to save session")?;
        }
    }

    output.success("Logged in");
    Ok(())
}

/// Forget the session credential
pub fn logout(context: &Context, output: &Output) -> Result<()> {
    context
        .session()
        .clear()
        .context("Failed to clear session")?;

    output.success("Logged out");
    Ok(())
}

/// Show whether a session is present
pub fn show(context: &Context, output: &Output) -> Result<()> {
    let session = context.session();
    let user = session.user();
    output.print_session(session.is_authenticated(), user.as_ref());
    Ok(())
}
