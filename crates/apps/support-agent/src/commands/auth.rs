//! login and logout

use std::io::Write;

use anyhow::{Context, Result};
use mail::{GmailClient, Settings};

use super::gmail_auth;

/// Run the browser flow now (or refresh) so later commands start authorized
pub fn login(out: &mut impl Write) -> Result<()> {
    let settings = Settings::from_env()?;
    let token_path = settings.token_path();

    GmailClient::new(gmail_auth(&settings)?)
        .authenticate()
        .context("Unable to authenticate with Gmail")?;

    writeln!(out, "Authenticated. Token saved to {}", token_path.display())?;
    Ok(())
}

/// Forget the cached token
pub fn logout(out: &mut impl Write) -> Result<()> {
    let settings = Settings::from_env()?;
    let token_path = settings.token_path();

    if mail::gmail::GmailAuth::remove_token(&token_path)? {
        writeln!(out, "Removed {}", token_path.display())?;
    } else {
        writeln!(out, "No stored token at {}", token_path.display())?;
    }
    Ok(())
}
