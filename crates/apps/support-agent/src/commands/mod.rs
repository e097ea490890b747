//! Command handlers
//!
//! Handlers take an already-connected [`Session`] so they can be driven
//! by [`mail::gmail::InMemoryMailbox`] in tests.

pub mod auth;
pub mod read;
pub mod suppressions;
pub mod write;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use mail::{ActionHandler, GmailAuth, GmailClient, GmailCredentials, MailService, Settings};

/// A mail service plus the action handler built on it
pub struct Session {
    pub gmail: Arc<dyn MailService>,
    pub actions: ActionHandler,
}

impl Session {
    pub fn new(gmail: Arc<dyn MailService>) -> Self {
        let actions = ActionHandler::new(gmail.clone());
        Self { gmail, actions }
    }
}

/// Build the Gmail authenticator from environment settings
pub fn gmail_auth(settings: &Settings) -> Result<GmailAuth> {
    let credentials =
        GmailCredentials::load(settings).context("Unable to load Gmail credentials")?;
    Ok(GmailAuth::new(credentials, settings.token_path()))
}

/// Authenticate against Gmail and open a session
pub fn connect() -> Result<Session> {
    let settings = Settings::from_env()?;
    debug!("Token cache at {}", settings.token_path().display());

    let client = GmailClient::new(gmail_auth(&settings)?);
    client
        .authenticate()
        .context("Unable to authenticate with Gmail")?;

    Ok(Session::new(Arc::new(client)))
}
