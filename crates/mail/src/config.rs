//! Configuration loading for mail services
//!
//! Everything comes from the environment. OAuth credentials are looked up in
//! this order:
//! 1. `GMAIL_CREDENTIALS` holding the Google Cloud Console JSON itself
//! 2. The JSON file at `GMAIL_CREDENTIALS_PATH` (default `gmail.json`)
//! 3. `GMAIL_CLIENT_ID` / `GMAIL_CLIENT_SECRET`

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default credentials file, relative to the working directory
const DEFAULT_CREDENTIALS_PATH: &str = "gmail.json";

/// Token cache filename inside the state directory
const TOKEN_FILE: &str = "token.json";

/// OAuth credentials for Gmail API access
#[derive(Debug, Clone)]
pub struct GmailCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Google Cloud Console credential file format (installed app)
#[derive(Deserialize)]
struct GoogleCredentialFile {
    installed: Option<InstalledCredentials>,
    web: Option<InstalledCredentials>,
}

#[derive(Deserialize)]
struct InstalledCredentials {
    client_id: String,
    client_secret: String,
}

impl GmailCredentials {
    /// Load credentials for the given settings
    pub fn load(settings: &Settings) -> Result<Self> {
        if let Some(json) = non_empty_env("GMAIL_CREDENTIALS") {
            return Self::from_json(&json);
        }

        if settings.credentials_path.exists() {
            return Self::from_file(&settings.credentials_path);
        }

        Self::from_env().with_context(|| {
            format!(
                "No credentials found: set GMAIL_CREDENTIALS, place the client JSON at {}, \
                 or set GMAIL_CLIENT_ID and GMAIL_CLIENT_SECRET",
                settings.credentials_path.display()
            )
        })
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let creds: GoogleCredentialFile = config::load_json_file(path)?;
        Self::from_credential_file(creds)
    }

    /// Parse credentials from a GoogleCredentialFile
    fn from_credential_file(creds: GoogleCredentialFile) -> Result<Self> {
        // Support both "installed" (desktop) and "web" credential types
        let installed = creds
            .installed
            .or(creds.web)
            .context("Credentials file missing 'installed' or 'web' section")?;

        Ok(Self {
            client_id: installed.client_id,
            client_secret: installed.client_secret,
        })
    }

    /// Parse credentials from JSON string (Google Cloud Console format)
    pub fn from_json(json: &str) -> Result<Self> {
        let creds: GoogleCredentialFile =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;
        Self::from_credential_file(creds)
    }

    /// Load credentials from environment variables
    pub fn from_env() -> Result<Self> {
        let client_id = non_empty_env("GMAIL_CLIENT_ID")
            .context("GMAIL_CLIENT_ID environment variable not set")?;
        let client_secret = non_empty_env("GMAIL_CLIENT_SECRET")
            .context("GMAIL_CLIENT_SECRET environment variable not set")?;

        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

/// Runtime settings resolved from the environment
#[derive(Debug, Clone)]
pub struct Settings {
    /// Google client JSON (`GMAIL_CREDENTIALS_PATH`)
    pub credentials_path: PathBuf,
    /// Directory holding the token cache (`TOKEN_DIR`)
    pub token_dir: PathBuf,
}

impl Settings {
    /// Resolve settings from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let credentials_path = non_empty_env("GMAIL_CREDENTIALS_PATH")
            .map(|p| config::expand_home(&p))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));
        let token_dir = config::state_dir().context("Could not determine home directory")?;

        Ok(Self {
            credentials_path,
            token_dir,
        })
    }

    /// Path of the cached OAuth token
    pub fn token_path(&self) -> PathBuf {
        self.token_dir.join(TOKEN_FILE)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
