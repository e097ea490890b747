//! Gmail OAuth2 authentication
//!
//! Implements the OAuth2 authorization code flow for Gmail API access.
//! A local HTTP listener receives the redirect; tokens are cached as JSON in
//! the agent's state directory and refreshed when they near expiry.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use url::Url;

use crate::config::GmailCredentials;

/// Source of bearer tokens for the mail service
pub trait TokenProvider {
    /// Return a currently valid access token
    fn access_token(&self) -> Result<String>;
}

/// OAuth2 configuration and token management for Gmail
pub struct GmailAuth {
    credentials: GmailCredentials,
    token_path: PathBuf,
}

/// Token data persisted between invocations
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
}

/// Token response from Google
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

impl GmailAuth {
    /// Gmail API OAuth2 endpoints
    const AUTH_URL: &'static str = "https://accounts.google.com/o/oauth2/v2/auth";
    const TOKEN_URL: &'static str = "https://oauth2.googleapis.com/token";

    /// Read, reply and relabel; no permanent deletion
    const GMAIL_MODIFY_SCOPE: &'static str = "https://www.googleapis.com/auth/gmail.modify";

    /// Port range to try for local OAuth callback server
    const PORT_RANGE_START: u16 = 8080;
    const PORT_RANGE_END: u16 = 8090;

    /// Seconds before expiry at which a cached token is treated as stale
    const EXPIRY_MARGIN_SECS: i64 = 300;

    /// Create a new GmailAuth storing its token at `token_path`
    pub fn new(credentials: GmailCredentials, token_path: PathBuf) -> Self {
        Self {
            credentials,
            token_path,
        }
    }

    /// Where the token cache lives
    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Perform authorization code flow authentication
    fn authorization_code_auth(&self) -> Result<TokenResponse> {
        let (listener, port) = self.start_local_server()?;
        let redirect_uri = format!("http://localhost:{}", port);

        let auth_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            Self::AUTH_URL,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(&redirect_uri),
            urlencoding::encode(Self::GMAIL_MODIFY_SCOPE),
        );

        eprintln!("\n=== Gmail Authentication Required ===");
        eprintln!("Opening browser for authentication...");
        eprintln!("If the browser doesn't open, visit: {}", auth_url);

        if let Err(e) = open::that(&auth_url) {
            warn!("Failed to open browser: {}. Please open the URL manually.", e);
        }

        eprintln!("Waiting for authorization...");
        let code = self.wait_for_callback(listener)?;

        info!("Exchanging authorization code for tokens");
        let mut response = ureq::post(Self::TOKEN_URL)
            .send_form([
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", code.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri.as_str()),
            ])
            .context("Failed to exchange authorization code")?;

        let token: TokenResponse = response
            .body_mut()
            .read_json()
            .context("Failed to parse token response")?;

        eprintln!("Authentication successful!\n");
        Ok(token)
    }

    /// Start a local TCP server on an available port
    fn start_local_server(&self) -> Result<(TcpListener, u16)> {
        for port in Self::PORT_RANGE_START..=Self::PORT_RANGE_END {
            if let Ok(listener) = TcpListener::bind(format!("127.0.0.1:{}", port)) {
                return Ok((listener, port));
            }
        }
        anyhow::bail!(
            "Could not bind to any port in range {}-{}",
            Self::PORT_RANGE_START,
            Self::PORT_RANGE_END
        )
    }

    /// Wait for OAuth callback and extract authorization code
    fn wait_for_callback(&self, listener: TcpListener) -> Result<String> {
        let (mut stream, _) = listener.accept().context("Failed to accept connection")?;

        let mut reader = BufReader::new(&stream);
        let mut request_line = String::new();
        reader
            .read_line(&mut request_line)
            .context("Failed to read request")?;

        // GET /?code=AUTH_CODE&scope=... HTTP/1.1
        let callback = parse_callback(&request_line);

        let (status, body) = if callback.code.is_some() {
            ("200 OK", "Authentication successful! You can close this window.")
        } else {
            ("400 Bad Request", "Authentication failed. Please try again.")
        };

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html><body><h1>{}</h1></body></html>",
            status, body
        );
        stream.write_all(response.as_bytes()).ok();

        if let Some(err) = callback.error {
            anyhow::bail!("OAuth error: {}", err);
        }

        callback.code.context("No authorization code received")
    }

    /// Refresh an access token using a refresh token
    fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let response = ureq::post(Self::TOKEN_URL)
            .send_form([
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .context("Failed to refresh access token")?;

        let mut token: TokenResponse = response
            .into_body()
            .read_json()
            .context("Failed to parse refresh token response")?;

        // Google omits the refresh token on refresh
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }

        Ok(token)
    }

    /// Load stored token from disk
    fn load_token(&self) -> Result<StoredToken> {
        config::load_json_file(&self.token_path)
    }

    /// Save token response to disk
    fn save_token_response(&self, token: &TokenResponse) -> Result<()> {
        let stored = StoredToken {
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            expires_at: token
                .expires_in
                .map(|d| chrono::Utc::now().timestamp() + d as i64),
        };

        config::save_json_file(&self.token_path, &stored)
            .context("Unable to save token")?;
        debug!("Saved token to {}", self.token_path.display());
        Ok(())
    }

    /// Clear stored tokens (logout)
    ///
    /// Returns whether a token file was removed.
    pub fn logout(&self) -> Result<bool> {
        Self::remove_token(&self.token_path)
    }

    /// Delete a token cache without needing client credentials
    pub fn remove_token(token_path: &Path) -> Result<bool> {
        if !token_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(token_path)
            .with_context(|| format!("Failed to remove {}", token_path.display()))?;
        info!("Removed stored token {}", token_path.display());
        Ok(true)
    }
}

impl TokenProvider for GmailAuth {
    /// Get a valid access token, refreshing or re-authenticating as needed
    fn access_token(&self) -> Result<String> {
        if let Ok(token) = self.load_token() {
            if let Some(expires_at) = token.expires_at {
                let now = chrono::Utc::now().timestamp();
                if expires_at > now + Self::EXPIRY_MARGIN_SECS {
                    return Ok(token.access_token);
                }
            }

            if let Some(refresh_token) = token.refresh_token {
                match self.refresh_access_token(&refresh_token) {
                    Ok(new_token) => {
                        self.save_token_response(&new_token)?;
                        return Ok(new_token.access_token);
                    }
                    Err(e) => warn!("Token refresh failed, re-authenticating: {:#}", e),
                }
            }
        }

        let token = self
            .authorization_code_auth()
            .context("Unable to get token")?;
        self.save_token_response(&token)?;
        Ok(token.access_token)
    }
}

/// Query parameters of the OAuth redirect
#[derive(Debug, Default, PartialEq)]
struct Callback {
    code: Option<String>,
    error: Option<String>,
}

/// Extract `code` / `error` from the HTTP request line of the redirect
fn parse_callback(request_line: &str) -> Callback {
    let Some(path) = request_line.split_whitespace().nth(1) else {
        return Callback::default();
    };
    let Ok(url) = Url::parse("http://localhost").and_then(|base| base.join(path)) else {
        return Callback::default();
    };

    let mut callback = Callback::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => callback.code = Some(value.into_owned()),
            "error" => callback.error = Some(value.into_owned()),
            _ => {}
        }
    }
    callback
}
