//! Emailit suppression API client

use anyhow::{Context, Result};
use log::{debug, info};

use super::{ListResponse, Removal, Suppression, SuppressionList};

/// The suppression API answered with an unexpected status
#[derive(Debug, thiserror::Error)]
#[error("API error ({status}): {body}")]
pub struct SuppressionApiError {
    pub status: u16,
    pub body: String,
}

/// Blocking client for the Emailit suppression endpoints
pub struct SuppressionClient {
    api_key: String,
    base_url: String,
}

impl SuppressionClient {
    /// Emailit API base URL
    const BASE_URL: &'static str = "https://api.emailit.com/v1";

    /// Environment variable holding the API key
    pub const API_KEY_ENV: &'static str = "EMAILIT_API_KEY";

    /// Create a client with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::BASE_URL.to_string(),
        }
    }

    /// Create a client using `EMAILIT_API_KEY`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(Self::API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .with_context(|| format!("{} not set in environment", Self::API_KEY_ENV))?;
        Ok(Self::new(api_key))
    }

    /// Point the client at another API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn suppressions_url(&self) -> String {
        format!("{}/suppressions", self.base_url)
    }

    /// List all suppressions, keeping an unrecognized body as-is
    pub fn list_response(&self) -> Result<ListResponse> {
        let url = self.suppressions_url();
        debug!("GET {}", url);

        let mut response = ureq::get(&url)
            .config()
            .http_status_as_error(false)
            .build()
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .call()
            .context("failed to make request")?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .context("failed to read response")?;

        if status != 200 {
            return Err(SuppressionApiError { status, body }.into());
        }

        Ok(ListResponse::from_body(body))
    }

    /// List all suppressions
    pub fn list(&self) -> Result<SuppressionList> {
        self.list_response()?.into_list()
    }

    /// Look up the suppression for an email address, if any
    pub fn find_by_email(&self, email: &str) -> Result<Option<Suppression>> {
        Ok(self.list()?.find_by_email(email).cloned())
    }

    /// Lift the suppression for an email address
    pub fn remove(&self, email: &str) -> Result<Removal> {
        let Some(suppression) = self.find_by_email(email)? else {
            return Ok(Removal::NotSuppressed);
        };

        let url = format!("{}/{}", self.suppressions_url(), suppression.id);
        debug!("DELETE {}", url);

        let mut response = ureq::delete(&url)
            .config()
            .http_status_as_error(false)
            .build()
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .call()
            .context("failed to make request")?;

        let status = response.status().as_u16();
        if status != 200 && status != 204 {
            let body = response
                .body_mut()
                .read_to_string()
                .context("failed to read response")?;
            return Err(SuppressionApiError { status, body }.into());
        }

        info!("Removed suppression {} for {}", suppression.id, email);
        Ok(Removal::Removed(suppression))
    }
}
