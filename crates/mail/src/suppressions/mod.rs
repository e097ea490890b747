//! Email suppression management via the Emailit API
//!
//! Independent of the Gmail side: lists suppressed addresses and lifts a
//! suppression by email.

mod client;

pub use client::{SuppressionApiError, SuppressionClient};

use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};

/// A suppressed recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub email: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub keep_until: Option<String>,
}

/// One page of suppressions as returned by `GET /suppressions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressionList {
    #[serde(default)]
    pub data: Vec<Suppression>,
    #[serde(default)]
    pub total_records: usize,
}

impl SuppressionList {
    /// Parse a list response, accepting either the wrapped object or a bare array
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        match serde_json::from_str::<Self>(body) {
            Ok(list) => Ok(list),
            Err(wrapped_err) => match serde_json::from_str::<Vec<Suppression>>(body) {
                Ok(data) => Ok(Self {
                    total_records: data.len(),
                    data,
                }),
                Err(_) => Err(wrapped_err),
            },
        }
    }

    /// First record for an exact email match
    ///
    /// The API does not promise an order, so with duplicates any one of
    /// them may come back.
    pub fn find_by_email(&self, email: &str) -> Option<&Suppression> {
        self.data.iter().find(|s| s.email == email)
    }
}

/// Body of a list response
///
/// A body that is neither the wrapped object nor a bare array is kept
/// verbatim so it can still be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListResponse {
    Parsed(SuppressionList),
    Unrecognized(String),
}

impl ListResponse {
    pub fn from_body(body: String) -> Self {
        match SuppressionList::parse(&body) {
            Ok(list) => Self::Parsed(list),
            Err(e) => {
                debug!("Unrecognized suppression list body: {}", e);
                Self::Unrecognized(body)
            }
        }
    }

    /// The parsed list, or an error for an unrecognized body
    pub fn into_list(self) -> anyhow::Result<SuppressionList> {
        match self {
            Self::Parsed(list) => Ok(list),
            Self::Unrecognized(body) => {
                SuppressionList::parse(&body).context("failed to parse response")
            }
        }
    }
}

/// Outcome of a remove request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed(Suppression),
    NotSuppressed,
}
