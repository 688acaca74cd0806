//! Error types for the harness.
//!
//! # Design
//! Every failure a service call can produce is one `ApiError` variant, so
//! service code and tests propagate them with `?`. `Validation` carries the
//! offending body and every issue the schema found; `Assertion` lets
//! assertion checks compose with the same `?` chain. Nothing here is retried.

use std::fmt;

use serde_json::Value;

use crate::schema::Issue;

/// Errors returned by request execution and response deserialization.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network failure while dispatching (DNS, connect, timeout, reset).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("response with status {status} is not valid JSON: {source}")]
    Parse {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The caller asked for something the harness cannot do as specified.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The response body did not match the declared schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An expectation check failed.
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
}

impl ApiError {
    /// Short kind label used in assertion logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "TransportError",
            ApiError::Parse { .. } => "ParseError",
            ApiError::Configuration(_) => "ConfigurationError",
            ApiError::Validation(_) => "ValidationError",
            ApiError::Assertion(_) => "AssertionFailure",
        }
    }
}

/// A schema rejected a response body.
#[derive(Debug, Clone, thiserror::Error)]
#[error("body does not match schema `{schema}`: {}", IssueList(.issues))]
pub struct ValidationError {
    pub schema: String,
    pub body: Value,
    pub issues: Vec<Issue>,
}

struct IssueList<'a>(&'a [Issue]);

impl fmt::Display for IssueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// A failed expectation check.
///
/// `check` names the assertion, `native` is what the comparison itself
/// reported, `message` is the caller's context and `expectation` states what
/// should have held.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{check} failed: {native} ({message})")]
pub struct AssertionFailure {
    pub check: &'static str,
    pub native: String,
    pub message: String,
    pub expectation: String,
}
