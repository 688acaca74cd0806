//! Lazily created, reusable HTTP connection context.
//!
//! # Design
//! A `ConnectionManager` owns at most one `reqwest::Client` (its connection
//! pool). It is built on the first request and kept until `close`. Every
//! method takes `&mut self`, so one instance is used by one caller at a
//! time; separate managers share nothing.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::ApiError;

#[derive(Debug)]
pub struct ConnectionManager {
    timeout: Duration,
    user_agent: String,
    client: Option<reqwest::Client>,
}

impl ConnectionManager {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            client: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }

    /// Return the live client, building it first if none exists.
    pub fn ensure_connection(&mut self) -> Result<&reqwest::Client, ApiError> {
        let client = match self.client.take() {
            Some(client) => {
                debug!("Reusing HTTP connection context");
                client
            }
            None => {
                let client = reqwest::Client::builder()
                    .timeout(self.timeout)
                    .user_agent(self.user_agent.as_str())
                    .build()?;
                info!("Opened HTTP connection context");
                client
            }
        };
        Ok(&*self.client.insert(client))
    }

    /// Release the client if one is live. Dropping the last handle shuts the
    /// pool down; there is nothing left to fail, so this never errors.
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            info!("Closed HTTP connection context");
        } else {
            debug!("No HTTP connection context to close");
        }
    }
}

/// Convert ordered string pairs into a `HeaderMap`.
pub(crate) fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Configuration(format!("invalid header name `{name}`: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Configuration(format!("invalid header value `{value}`: {e}")))?;
        map.append(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_is_created_lazily() {
        let manager = ConnectionManager::new(&ClientConfig::default());
        assert!(!manager.is_open());
    }

    #[test]
    fn ensure_connection_is_idempotent() {
        let mut manager = ConnectionManager::new(&ClientConfig::default());
        manager.ensure_connection().unwrap();
        assert!(manager.is_open());
        manager.ensure_connection().unwrap();
        assert!(manager.is_open());
    }

    #[test]
    fn close_releases_and_tolerates_repeats() {
        let mut manager = ConnectionManager::new(&ClientConfig::default());
        manager.close();
        manager.ensure_connection().unwrap();
        manager.close();
        assert!(!manager.is_open());
        manager.close();
        assert!(!manager.is_open());
    }

    #[test]
    fn header_map_rejects_bad_names() {
        let err = header_map(&[("bad header".to_string(), "v".to_string())]).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));

        let map = header_map(&[
            ("X-One".to_string(), "1".to_string()),
            ("X-One".to_string(), "2".to_string()),
        ])
        .unwrap();
        assert_eq!(map.get_all("x-one").iter().count(), 2);
    }
}
