//! Executor configuration.
//!
//! The harness reads no environment variables or files itself; the host
//! suite builds a `ClientConfig` (directly or by deserializing it from its
//! own config source) and hands it to each service.

use std::time::Duration;

use serde::Deserialize;

/// When the connection context is released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseMode {
    /// Keep one connection for the whole suite; the host closes it at teardown.
    #[default]
    AtTeardown,
    /// Release the connection after every request.
    EveryCall,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub close_mode: CloseMode,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Sends `Connection: keep-alive` on every request.
    pub keep_alive: bool,
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            close_mode: CloseMode::default(),
            timeout_secs: 30,
            user_agent: concat!("api-harness/", env!("CARGO_PKG_VERSION")).to_string(),
            keep_alive: false,
            default_headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Headers applied to every request, before per-call headers.
    pub fn base_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.default_headers.clone();
        if self.keep_alive {
            headers.push(("Connection".to_string(), "keep-alive".to_string()));
        }
        headers
    }
}
