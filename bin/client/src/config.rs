//! Client configuration

use crate::constants::DEFAULT_SERVER_URL;
use std::time::Duration;

/// Settings shared by every upload of a transmitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Receiver base URL, e.g. `http://localhost:4711`
    pub server: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}
