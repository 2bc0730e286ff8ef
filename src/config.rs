//! Session configuration for the remote-agent backend

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for remote-agent channel sessions
///
/// Controls the connect and reply deadlines plus the fixed protocol
/// constants (login path, channel topic). The defaults match the
/// reference agent deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Deadline for establishing the websocket connection, in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Deadline for a correlated reply to arrive, in seconds
    ///
    /// The reference implementation waits forever; every wait here is
    /// bounded and teardown still runs on expiry.
    #[serde(default = "default_reply_timeout")]
    pub reply_timeout_secs: u64,

    /// Path of the HTTP login endpoint, relative to the socket authority
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// The pub/sub topic all requests and replies travel on
    #[serde(default = "default_topic")]
    pub topic: String,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_reply_timeout() -> u64 {
    30
}

fn default_login_path() -> String {
    "/api/sessions".to_string()
}

fn default_topic() -> String {
    "ui_agent:all".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            reply_timeout_secs: default_reply_timeout(),
            login_path: default_login_path(),
            topic: default_topic(),
        }
    }
}

impl SessionConfig {
    /// Set the connect deadline
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Set the reply deadline
    pub fn with_reply_timeout(mut self, secs: u64) -> Self {
        self.reply_timeout_secs = secs;
        self
    }

    /// Connect deadline as a `Duration`
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Reply deadline as a `Duration`
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.reply_timeout_secs)
    }
}
