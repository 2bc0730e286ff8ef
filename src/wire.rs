//! Wire types for the remote-agent pub/sub protocol
//!
//! Messages are Phoenix-style JSON object frames: `{topic, event,
//! payload, ref}`. Requests wrap their fields in a `body` object;
//! replies arrive on the single `ls_response` event whatever the
//! request kind was (see DESIGN.md).

use crate::error::{LocatorError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Channel join control event
pub const EVENT_JOIN: &str = "phx_join";
/// Channel leave control event
pub const EVENT_LEAVE: &str = "phx_leave";
/// Metadata request for a single path
pub const EVENT_FILE_INFO: &str = "file_info";
/// Directory listing request
pub const EVENT_LS: &str = "ls";
/// Byte-range fetch request
pub const EVENT_GET_FILE_CONTENT: &str = "get_file_content";
/// The one reply event every request kind is answered on
pub const EVENT_LS_RESPONSE: &str = "ls_response";

/// One wire message: topic, event name, and a JSON payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Pub/sub topic the message travels on
    pub topic: String,

    /// Event name (request kind, reply kind, or channel control)
    pub event: String,

    /// Structured payload
    pub payload: serde_json::Value,

    /// Client-assigned message reference, unused by this protocol
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Envelope {
    /// Build an outbound envelope
    pub fn new(topic: impl Into<String>, event: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.into(),
            event: event.into(),
            payload,
            reference: None,
        }
    }
}

/// One directory-listing result record
///
/// Also the shape of a `file_info` reply's single entry. Fields the
/// agent omits default to empty/false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Absolute path of the entry on the agent's host
    #[serde(default)]
    pub abs_path: String,

    /// Size in bytes (unspecified for directories)
    #[serde(default)]
    pub size: u64,

    /// Whether the addressed path exists
    #[serde(default)]
    pub exists: bool,

    /// Whether the entry is a directory
    #[serde(default)]
    pub is_dir: bool,
}

/// Request payload for `file_info` and `ls`
pub fn path_request(agent: &str, path: &str) -> serde_json::Value {
    serde_json::json!({
        "body": {
            "agent": agent,
            "path": path,
        }
    })
}

/// Request payload for `get_file_content`
///
/// `size` is the inclusive range length, `end - start + 1`.
pub fn content_request(agent: &str, path: &str, start: u64, size: u64) -> serde_json::Value {
    serde_json::json!({
        "body": {
            "agent": agent,
            "path": path,
            "start": start,
            "size": size,
        }
    })
}

/// Extract the `entries` records from a reply payload
pub fn reply_entries(payload: &serde_json::Value) -> Result<Vec<DirectoryEntry>> {
    let entries = payload
        .get("entries")
        .ok_or_else(|| LocatorError::Protocol("reply missing 'entries'".to_string()))?;
    serde_json::from_value(entries.clone())
        .map_err(|e| LocatorError::Protocol(format!("malformed 'entries': {}", e)))
}

/// Extract the single entry a `file_info` reply carries
pub fn reply_first_entry(payload: &serde_json::Value) -> Result<DirectoryEntry> {
    reply_entries(payload)?
        .into_iter()
        .next()
        .ok_or_else(|| LocatorError::Protocol("reply 'entries' is empty".to_string()))
}

/// Decode the base64 `data` field of a `get_file_content` reply
pub fn reply_content(payload: &serde_json::Value) -> Result<Vec<u8>> {
    let data = payload
        .get("data")
        .and_then(|d| d.as_str())
        .ok_or_else(|| LocatorError::Protocol("reply missing 'data'".to_string()))?;
    BASE64
        .decode(data)
        .map_err(|e| LocatorError::Protocol(format!("invalid base64 'data': {}", e)))
}
