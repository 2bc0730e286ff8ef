//! Object-store backend — a thin pass-through over HTTP
//!
//! Serves objects addressed by plain `http(s)` URLs: HEAD for
//! existence and size, ranged GET for byte ranges. Follows the object
//! store convention that a key ending in `/` denotes a folder. The
//! store exposes no listing protocol, so `list_files` is unsupported.

use super::{validate_range, FileLocator, NameFilter};
use crate::error::{LocatorError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::OnceCell;

/// Locator over an HTTP(S) object URL
#[derive(Debug)]
pub struct HttpLocator {
    url: String,
    client: reqwest::Client,

    /// Object size, fetched once per instance
    length: OnceCell<u64>,
}

impl HttpLocator {
    /// Create a locator for an object URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            length: OnceCell::new(),
        }
    }

    /// The URL path, without any query string
    fn url_path(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }

    async fn head(&self) -> Result<reqwest::Response> {
        self.client
            .head(&self.url)
            .send()
            .await
            .map_err(|e| LocatorError::Transport(format!("HEAD {}: {}", self.url, e)))
    }
}

#[async_trait]
impl FileLocator for HttpLocator {
    fn name(&self) -> String {
        self.url_path()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
            .to_string()
    }

    fn absolute_path(&self) -> String {
        self.url.clone()
    }

    async fn exists(&self) -> Result<bool> {
        Ok(self.head().await?.status().is_success())
    }

    async fn is_directory(&self) -> Result<bool> {
        Ok(self.url_path().ends_with('/'))
    }

    async fn length(&self) -> Result<u64> {
        let length = self
            .length
            .get_or_try_init(|| async {
                let response = self.head().await?;
                response.content_length().ok_or_else(|| {
                    LocatorError::Protocol(format!("{}: no content length reported", self.url))
                })
            })
            .await?;
        Ok(*length)
    }

    async fn list_files(&self, _filter: Option<&NameFilter>) -> Result<Vec<Box<dyn FileLocator>>> {
        Err(LocatorError::Protocol(
            "object-store resources do not support listing".to_string(),
        ))
    }

    async fn read_range(&self, start: u64, end: u64) -> Result<Bytes> {
        let size = self.length().await?;
        let length = validate_range(size, start, end)?;

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::RANGE, format!("bytes={}-{}", start, end))
            .send()
            .await
            .map_err(|e| LocatorError::Transport(format!("GET {}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocatorError::Transport(format!(
                "GET {}: status {}",
                self.url, status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LocatorError::Transport(format!("GET {}: {}", self.url, e)))?;

        if status == reqwest::StatusCode::PARTIAL_CONTENT {
            if body.len() as u64 != length {
                return Err(LocatorError::Protocol(format!(
                    "{}: partial reply of {} bytes for a {} byte range",
                    self.url,
                    body.len(),
                    length
                )));
            }
            return Ok(body);
        }

        // A store that ignores the Range header answers 200 with the
        // whole object; carve the requested slice out of it.
        if (body.len() as u64) < start + length {
            return Err(LocatorError::Protocol(format!(
                "{}: full reply of {} bytes is short of range [{}, {}]",
                self.url,
                body.len(),
                start,
                end
            )));
        }
        tracing::debug!(url = %self.url, "Store ignored the range header, trimming full reply");
        Ok(body.slice(start as usize..(start + length) as usize))
    }
}
