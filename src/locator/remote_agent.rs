//! Remote-agent backend
//!
//! Locates files on a host reachable only through the authenticated
//! pub/sub socket protocol. Every public operation opens its own
//! channel session, performs exactly one request/reply round trip, and
//! tears the session down — no pooling, no reuse. Metadata for the
//! addressed path is fetched once and cached for the locator's
//! lifetime.

use super::{validate_range, FileLocator, NameFilter};
use crate::address::RemoteAddress;
use crate::auth::Credentials;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::session::ChannelSession;
use crate::wire::{
    self, DirectoryEntry, Envelope, EVENT_FILE_INFO, EVENT_GET_FILE_CONTENT, EVENT_LS,
    EVENT_LS_RESPONSE,
};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::OnceCell;

/// Locator over a file or directory on a remote agent's host
#[derive(Debug)]
pub struct RemoteAgentLocator {
    address: RemoteAddress,
    credentials: Credentials,
    connect_url: String,
    config: SessionConfig,

    /// Cached `file_info` reply; populated at most once, shared by
    /// `exists`/`is_directory`/`length`
    info: OnceCell<DirectoryEntry>,
}

impl RemoteAgentLocator {
    /// Authenticate and build a locator with the default configuration
    pub async fn connect(address: RemoteAddress) -> Result<Self> {
        Self::connect_with_config(address, SessionConfig::default()).await
    }

    /// Authenticate and build a locator
    ///
    /// Performs the one-shot login exchange and generates the
    /// per-instance window id; both are held for the locator's lifetime
    /// and never refreshed.
    pub async fn connect_with_config(
        address: RemoteAddress,
        config: SessionConfig,
    ) -> Result<Self> {
        let credentials = Credentials::acquire(&address, &config.login_path).await?;
        let connect_url = address.connect_url(&credentials.token, &credentials.window_id);

        tracing::info!(
            authority = %address.authority(),
            agent = %address.agent(),
            path = %address.resource_path(),
            "Remote-agent locator ready"
        );

        Ok(Self {
            address,
            credentials,
            connect_url,
            config,
            info: OnceCell::new(),
        })
    }

    /// The parsed address this locator serves
    pub fn address(&self) -> &RemoteAddress {
        &self.address
    }

    /// The credentials held for this locator's lifetime
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// One full session lifecycle around one request/reply exchange
    ///
    /// Teardown runs on every path — success, protocol error, or
    /// timeout — so no connection or channel registration leaks.
    async fn round_trip(&self, event: &str, payload: serde_json::Value) -> Result<Envelope> {
        let mut session = ChannelSession::open(&self.connect_url, &self.config).await?;

        let result = match session.push(event, payload).await {
            Ok(()) => {
                session
                    .await_reply(EVENT_LS_RESPONSE, self.config.reply_timeout())
                    .await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = session.close().await {
            tracing::warn!(event = %event, error = %e, "Session teardown reported a failure");
        }

        tracing::debug!(
            agent = %self.address.agent(),
            event = %event,
            ok = result.is_ok(),
            "Round trip finished"
        );
        result
    }

    /// The cached `file_info` record, fetching it on first use
    ///
    /// Concurrent first accesses race on the cell, not the cache: the
    /// record is populated exactly once.
    async fn file_info(&self) -> Result<&DirectoryEntry> {
        self.info
            .get_or_try_init(|| async {
                let payload =
                    wire::path_request(self.address.agent(), self.address.resource_path());
                let reply = self.round_trip(EVENT_FILE_INFO, payload).await?;
                wire::reply_first_entry(&reply.payload)
            })
            .await
    }

    /// List the addressed directory, building a child locator per entry
    ///
    /// Each child derives its address from this locator's (only the
    /// `path` parameter changes) and authenticates freshly. Entries the
    /// filter rejects are skipped before any child is built.
    pub async fn list(&self, filter: Option<&NameFilter>) -> Result<Vec<RemoteAgentLocator>> {
        let payload = wire::path_request(self.address.agent(), self.address.resource_path());
        let reply = self.round_trip(EVENT_LS, payload).await?;
        let entries = wire::reply_entries(&reply.payload)?;

        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            let child_address = self.address.with_path(&entry.abs_path);
            if !filter.map_or(true, |accept| accept(child_address.resource_name())) {
                continue;
            }
            let child =
                RemoteAgentLocator::connect_with_config(child_address, self.config.clone())
                    .await?;
            children.push(child);
        }

        Ok(children)
    }

    /// Fetch the inclusive byte range `[start, end]`
    ///
    /// The bounds are validated against the cached `file_info` size
    /// before any content request goes out. The reply carries the bytes
    /// base64-encoded in its `data` field.
    pub async fn fetch_range(&self, start: u64, end: u64) -> Result<Bytes> {
        let size = self.file_info().await?.size;
        let length = validate_range(size, start, end)?;

        let payload = wire::content_request(
            self.address.agent(),
            self.address.resource_path(),
            start,
            length,
        );
        let reply = self.round_trip(EVENT_GET_FILE_CONTENT, payload).await?;
        let data = wire::reply_content(&reply.payload)?;

        if data.len() as u64 != length {
            tracing::debug!(
                requested = length,
                received = data.len(),
                "Agent returned a different range length than requested"
            );
        }

        Ok(Bytes::from(data))
    }
}

#[async_trait]
impl FileLocator for RemoteAgentLocator {
    fn name(&self) -> String {
        self.address.resource_name().to_string()
    }

    fn absolute_path(&self) -> String {
        self.address.to_string()
    }

    async fn exists(&self) -> Result<bool> {
        Ok(self.file_info().await?.exists)
    }

    async fn is_directory(&self) -> Result<bool> {
        Ok(self.file_info().await?.is_dir)
    }

    async fn length(&self) -> Result<u64> {
        Ok(self.file_info().await?.size)
    }

    async fn list_files(&self, filter: Option<&NameFilter>) -> Result<Vec<Box<dyn FileLocator>>> {
        let children = self.list(filter).await?;
        Ok(children
            .into_iter()
            .map(|child| Box::new(child) as Box<dyn FileLocator>)
            .collect())
    }

    async fn read_range(&self, start: u64, end: u64) -> Result<Bytes> {
        self.fetch_range(start, end).await
    }
}
