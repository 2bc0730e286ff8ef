//! File locator trait — the core abstraction over storage backends
//!
//! All backends (local filesystem, object store, remote agent)
//! implement `FileLocator` to provide a uniform API for metadata
//! queries, directory listing, and byte-range reads.

use crate::address::RemoteAddress;
use crate::error::{LocatorError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

pub mod http;
pub mod local;
pub mod remote_agent;

/// Largest byte range servable in one call
///
/// The reference protocol carries the range size in a 32-bit signed
/// field; larger ranges must be fetched in multiple calls.
pub(crate) const MAX_RANGE_BYTES: u64 = i32::MAX as u64;

/// Predicate over an entry's leaf name, applied while listing
pub type NameFilter = dyn Fn(&str) -> bool + Send + Sync;

/// Core trait for storage backends
///
/// Byte offsets are zero-indexed and inclusive on both ends: a range
/// request covers `[start, end]` with `0 <= start <= end < length`.
#[async_trait]
pub trait FileLocator: Send + Sync + std::fmt::Debug {
    /// Leaf name of the file or directory (empty for a root)
    fn name(&self) -> String;

    /// Full address of the resource, in the backend's native notation
    fn absolute_path(&self) -> String;

    /// Whether the addressed path exists
    async fn exists(&self) -> Result<bool>;

    /// Whether the addressed path exists and is a directory
    async fn is_directory(&self) -> Result<bool>;

    /// Size of the resource in bytes (unspecified for directories)
    async fn length(&self) -> Result<u64>;

    /// List the entries of the directory this locator addresses
    ///
    /// Entries whose leaf name the filter rejects are skipped; with no
    /// filter every entry is returned. Order is whatever the backend
    /// reports. An empty listing is not a failure.
    async fn list_files(&self, filter: Option<&NameFilter>) -> Result<Vec<Box<dyn FileLocator>>>;

    /// Fetch the inclusive byte range `[start, end]` in memory
    async fn read_range(&self, start: u64, end: u64) -> Result<Bytes>;

    /// Fetch the inclusive byte range `[start, end]` into a file under
    /// `working_dir`, returning the written path
    async fn read_range_to_file(
        &self,
        start: u64,
        end: u64,
        working_dir: &Path,
    ) -> Result<PathBuf> {
        let data = self.read_range(start, end).await?;
        let out_path = working_dir.join(format!("range-{}-{}", start, end));
        tokio::fs::write(&out_path, &data).await?;
        Ok(out_path)
    }
}

/// Select a backend from a location's scheme
///
/// `ws`/`wss` addresses the remote-agent backend (and authenticates
/// eagerly), `http`/`https` the object store, anything else the local
/// filesystem.
pub async fn from_location(location: &str) -> Result<Box<dyn FileLocator>> {
    if location.starts_with("ws://") || location.starts_with("wss://") {
        let address = RemoteAddress::parse(location)?;
        let locator = remote_agent::RemoteAgentLocator::connect(address).await?;
        Ok(Box::new(locator))
    } else if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(http::HttpLocator::new(location)))
    } else {
        Ok(Box::new(local::LocalLocator::new(location)))
    }
}

/// Locate `file_name` inside the directory another locator addresses
///
/// Remote-agent directories carry the addressed path in the `path`
/// query parameter, not in the URL path, so the child is derived
/// through the parsed address rather than by string concatenation.
pub async fn from_location_in_dir(
    directory: &dyn FileLocator,
    file_name: &str,
) -> Result<Box<dyn FileLocator>> {
    let dir_location = directory.absolute_path();
    if dir_location.starts_with("ws://") || dir_location.starts_with("wss://") {
        let parent = RemoteAddress::parse(&dir_location)?;
        let child_path = format!(
            "{}/{}",
            parent.resource_path().trim_end_matches('/'),
            file_name
        );
        let child = parent.with_path(&child_path);
        let locator = remote_agent::RemoteAgentLocator::connect(child).await?;
        return Ok(Box::new(locator));
    }

    let mut dir_path = dir_location;
    if !dir_path.ends_with('/') {
        dir_path.push('/');
    }
    from_location(&format!("{}{}", dir_path, file_name)).await
}

/// Validate an inclusive range request against a resource size,
/// returning the range length
pub(crate) fn validate_range(resource_size: u64, start: u64, end: u64) -> Result<u64> {
    if start > end {
        return Err(LocatorError::Range {
            start,
            end,
            reason: "start exceeds end".to_string(),
        });
    }
    if end >= resource_size {
        return Err(LocatorError::Range {
            start,
            end,
            reason: format!("end past resource of {} bytes", resource_size),
        });
    }
    let length = end - start + 1;
    if length > MAX_RANGE_BYTES {
        return Err(LocatorError::Range {
            start,
            end,
            reason: format!("range of {} bytes exceeds the {} byte cap", length, MAX_RANGE_BYTES),
        });
    }
    Ok(length)
}
