//! Local filesystem backend — a thin pass-through to `tokio::fs`

use super::{validate_range, FileLocator, NameFilter};
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Locator over a local path
#[derive(Debug, Clone)]
pub struct LocalLocator {
    path: PathBuf,
}

impl LocalLocator {
    /// Create a locator for a local path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FileLocator for LocalLocator {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn absolute_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    async fn exists(&self) -> Result<bool> {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn is_directory(&self) -> Result<bool> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn length(&self) -> Result<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }

    async fn list_files(&self, filter: Option<&NameFilter>) -> Result<Vec<Box<dyn FileLocator>>> {
        let mut entries = tokio::fs::read_dir(&self.path).await?;
        let mut locators: Vec<Box<dyn FileLocator>> = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let child = LocalLocator::new(entry.path());
            if filter.map_or(true, |accept| accept(&child.name())) {
                locators.push(Box::new(child));
            }
        }

        Ok(locators)
    }

    async fn read_range(&self, start: u64, end: u64) -> Result<Bytes> {
        let size = tokio::fs::metadata(&self.path).await?.len();
        let length = validate_range(size, start, end)?;

        let mut file = tokio::fs::File::open(&self.path).await?;
        file.seek(SeekFrom::Start(start)).await?;

        let mut buf = vec![0u8; length as usize];
        file.read_exact(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}
