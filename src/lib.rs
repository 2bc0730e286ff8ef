//! # telefs
//!
//! Uniform "locate and randomly read a file" abstraction over unrelated
//! storage backends: the local filesystem, an HTTP object store, and a
//! remote host reachable only through an authenticated pub/sub socket
//! protocol (the remote-agent backend).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use telefs::locator::{self, FileLocator};
//!
//! # async fn example() -> telefs::Result<()> {
//! let file = locator::from_location(
//!     "ws://agent-host:4000/socket?agent=A1&path=/data/clip.mxf&username=u&password=p",
//! )
//! .await?;
//!
//! if file.exists().await? {
//!     let header = file.read_range(0, 63).await?;
//!     println!("{} bytes of {}", header.len(), file.name());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Backends
//!
//! - **local** — thin pass-through to `tokio::fs`
//! - **http** — thin pass-through to an HTTP object store (HEAD + ranged GET)
//! - **remote-agent** — the core: turns an asynchronous, single-shared-channel
//!   wire protocol into a per-call request/reply API
//!
//! ## Architecture
//!
//! - **FileLocator** trait — capability set all backends implement
//! - **RemoteAddress** — structured, immutable remote-agent addressing
//! - **ChannelSession** — one connection + one topic per logical operation
//! - **ReplySlot** — single-slot request/reply correlation
//! - **RemoteAgentLocator** — composes the above; caches metadata, derives
//!   child locators with fresh credentials

pub mod address;
pub mod auth;
pub mod config;
pub mod correlate;
pub mod error;
pub mod locator;
pub mod session;
pub mod wire;

// Re-export core types
pub use address::RemoteAddress;
pub use auth::Credentials;
pub use config::SessionConfig;
pub use error::{LocatorError, Result};
pub use locator::{FileLocator, NameFilter};
pub use wire::{DirectoryEntry, Envelope};

// Re-export backends for convenience
pub use locator::http::HttpLocator;
pub use locator::local::LocalLocator;
pub use locator::remote_agent::RemoteAgentLocator;
