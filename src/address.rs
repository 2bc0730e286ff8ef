//! Remote-agent addressing
//!
//! A `RemoteAddress` is the parsed form of a remote-agent URI:
//! `scheme://authority/path?agent=..&path=..&username=..&password=..`.
//! Query parameters live in a sorted map so that re-serialization is
//! byte-for-byte stable across uses, and child addresses derived for
//! listed entries reproduce the parent's parameters exactly.

use crate::error::{LocatorError, Result};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Query parameters every remote-agent address must carry.
const REQUIRED_PARAMS: [&str; 4] = ["agent", "path", "username", "password"];

/// Immutable, structured identity of a remote-agent resource
///
/// `agent` names the counterparty process, `path` the resource on its
/// host, and `username`/`password` feed the one-shot login exchange.
/// Derive the address of a listed entry with [`RemoteAddress::with_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddress {
    scheme: String,
    authority: String,
    path: String,
    query: BTreeMap<String, String>,
}

impl RemoteAddress {
    /// Parse a remote-agent URI string
    ///
    /// Fails with `AddressFormat` when the input is not a URI or any of
    /// `agent`, `path`, `username`, `password` is missing from the query.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input)
            .map_err(|e| LocatorError::AddressFormat(format!("{}: {}", input, e)))?;

        let host = url
            .host_str()
            .ok_or_else(|| LocatorError::AddressFormat(format!("{}: missing host", input)))?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        // Splits on '&' then the first '='; a parameter with no '='
        // maps to the empty string.
        let query: BTreeMap<String, String> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        for key in REQUIRED_PARAMS {
            if !query.contains_key(key) {
                return Err(LocatorError::AddressFormat(format!(
                    "{}: missing required query parameter '{}'",
                    input, key
                )));
            }
        }

        Ok(Self {
            scheme: url.scheme().to_string(),
            authority,
            path: url.path().to_string(),
            query,
        })
    }

    /// The URI scheme (e.g. `ws`, `wss`)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// `host[:port]`
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// The URI path component (the socket endpoint, not the resource)
    pub fn endpoint_path(&self) -> &str {
        &self.path
    }

    /// The `agent` identifier
    pub fn agent(&self) -> &str {
        &self.query["agent"]
    }

    /// The resource path on the agent's host
    pub fn resource_path(&self) -> &str {
        &self.query["path"]
    }

    /// The login username
    pub fn username(&self) -> &str {
        &self.query["username"]
    }

    /// The login password
    pub fn password(&self) -> &str {
        &self.query["password"]
    }

    /// Leaf name of the resource path (empty for the root)
    pub fn resource_name(&self) -> &str {
        self.resource_path()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
    }

    /// Derive the address of a child entry: same scheme, authority, and
    /// credentials, with only the `path` query parameter replaced
    pub fn with_path(&self, new_path: &str) -> Self {
        let mut derived = self.clone();
        derived
            .query
            .insert("path".to_string(), new_path.to_string());
        derived
    }

    /// The query mapping serialized in sorted key order
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// The HTTP(S) login endpoint derived from the socket authority
    ///
    /// `ws` rewrites to `http`, `wss` to `https`; other schemes pass
    /// through unchanged.
    pub fn login_url(&self, login_path: &str) -> String {
        let scheme = match self.scheme.as_str() {
            "ws" => "http",
            "wss" => "https",
            other => other,
        };
        format!("{}://{}{}", scheme, self.authority, login_path)
    }

    /// The socket connect URL: scheme/authority/path preserved, query
    /// replaced wholesale by the session token and window id
    ///
    /// All original parameters (including `agent` and `path`) are
    /// discarded here; they travel in each request envelope instead.
    pub fn connect_url(&self, token: &str, window_id: &str) -> String {
        format!(
            "{}://{}{}?userToken={}&window_id={}",
            self.scheme, self.authority, self.path, token, window_id
        )
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}{}?{}",
            self.scheme,
            self.authority,
            self.path,
            self.query_string()
        )
    }
}
