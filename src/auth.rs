//! Session authentication
//!
//! Exchanges the username/password pair from a [`RemoteAddress`] for a
//! bearer token via a one-shot HTTP POST to the login endpoint derived
//! from the socket authority. No retry, no refresh; a locator
//! authenticates once at construction and holds the credentials for
//! its lifetime.

use crate::address::RemoteAddress;
use crate::error::{LocatorError, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the per-instance window identifier
const WINDOW_ID_LEN: usize = 8;

/// Per-locator credential state
///
/// `token` comes from the login exchange; `window_id` is generated
/// locally and disambiguates concurrent client sessions server-side.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Bearer token returned by the login endpoint
    pub token: String,

    /// Random 8-character alphanumeric session window identifier
    pub window_id: String,
}

impl Credentials {
    /// Perform the login exchange and generate a fresh window id
    pub async fn acquire(address: &RemoteAddress, login_path: &str) -> Result<Self> {
        let token = authenticate(address, login_path).await?;
        Ok(Self {
            token,
            window_id: random_window_id(),
        })
    }
}

/// Exchange username/password for a bearer token
///
/// Sends `{"session": {"email": <username>, "password": <password>}}`
/// and extracts the `access_token` string from the JSON reply. A single
/// attempt only; any failure surfaces as `Authentication`.
pub async fn authenticate(address: &RemoteAddress, login_path: &str) -> Result<String> {
    let url = address.login_url(login_path);
    let body = serde_json::json!({
        "session": {
            "email": address.username(),
            "password": address.password(),
        }
    });

    let response = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| LocatorError::Authentication(format!("{}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(LocatorError::Authentication(format!(
            "{}: login returned {}",
            url,
            response.status()
        )));
    }

    let reply: serde_json::Value = response
        .json()
        .await
        .map_err(|e| LocatorError::Authentication(format!("{}: invalid JSON reply: {}", url, e)))?;

    let token = reply["access_token"].as_str().ok_or_else(|| {
        LocatorError::Authentication(format!("{}: reply missing 'access_token'", url))
    })?;

    tracing::debug!(url = %url, username = %address.username(), "Login exchange succeeded");

    Ok(token.to_string())
}

/// Generate an 8-character alphanumeric window identifier
fn random_window_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(WINDOW_ID_LEN)
        .map(char::from)
        .collect()
}
