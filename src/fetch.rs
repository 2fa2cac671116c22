//! Shared HTTP plumbing for the content collaborators.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching dashboard content.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsed but lacked a required field
    #[error("missing data: {0}")]
    MissingData(&'static str),

    /// Local credential or config file problem
    #[error("credentials: {0}")]
    Credentials(String),

    /// Request URL could not be built
    #[error("invalid URL: {0}")]
    Url(String),
}

/// Request timeout for every collaborator call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client shared by all collaborators.
pub fn http_client() -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
