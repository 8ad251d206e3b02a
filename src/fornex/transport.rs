// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Process-wide HTTP transport.
//!
//! One `reqwest::Client` is built lazily on first use and shared by every
//! [`FornexClient`](super::FornexClient). `reqwest::Client` is reference counted, so
//! handing out clones reuses the same connection pool. There is no teardown.

use crate::constants::HTTP_REQUEST_TIMEOUT_SECS;
use crate::dns_errors::ApiError;
use std::sync::LazyLock;
use std::time::Duration;

/// User agent sent with every Fornex API request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

static SHARED_CLIENT: LazyLock<Result<reqwest::Client, String>> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| e.to_string())
});

/// Get a handle to the shared HTTP client.
///
/// # Errors
///
/// Returns [`ApiError::Transport`] if the client could not be built (e.g., the TLS
/// backend failed to initialize). The failure is sticky for the life of the process.
pub fn shared_client() -> Result<reqwest::Client, ApiError> {
    SHARED_CLIENT
        .as_ref()
        .cloned()
        .map_err(|e| ApiError::Transport(e.clone()))
}
