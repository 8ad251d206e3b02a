// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP error code mapping to challenge status reasons.
//!
//! This module maps HTTP status codes from the Fornex API to the standardized reasons
//! in [`crate::status_reasons`], so failures reported back to cert-manager carry a
//! stable programmatic reason next to the full error message.
//!
//! # Usage
//!
//! ```rust
//! use fornex_webhook::http_errors::map_http_error_to_reason;
//!
//! let (reason, message) = map_http_error_to_reason(404);
//! assert_eq!(reason, "RecordNotFound");
//!
//! let (reason, message) = map_http_error_to_reason(500);
//! assert_eq!(reason, "FornexInternalError");
//! ```

use crate::status_reasons::{
    REASON_FORNEX_AUTH_FAILED, REASON_FORNEX_BAD_REQUEST, REASON_FORNEX_INTERNAL_ERROR,
    REASON_FORNEX_RATE_LIMITED, REASON_FORNEX_UNREACHABLE, REASON_GATEWAY_ERROR,
    REASON_RECORD_NOT_FOUND,
};

/// Map HTTP status code to status reason and message.
///
/// # Arguments
///
/// * `status_code` - HTTP status code (e.g., 400, 404, 500)
///
/// # Returns
///
/// A tuple of `(reason, message)`:
/// - `reason` - Constant from `status_reasons` module
/// - `message` - Human-readable explanation of the error
///
/// # HTTP Code Mapping
///
/// | HTTP Code | Reason | Meaning |
/// |-----------|--------|---------|
/// | 400 | `FornexBadRequest` | Invalid request format |
/// | 401 | `FornexAuthFailed` | API key missing or wrong |
/// | 403 | `FornexAuthFailed` | API key lacks access |
/// | 404 | `RecordNotFound` | Domain or record not found |
/// | 429 | `FornexRateLimited` | Too many requests |
/// | 500 | `FornexInternalError` | Internal server error |
/// | 502 | `GatewayError` | Bad gateway |
/// | 503 | `GatewayError` | Service unavailable |
/// | 504 | `GatewayError` | Gateway timeout |
/// | Other | `FornexUnreachable` | Unexpected status |
#[must_use]
pub fn map_http_error_to_reason(status_code: u16) -> (&'static str, String) {
    match status_code {
        400 => (
            REASON_FORNEX_BAD_REQUEST,
            "Invalid request to Fornex API (400)".into(),
        ),
        401 => (
            REASON_FORNEX_AUTH_FAILED,
            "Fornex authentication required (401)".into(),
        ),
        403 => (
            REASON_FORNEX_AUTH_FAILED,
            "Fornex authorization failed (403)".into(),
        ),
        404 => (
            REASON_RECORD_NOT_FOUND,
            "Domain or record not found at Fornex (404)".into(),
        ),
        429 => (
            REASON_FORNEX_RATE_LIMITED,
            "Fornex API rate limit exceeded (429)".into(),
        ),
        500 => (
            REASON_FORNEX_INTERNAL_ERROR,
            "Fornex API internal error (500)".into(),
        ),
        502 => (
            REASON_GATEWAY_ERROR,
            "Bad gateway reaching Fornex (502)".into(),
        ),
        503 => (
            REASON_GATEWAY_ERROR,
            "Fornex service unavailable (503)".into(),
        ),
        504 => (
            REASON_GATEWAY_ERROR,
            "Gateway timeout reaching Fornex (504)".into(),
        ),
        _ => (
            REASON_FORNEX_UNREACHABLE,
            format!("Unexpected HTTP status from Fornex ({status_code})"),
        ),
    }
}

/// Map a connection-level failure to a status reason and message.
///
/// Use this when the request never produced an HTTP status code (DNS, TLS,
/// connection refused, transport timeout).
#[must_use]
pub fn map_connection_error() -> (&'static str, String) {
    (
        REASON_FORNEX_UNREACHABLE,
        "Cannot connect to Fornex API".into(),
    )
}
