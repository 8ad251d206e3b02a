// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Fornex DNS API client.
//!
//! This module maps the three record operations the solver needs onto the Fornex
//! `entry_set` endpoints:
//!
//! | Operation | Method | Path | Success |
//! |-----------|--------|------|---------|
//! | [`FornexClient::list_records`] | `GET` | `/api/dns/domain/{domain}/entry_set/` | 200 |
//! | [`FornexClient::create_record`] | `POST` | `/api/dns/domain/{domain}/entry_set/` | < 400 |
//! | [`FornexClient::delete_record`] | `DELETE` | `/api/dns/domain/{domain}/entry_set/{id}` | 200 |
//!
//! All requests carry `Authorization: Api-Key {key}`. The API has no "ensure record"
//! primitive, so the client does not try to be clever: each call is one request,
//! failures are reported as typed [`ApiError`]s and nothing is retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use fornex_webhook::context::CallContext;
//! use fornex_webhook::fornex::{default_base_url, DnsRecord, FornexClient, RecordSchema};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = FornexClient::new("secret-api-key", default_base_url()?, RecordSchema::V1)?;
//! let ctx = CallContext::background();
//!
//! let records = client.list_records(&ctx, "example.com").await?;
//! let id = client
//!     .create_record(&ctx, "example.com", &DnsRecord::txt("_acme-challenge", "abc123", 120))
//!     .await?;
//! client.delete_record(&ctx, "example.com", id).await?;
//! # Ok(())
//! # }
//! ```

pub mod transport;
pub mod types;

pub use types::{DnsRecord, HostFormat, RecordSchema};

use crate::constants::{
    API_KEY_AUTH_SCHEME, CONTENT_TYPE_JSON, DEFAULT_FORNEX_API_URL, HTTP_REQUEST_TIMEOUT_SECS,
};
use crate::context::{CallContext, Interrupted};
use crate::dns_errors::ApiError;
use crate::http_errors::{map_connection_error, map_http_error_to_reason};
use crate::metrics::record_api_request;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use std::fmt;
use tracing::{error, info};
use url::Url;

/// Parse the default Fornex API base URL.
///
/// # Errors
///
/// Returns an error only if [`DEFAULT_FORNEX_API_URL`] is not a valid URL.
pub fn default_base_url() -> Result<Url, url::ParseError> {
    Url::parse(DEFAULT_FORNEX_API_URL)
}

/// Record operations the challenge reconciler depends on.
///
/// [`FornexClient`] is the production implementation; the seam exists so the
/// reconciliation logic can be exercised against an in-memory record set.
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// List every record of `domain`.
    async fn list_records(
        &self,
        ctx: &CallContext,
        domain: &str,
    ) -> Result<Vec<DnsRecord>, ApiError>;

    /// Create `record` in `domain`, returning the provider-assigned identifier.
    async fn create_record(
        &self,
        ctx: &CallContext,
        domain: &str,
        record: &DnsRecord,
    ) -> Result<i64, ApiError>;

    /// Delete the record `id` of `domain`.
    async fn delete_record(&self, ctx: &CallContext, domain: &str, id: i64)
        -> Result<(), ApiError>;
}

/// Authenticated client for one Fornex API key.
///
/// Holds no state besides the key, base URL and record schema. Cheap to build per call.
#[derive(Clone)]
pub struct FornexClient {
    api_key: String,
    base_url: Url,
    schema: RecordSchema,
    http: reqwest::Client,
}

impl fmt::Debug for FornexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FornexClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl FornexClient {
    /// Create a client on the process-wide HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the shared transport is unavailable.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Url,
        schema: RecordSchema,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            api_key: api_key.into(),
            base_url,
            schema,
            http: transport::shared_client()?,
        })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Record schema used to encode and decode bodies.
    #[must_use]
    pub fn schema(&self) -> RecordSchema {
        self.schema
    }

    /// URL of the `entry_set` collection of `domain`.
    #[must_use]
    pub fn entry_set_url(&self, domain: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/api/dns/domain/{domain}/entry_set/"));
        url
    }

    /// URL of the record `id` of `domain`.
    #[must_use]
    pub fn entry_url(&self, domain: &str, id: i64) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/api/dns/domain/{domain}/entry_set/{id}"));
        url
    }

    fn authorization(&self) -> String {
        format!("{API_KEY_AUTH_SCHEME} {}", self.api_key)
    }

    /// List all records of `domain`.
    ///
    /// An empty array is a successful, empty result.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Retrieval`] on any status other than 200, on transport
    /// failure, or if the body cannot be decoded; [`ApiError::Cancelled`] or
    /// [`ApiError::DeadlineExceeded`] if `ctx` interrupts the request.
    pub async fn list_records(
        &self,
        ctx: &CallContext,
        domain: &str,
    ) -> Result<Vec<DnsRecord>, ApiError> {
        let url = self.entry_set_url(domain);
        let retrieval = |status: Option<u16>, reason: String| ApiError::Retrieval {
            domain: domain.to_string(),
            status,
            reason,
        };

        info!(method = "GET", url = %url, "HTTP API request to Fornex");
        let request = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, self.authorization());

        let exchange = async {
            let response = request.send().await.map_err(|e| {
                record_api_request("GET", None);
                retrieval(None, describe_transport_error(&e))
            })?;

            let status = response.status();
            record_api_request("GET", Some(status.as_u16()));
            info!(method = "GET", url = %url, status = %status, "HTTP API response from Fornex");

            if status != StatusCode::OK {
                return Err(retrieval(
                    Some(status.as_u16()),
                    map_http_error_to_reason(status.as_u16()).1,
                ));
            }

            let body = response.bytes().await.map_err(|e| {
                retrieval(
                    Some(status.as_u16()),
                    format!("failed to read response: {e}"),
                )
            })?;

            self.schema.decode_list(&body).map_err(|e| {
                retrieval(
                    Some(status.as_u16()),
                    format!("failed to decode response: {e}"),
                )
            })
        };

        let result = ctx
            .run(exchange)
            .await
            .map_err(|i| interrupted(i, "list", domain))?;

        if let Err(e) = &result {
            error!(method = "GET", url = %url, error = %e, "Fornex API request failed");
        }
        result
    }

    /// Create `record` in `domain` and return the identifier Fornex assigned to it.
    ///
    /// Any status below 400 counts as success. For error responses the body is kept
    /// for diagnostics when the response content type is JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Create`] on status >= 400, transport failure, or a success
    /// body that cannot be decoded or carries no identifier; [`ApiError::Cancelled`]
    /// or [`ApiError::DeadlineExceeded`] if `ctx` interrupts the request.
    pub async fn create_record(
        &self,
        ctx: &CallContext,
        domain: &str,
        record: &DnsRecord,
    ) -> Result<i64, ApiError> {
        let url = self.entry_set_url(domain);
        let create = |status: Option<u16>, body: Option<String>, reason: String| {
            ApiError::Create {
                domain: domain.to_string(),
                status,
                body,
                reason,
            }
        };

        let payload = self
            .schema
            .encode(record)
            .map_err(|e| create(None, None, format!("failed to marshal record: {e}")))?;

        info!(
            method = "POST",
            url = %url,
            body = %String::from_utf8_lossy(&payload),
            "HTTP API request to Fornex"
        );
        let request = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(ACCEPT, CONTENT_TYPE_JSON)
            .header(AUTHORIZATION, self.authorization())
            .body(payload);

        let exchange = async {
            let response = request.send().await.map_err(|e| {
                record_api_request("POST", None);
                create(None, None, describe_transport_error(&e))
            })?;

            let status = response.status();
            record_api_request("POST", Some(status.as_u16()));
            info!(method = "POST", url = %url, status = %status, "HTTP API response from Fornex");

            if status.as_u16() >= 400 {
                let is_json = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|ct| ct.starts_with(CONTENT_TYPE_JSON));
                let body = if is_json {
                    response.text().await.ok()
                } else {
                    None
                };
                let (_, message) = map_http_error_to_reason(status.as_u16());
                let reason = match &body {
                    Some(body) => format!("{message}, response: {body}"),
                    None => message,
                };
                return Err(create(Some(status.as_u16()), body, reason));
            }

            let body = response.bytes().await.map_err(|e| {
                create(
                    Some(status.as_u16()),
                    None,
                    format!("failed to read response: {e}"),
                )
            })?;

            let created = self.schema.decode_record(&body).map_err(|e| {
                create(
                    Some(status.as_u16()),
                    None,
                    format!("failed to decode response: {e}"),
                )
            })?;

            created.id.ok_or_else(|| {
                create(
                    Some(status.as_u16()),
                    Some(String::from_utf8_lossy(&body).into_owned()),
                    "response record carries no identifier".to_string(),
                )
            })
        };

        let result = ctx
            .run(exchange)
            .await
            .map_err(|i| interrupted(i, "create", domain))?;

        if let Err(e) = &result {
            error!(method = "POST", url = %url, error = %e, "Fornex API request failed");
        }
        result
    }

    /// Delete the record `id` of `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Deletion`] on any status other than 200 (including 404 for
    /// an identifier that no longer exists) or on transport failure;
    /// [`ApiError::Cancelled`] or [`ApiError::DeadlineExceeded`] if `ctx` interrupts
    /// the request.
    pub async fn delete_record(
        &self,
        ctx: &CallContext,
        domain: &str,
        id: i64,
    ) -> Result<(), ApiError> {
        let url = self.entry_url(domain, id);
        let deletion = |status: Option<u16>, reason: String| ApiError::Deletion {
            domain: domain.to_string(),
            id,
            status,
            reason,
        };

        info!(method = "DELETE", url = %url, "HTTP API request to Fornex");
        let request = self
            .http
            .delete(url.clone())
            .header(AUTHORIZATION, self.authorization());

        let exchange = async {
            let response = request.send().await.map_err(|e| {
                record_api_request("DELETE", None);
                deletion(None, describe_transport_error(&e))
            })?;

            let status = response.status();
            record_api_request("DELETE", Some(status.as_u16()));
            info!(method = "DELETE", url = %url, status = %status, "HTTP API response from Fornex");

            if status != StatusCode::OK {
                return Err(deletion(
                    Some(status.as_u16()),
                    map_http_error_to_reason(status.as_u16()).1,
                ));
            }
            Ok(())
        };

        let result = ctx
            .run(exchange)
            .await
            .map_err(|i| interrupted(i, "delete", domain))?;

        if let Err(e) = &result {
            error!(method = "DELETE", url = %url, error = %e, "Fornex API request failed");
        }
        result
    }
}

#[async_trait]
impl RecordApi for FornexClient {
    async fn list_records(
        &self,
        ctx: &CallContext,
        domain: &str,
    ) -> Result<Vec<DnsRecord>, ApiError> {
        FornexClient::list_records(self, ctx, domain).await
    }

    async fn create_record(
        &self,
        ctx: &CallContext,
        domain: &str,
        record: &DnsRecord,
    ) -> Result<i64, ApiError> {
        FornexClient::create_record(self, ctx, domain, record).await
    }

    async fn delete_record(
        &self,
        ctx: &CallContext,
        domain: &str,
        id: i64,
    ) -> Result<(), ApiError> {
        FornexClient::delete_record(self, ctx, domain, id).await
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out after {HTTP_REQUEST_TIMEOUT_SECS}s: {e}")
    } else {
        format!("{}: {e}", map_connection_error().1)
    }
}

fn interrupted(reason: Interrupted, operation: &'static str, domain: &str) -> ApiError {
    match reason {
        Interrupted::Cancelled => ApiError::Cancelled {
            operation,
            domain: domain.to_string(),
        },
        Interrupted::DeadlineExceeded => ApiError::DeadlineExceeded {
            operation,
            domain: domain.to_string(),
        },
    }
}
