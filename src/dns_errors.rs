// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the Fornex webhook solver.
//!
//! This module provides specialized error types for:
//! - Fornex HTTP API operations (list, create and delete of DNS records)
//! - Solver configuration parsing
//! - Credential resolution from the secret store
//! - Stage-labelled solver failures reported back to cert-manager
//!
//! The solver never retries internally. [`ApiError::is_transient`] lets callers that
//! wrap the solver in their own retry policy tell transient failures from permanent ones.

use crate::http_errors::{map_connection_error, map_http_error_to_reason};
use crate::status_reasons::{
    REASON_CANCELLED, REASON_CONFIG_INVALID, REASON_CREDENTIALS_UNAVAILABLE,
    REASON_INVALID_RESPONSE, REASON_SOLVER_NOT_INITIALIZED,
};
use thiserror::Error;

/// Errors that can occur during Fornex API operations.
///
/// Every variant names the domain it was operating on. Variants produced from an
/// HTTP response carry the status code; transport failures carry `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Listing records failed (non-200 status, transport failure or undecodable body)
    #[error("failed to retrieve records for domain '{domain}': {reason}")]
    Retrieval {
        /// The domain whose entry set was listed
        domain: String,
        /// HTTP status returned by Fornex, if a response was received
        status: Option<u16>,
        /// Specific reason for the failure
        reason: String,
    },

    /// Creating a record failed (status >= 400, transport failure or undecodable body)
    #[error("failed to create record in domain '{domain}': {reason}")]
    Create {
        /// The domain the record was created in
        domain: String,
        /// HTTP status returned by Fornex, if a response was received
        status: Option<u16>,
        /// Response body, captured only for JSON error responses
        body: Option<String>,
        /// Specific reason for the failure
        reason: String,
    },

    /// Deleting a record failed (non-200 status or transport failure)
    #[error("failed to delete record {id} in domain '{domain}': {reason}")]
    Deletion {
        /// The domain the record belongs to
        domain: String,
        /// Provider-assigned identifier of the record
        id: i64,
        /// HTTP status returned by Fornex, if a response was received
        status: Option<u16>,
        /// Specific reason for the failure
        reason: String,
    },

    /// The caller cancelled the in-flight request
    #[error("{operation} request for domain '{domain}' was cancelled")]
    Cancelled {
        /// The API operation that was aborted (`list`, `create`, `delete`)
        operation: &'static str,
        /// The domain being operated on
        domain: String,
    },

    /// The caller's deadline elapsed before the request completed
    #[error("{operation} request for domain '{domain}' exceeded its deadline")]
    DeadlineExceeded {
        /// The API operation that was aborted (`list`, `create`, `delete`)
        operation: &'static str,
        /// The domain being operated on
        domain: String,
    },

    /// The shared HTTP transport could not be constructed
    #[error("HTTP transport unavailable: {0}")]
    Transport(String),
}

impl ApiError {
    /// HTTP status code attached to this error, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Retrieval { status, .. }
            | Self::Create { status, .. }
            | Self::Deletion { status, .. } => *status,
            Self::Cancelled { .. } | Self::DeadlineExceeded { .. } | Self::Transport(_) => None,
        }
    }

    /// Returns true if repeating the same call later could reasonably succeed.
    ///
    /// Transient: rate limiting, 5xx, transport failures and deadlines.
    /// Permanent: other 4xx, undecodable 2xx bodies and explicit cancellation.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Cancelled { .. } => false,
            Self::DeadlineExceeded { .. } | Self::Transport(_) => true,
            _ => match self.status() {
                None => true,
                Some(code) => code == 429 || code >= 500,
            },
        }
    }

    /// Status reason reported to cert-manager for this error.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::Cancelled { .. } | Self::DeadlineExceeded { .. } => REASON_CANCELLED,
            _ => match self.status() {
                Some(code) if (200..300).contains(&code) => REASON_INVALID_RESPONSE,
                Some(code) => map_http_error_to_reason(code).0,
                None => map_connection_error().0,
            },
        }
    }
}

/// Errors raised while parsing the solver's per-issuer `config` blob.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The blob is not valid JSON or does not match the expected structure
    #[error("config error: {0}")]
    Malformed(String),

    /// A required field is absent or empty
    #[error("config error: missing required field '{0}'")]
    MissingField(&'static str),

    /// `baseUrl` is not an absolute URL
    #[error("config error: invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Errors raised while resolving the API key from the secret store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The secret does not exist or the store failed
    #[error("get error for secret '{namespace}/{name}': {reason}")]
    SecretLookup {
        /// Namespace the secret was looked up in
        namespace: String,
        /// Secret name
        name: String,
        /// Underlying store error
        reason: String,
    },

    /// The secret exists but does not contain the requested key
    #[error("secret '{namespace}/{name}' does not contain key '{key}'")]
    SecretKeyMissing {
        /// Namespace of the secret
        namespace: String,
        /// Secret name
        name: String,
        /// Key that was requested
        key: String,
    },

    /// The key's bytes are not valid UTF-8
    #[error("secret '{namespace}/{name}' key '{key}' is not valid UTF-8")]
    InvalidEncoding {
        /// Namespace of the secret
        namespace: String,
        /// Secret name
        name: String,
        /// Key that was requested
        key: String,
    },
}

/// Errors raised before any Fornex API call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitializationError {
    /// Configuration could not be parsed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// API key could not be resolved
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// `initialize` was never called
    #[error("solver has not been initialized")]
    NotInitialized,

    /// The Kubernetes client could not be built from the supplied config
    #[error("kube client creation error: {0}")]
    KubeClient(String),

    /// The Fornex API client could not be built
    #[error("API client creation error: {0}")]
    ApiClient(#[source] ApiError),
}

/// Stage-labelled failure of a Present or CleanUp call.
///
/// The stage prefix mirrors where the workflow stopped: `initialization`,
/// `retrieve`, `create` or `delete`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Config parsing, credential resolution or client setup failed
    #[error("initialization error: {0}")]
    Initialization(#[from] InitializationError),

    /// Listing the domain's records failed
    #[error("retrieve records error: {0}")]
    Retrieve(#[source] ApiError),

    /// Creating the challenge record failed
    #[error("create record error: {0}")]
    Create(#[source] ApiError),

    /// Deleting the challenge record failed
    #[error("delete record error: {0}")]
    Delete(#[source] ApiError),
}

impl SolverError {
    /// Stage label of this error, used for logs and metrics.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Initialization(_) => "initialization",
            Self::Retrieve(_) => "retrieve",
            Self::Create(_) => "create",
            Self::Delete(_) => "delete",
        }
    }

    /// The underlying API error, if the failure happened after initialization.
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Initialization(_) => None,
            Self::Retrieve(e) | Self::Create(e) | Self::Delete(e) => Some(e),
        }
    }

    /// Status reason reported to cert-manager for this error.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::Initialization(InitializationError::Config(_)) => REASON_CONFIG_INVALID,
            Self::Initialization(
                InitializationError::Credentials(_) | InitializationError::KubeClient(_),
            ) => REASON_CREDENTIALS_UNAVAILABLE,
            Self::Initialization(InitializationError::NotInitialized) => {
                REASON_SOLVER_NOT_INITIALIZED
            }
            Self::Initialization(InitializationError::ApiClient(e)) => e.status_reason(),
            Self::Retrieve(e) | Self::Create(e) | Self::Delete(e) => e.status_reason(),
        }
    }
}
