// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Standard status reasons reported back to cert-manager.
//!
//! When a challenge fails, the webhook answers with a `metav1.Status` whose `reason`
//! field is one of the constants below. Reasons are programmatic identifiers in
//! CamelCase; the accompanying message carries the human-readable error chain.
//!
//! # Example Response
//!
//! ```yaml
//! response:
//!   uid: 5b7c2f1e-0d5c-4b6f-9b0f-3c2d9a1e7f10
//!   success: false
//!   status:
//!     status: Failure
//!     reason: FornexAuthFailed
//!     message: "retrieve records error: failed to retrieve records for domain 'example.com': Fornex authentication required (401)"
//!     code: 401
//! ```

// ============================================================================
// Solver Reasons
// ============================================================================

/// The solver's `config` blob could not be parsed.
///
/// The `Issuer` webhook configuration is malformed or is missing
/// `apiKeySecretRef`. This is never retried successfully without a config change.
pub const REASON_CONFIG_INVALID: &str = "ConfigInvalid";

/// The API key could not be read from the referenced secret.
///
/// Possible causes:
/// - Secret does not exist in the challenge namespace
/// - Secret exists but lacks the referenced key
/// - RBAC does not allow the webhook to read secrets
pub const REASON_CREDENTIALS_UNAVAILABLE: &str = "CredentialsUnavailable";

/// A challenge arrived before the solver was initialized.
pub const REASON_SOLVER_NOT_INITIALIZED: &str = "SolverNotInitialized";

/// The payload addressed a solver name this webhook does not serve.
pub const REASON_UNKNOWN_SOLVER: &str = "UnknownSolver";

/// The payload carried an action other than `Present` or `CleanUp`.
pub const REASON_UNKNOWN_ACTION: &str = "UnknownAction";

// ============================================================================
// Fornex API Reasons
// ============================================================================

/// Fornex API rejected the request as malformed.
///
/// Maps to HTTP 400 Bad Request.
pub const REASON_FORNEX_BAD_REQUEST: &str = "FornexBadRequest";

/// Fornex API authentication or authorization failed.
///
/// Maps to HTTP 401 Unauthorized or 403 Forbidden.
/// The API key is wrong, revoked, or lacks access to the domain.
pub const REASON_FORNEX_AUTH_FAILED: &str = "FornexAuthFailed";

/// Requested domain or record not found at Fornex.
///
/// Maps to HTTP 404 Not Found.
/// For deletions this usually means the record vanished between the listing
/// and the delete call.
pub const REASON_RECORD_NOT_FOUND: &str = "RecordNotFound";

/// Fornex API is throttling requests.
///
/// Maps to HTTP 429 Too Many Requests.
pub const REASON_FORNEX_RATE_LIMITED: &str = "FornexRateLimited";

/// Fornex API encountered an internal server error.
///
/// Maps to HTTP 500 Internal Server Error.
pub const REASON_FORNEX_INTERNAL_ERROR: &str = "FornexInternalError";

/// Gateway error reaching the Fornex API.
///
/// Maps to HTTP 502 Bad Gateway, 503 Service Unavailable, 504 Gateway Timeout.
pub const REASON_GATEWAY_ERROR: &str = "GatewayError";

/// Fornex API could not be reached, or answered with an unexpected status.
///
/// Possible causes:
/// - DNS resolution or TLS failure
/// - Egress network policy blocking traffic
/// - Request exceeded the transport timeout
pub const REASON_FORNEX_UNREACHABLE: &str = "FornexUnreachable";

/// Fornex API answered successfully but the body could not be decoded.
///
/// Usually means the configured `apiVersion` does not match the live API.
pub const REASON_INVALID_RESPONSE: &str = "InvalidResponse";

/// The caller cancelled the request or its deadline elapsed.
pub const REASON_CANCELLED: &str = "Cancelled";
