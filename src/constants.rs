// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Fornex webhook solver.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Solver Constants
// ============================================================================

/// Name the solver is registered under in the `Issuer` webhook configuration
pub const SOLVER_NAME: &str = "fornex";

/// API version of the cert-manager webhook challenge payloads
pub const WEBHOOK_API_VERSION: &str = "v1alpha1";

/// Group/version of the cert-manager `ChallengePayload` objects
pub const CHALLENGE_PAYLOAD_API_VERSION: &str = "webhook.acme.cert-manager.io/v1alpha1";

/// Kind of the cert-manager challenge payload objects
pub const KIND_CHALLENGE_PAYLOAD: &str = "ChallengePayload";

/// Challenge action that ensures the TXT record exists
pub const ACTION_PRESENT: &str = "Present";

/// Challenge action that removes the TXT record
pub const ACTION_CLEANUP: &str = "CleanUp";

// ============================================================================
// DNS Constants
// ============================================================================

/// Record type used for DNS-01 challenge records
pub const RECORD_TYPE_TXT: &str = "TXT";

/// TTL for created challenge records (2 minutes)
pub const CHALLENGE_RECORD_TTL_SECS: i64 = 120;

// ============================================================================
// Fornex API Constants
// ============================================================================

/// Default Fornex API base URI
pub const DEFAULT_FORNEX_API_URL: &str = "https://fornex.com/";

/// Per-request timeout enforced by the shared HTTP transport
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Authorization scheme prefix for the Fornex API key
pub const API_KEY_AUTH_SCHEME: &str = "Api-Key";

/// Content type for JSON request and response bodies
pub const CONTENT_TYPE_JSON: &str = "application/json";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

/// Default bind address for the webhook HTTP server
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Upper bound for one Present or CleanUp call received over the webhook
pub const CHALLENGE_CALL_TIMEOUT_SECS: u64 = 30;

/// Health check paths served next to the webhook API
pub const HEALTHZ_PATH: &str = "/healthz";

/// Readiness check path
pub const READYZ_PATH: &str = "/readyz";

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";
