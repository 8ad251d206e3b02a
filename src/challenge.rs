// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! cert-manager webhook challenge payload types.
//!
//! cert-manager talks to DNS-01 webhook solvers by POSTing a `ChallengePayload`
//! (`webhook.acme.cert-manager.io/v1alpha1`) whose `request` describes the challenge.
//! The solver answers with the same payload, `response` filled in.
//!
//! # Example Request
//!
//! ```json
//! {
//!   "apiVersion": "webhook.acme.cert-manager.io/v1alpha1",
//!   "kind": "ChallengePayload",
//!   "request": {
//!     "uid": "5b7c2f1e-0d5c-4b6f-9b0f-3c2d9a1e7f10",
//!     "action": "Present",
//!     "type": "dns-01",
//!     "dnsName": "example.com",
//!     "key": "abc123",
//!     "resourceNamespace": "cert-manager",
//!     "resolvedFQDN": "_acme-challenge.example.com.",
//!     "resolvedZone": "example.com.",
//!     "config": {"apiKeySecretRef": {"name": "fornex-credentials", "key": "api-key"}}
//!   }
//! }
//! ```

use crate::constants::{ACTION_CLEANUP, ACTION_PRESENT};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use serde::{Deserialize, Serialize};

/// One DNS-01 challenge as handed over by cert-manager.
///
/// Immutable for the duration of a Present or CleanUp call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Unique identifier of this request, echoed in the response
    #[serde(default)]
    pub uid: String,
    /// `Present` or `CleanUp`
    #[serde(default)]
    pub action: String,
    /// Challenge type, always `dns-01` for this solver
    #[serde(rename = "type", default)]
    pub challenge_type: String,
    /// The name being validated (e.g., `example.com` or `*.example.com`)
    #[serde(default)]
    pub dns_name: String,
    /// Expected TXT record value
    #[serde(default)]
    pub key: String,
    /// Namespace secrets referenced by `config` are looked up in
    #[serde(default)]
    pub resource_namespace: String,
    /// Fully-qualified record name with trailing dot (e.g., `_acme-challenge.example.com.`)
    #[serde(rename = "resolvedFQDN", default)]
    pub resolved_fqdn: String,
    /// Zone the record is created in, with trailing dot (e.g., `example.com.`)
    #[serde(default)]
    pub resolved_zone: String,
    /// Whether ambient credentials may be used (ignored by this solver)
    #[serde(default)]
    pub allow_ambient_credentials: bool,
    /// Opaque solver configuration from the issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// The solver's answer to a [`ChallengeRequest`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    /// `uid` of the request being answered
    #[serde(default)]
    pub uid: String,
    /// Whether the action succeeded
    #[serde(default)]
    pub success: bool,
    /// Failure details, absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// Envelope exchanged with cert-manager.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    /// `webhook.acme.cert-manager.io/v1alpha1`
    #[serde(default)]
    pub api_version: String,
    /// `ChallengePayload`
    #[serde(default)]
    pub kind: String,
    /// The challenge to act on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ChallengeRequest>,
    /// The result of acting on `request`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChallengeResponse>,
}

/// Action requested by a [`ChallengeRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeAction {
    /// Ensure the TXT record exists
    Present,
    /// Remove the TXT record
    CleanUp,
}

impl ChallengeAction {
    /// Parse the `action` field of a request.
    #[must_use]
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            ACTION_PRESENT => Some(Self::Present),
            ACTION_CLEANUP => Some(Self::CleanUp),
            _ => None,
        }
    }

    /// Wire name of this action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => ACTION_PRESENT,
            Self::CleanUp => ACTION_CLEANUP,
        }
    }
}

impl std::fmt::Display for ChallengeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
