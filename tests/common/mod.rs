// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

#![allow(dead_code)]

use fornex_webhook::challenge::ChallengeRequest;
use fornex_webhook::credentials::StaticSecretStore;
use fornex_webhook::fornex::default_base_url;
use fornex_webhook::solver::FornexSolver;
use serde_json::json;
use std::sync::Arc;
use wiremock::MockServer;

pub const NAMESPACE: &str = "cert-manager";
pub const SECRET_NAME: &str = "fornex-credentials";
pub const SECRET_KEY: &str = "api-key";
pub const API_KEY: &str = "test-api-key";
pub const ENTRY_SET: &str = "/api/dns/domain/example.com/entry_set/";

/// Solver with the test API key available in [`NAMESPACE`].
pub fn solver() -> FornexSolver {
    let store = StaticSecretStore::new().with_secret(
        NAMESPACE,
        SECRET_NAME,
        [(SECRET_KEY, API_KEY)],
    );
    FornexSolver::new(default_base_url().expect("default URL is valid"))
        .with_secret_store(Arc::new(store))
}

/// Issuer config pointing the solver at `server`.
pub fn config_for(server: &MockServer) -> serde_json::Value {
    json!({
        "apiKeySecretRef": {"name": SECRET_NAME, "key": SECRET_KEY},
        "baseUrl": server.uri(),
    })
}

/// Challenge for `_acme-challenge.example.com` with value `key`.
pub fn challenge(action: &str, key: &str, config: serde_json::Value) -> ChallengeRequest {
    ChallengeRequest {
        uid: format!("{action}-{key}"),
        action: action.to_string(),
        challenge_type: "dns-01".to_string(),
        dns_name: "example.com".to_string(),
        key: key.to_string(),
        resource_namespace: NAMESPACE.to_string(),
        resolved_fqdn: "_acme-challenge.example.com.".to_string(),
        resolved_zone: "example.com.".to_string(),
        allow_ambient_credentials: false,
        config: Some(config),
    }
}
