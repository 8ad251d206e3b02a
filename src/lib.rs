// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # fornex-webhook - cert-manager DNS-01 solver for Fornex
//!
//! A cert-manager webhook solver that answers ACME DNS-01 challenges by managing TXT
//! records through the Fornex DNS API.
//!
//! ## Overview
//!
//! For every challenge the solver:
//!
//! - parses the issuer's solver configuration,
//! - resolves the Fornex API key from a Kubernetes `Secret`,
//! - lists the zone's records and creates or deletes the challenge TXT record.
//!
//! Both Present and CleanUp are idempotent and safe to repeat.
//!
//! ## Modules
//!
//! - [`fornex`] - Fornex DNS API client and record wire schemas
//! - [`credentials`] - API key resolution from secrets
//! - [`config`] - Per-issuer solver configuration
//! - [`reconcilers`] - Present and CleanUp reconciliation logic
//! - [`solver`] - The [`solver::Solver`] contract and the Fornex implementation
//! - [`webhook`] - cert-manager webhook HTTP server
//! - [`context`] - Per-call cancellation and deadlines
//!
//! ## Example
//!
//! ```rust,no_run
//! use fornex_webhook::challenge::ChallengeRequest;
//! use fornex_webhook::context::CallContext;
//! use fornex_webhook::credentials::StaticSecretStore;
//! use fornex_webhook::solver::{FornexSolver, Solver};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = StaticSecretStore::new().with_secret(
//!     "cert-manager",
//!     "fornex-credentials",
//!     [("api-key", "s3cr3t")],
//! );
//! let solver = FornexSolver::new(fornex_webhook::fornex::default_base_url()?)
//!     .with_secret_store(Arc::new(store));
//!
//! let request = ChallengeRequest {
//!     key: "abc123".to_string(),
//!     resource_namespace: "cert-manager".to_string(),
//!     resolved_fqdn: "_acme-challenge.example.com.".to_string(),
//!     resolved_zone: "example.com.".to_string(),
//!     config: Some(serde_json::json!({
//!         "apiKeySecretRef": {"name": "fornex-credentials", "key": "api-key"}
//!     })),
//!     ..ChallengeRequest::default()
//! };
//!
//! solver.present(&request, &CallContext::background()).await?;
//! # Ok(())
//! # }
//! ```

pub mod challenge;
pub mod config;
pub mod constants;
pub mod context;
pub mod credentials;
pub mod dns_errors;
pub mod fornex;
pub mod http_errors;
pub mod metrics;
pub mod reconcilers;
pub mod solver;
pub mod status_reasons;
pub mod webhook;
