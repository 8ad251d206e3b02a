// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The cert-manager DNS-01 solver for Fornex.
//!
//! [`Solver`] is the contract the webhook server dispatches challenge requests to.
//! [`FornexSolver`] implements it by building a fresh, per-call [`FornexClient`] from
//! the request's own configuration and secret, then running the challenge reconciler.
//!
//! # Call Flow
//!
//! ```text
//! present/cleanup
//!   -> ProviderConfig::from_raw(request.config)
//!   -> resolve_api_key(secret store, apiKeySecretRef, resourceNamespace)
//!   -> FornexClient::new(key, endpoint, apiVersion)
//!   -> reconcilers::present / reconcilers::cleanup
//! ```
//!
//! Nothing is cached between calls: a rotated API key or an edited issuer takes effect
//! on the next challenge.

use crate::challenge::{ChallengeAction, ChallengeRequest};
use crate::config::ProviderConfig;
use crate::constants::SOLVER_NAME;
use crate::context::CallContext;
use crate::credentials::{resolve_api_key, KubeSecretStore, SecretStore};
use crate::dns_errors::{InitializationError, SolverError};
use crate::fornex::{FornexClient, HostFormat};
use crate::metrics::{record_challenge_error, record_challenge_success};
use crate::reconcilers;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use url::Url;

/// A cert-manager webhook DNS-01 solver.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Name issuers reference in `solverName`.
    fn name(&self) -> &str;

    /// Prepare the solver for use with the cluster described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Initialization`] if the cluster client cannot be built.
    async fn initialize(&mut self, config: kube::Config) -> Result<(), SolverError>;

    /// Ensure the challenge TXT record for `request` exists.
    ///
    /// # Errors
    ///
    /// Returns a stage-labelled [`SolverError`] describing where the call stopped.
    async fn present(&self, request: &ChallengeRequest, ctx: &CallContext)
        -> Result<(), SolverError>;

    /// Remove the challenge TXT record for `request` if it exists.
    ///
    /// # Errors
    ///
    /// Returns a stage-labelled [`SolverError`] describing where the call stopped.
    async fn cleanup(&self, request: &ChallengeRequest, ctx: &CallContext)
        -> Result<(), SolverError>;
}

/// DNS-01 solver backed by the Fornex DNS API.
#[derive(Clone)]
pub struct FornexSolver {
    secrets: Option<Arc<dyn SecretStore>>,
    default_base_url: Url,
}

impl fmt::Debug for FornexSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FornexSolver")
            .field("initialized", &self.secrets.is_some())
            .field("default_base_url", &self.default_base_url.as_str())
            .finish()
    }
}

impl FornexSolver {
    /// Create an uninitialized solver talking to `default_base_url` unless an issuer
    /// overrides it with `baseUrl`.
    #[must_use]
    pub fn new(default_base_url: Url) -> Self {
        Self {
            secrets: None,
            default_base_url,
        }
    }

    /// Use `store` for API key lookups instead of the cluster's secrets.
    #[must_use]
    pub fn with_secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secrets = Some(store);
        self
    }

    /// Returns true once a secret store is available.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.secrets.is_some()
    }

    /// Build the API client for `request` from its config and referenced secret.
    async fn client_for(
        &self,
        request: &ChallengeRequest,
    ) -> Result<(FornexClient, HostFormat), SolverError> {
        let store = self
            .secrets
            .as_deref()
            .ok_or(InitializationError::NotInitialized)?;

        let config =
            ProviderConfig::from_raw(request.config.as_ref()).map_err(InitializationError::from)?;

        let api_key = resolve_api_key(
            store,
            &config.api_key_secret_ref,
            &request.resource_namespace,
        )
        .await
        .map_err(InitializationError::from)?;

        let endpoint = config
            .endpoint(&self.default_base_url)
            .map_err(InitializationError::from)?;

        let client = FornexClient::new(api_key, endpoint, config.api_version)
            .map_err(InitializationError::ApiClient)?;

        Ok((client, config.host_format))
    }

    async fn reconcile(
        &self,
        action: ChallengeAction,
        request: &ChallengeRequest,
        ctx: &CallContext,
    ) -> Result<(), SolverError> {
        let start = Instant::now();
        info!(
            action = %action,
            uid = %request.uid,
            fqdn = %request.resolved_fqdn,
            zone = %request.resolved_zone,
            namespace = %request.resource_namespace,
            "Handling {} request",
            action.as_str().to_lowercase()
        );

        let result = async {
            let (client, host_format) = self.client_for(request).await?;
            match action {
                ChallengeAction::Present => {
                    reconcilers::present(&client, ctx, request, host_format).await?;
                }
                ChallengeAction::CleanUp => {
                    reconcilers::cleanup(&client, ctx, request, host_format).await?;
                }
            }
            Ok::<(), SolverError>(())
        }
        .await;

        match &result {
            Ok(()) => record_challenge_success(action.as_str(), start.elapsed()),
            Err(e) => {
                error!(
                    action = %action,
                    uid = %request.uid,
                    stage = e.stage(),
                    error = %e,
                    "Challenge request failed"
                );
                record_challenge_error(action.as_str(), e.stage(), start.elapsed());
            }
        }
        result
    }
}

#[async_trait]
impl Solver for FornexSolver {
    fn name(&self) -> &str {
        SOLVER_NAME
    }

    async fn initialize(&mut self, config: kube::Config) -> Result<(), SolverError> {
        let client = kube::Client::try_from(config)
            .map_err(|e| InitializationError::KubeClient(e.to_string()))?;
        self.secrets = Some(Arc::new(KubeSecretStore::new(client)));
        info!(solver = SOLVER_NAME, "Solver initialized");
        Ok(())
    }

    async fn present(
        &self,
        request: &ChallengeRequest,
        ctx: &CallContext,
    ) -> Result<(), SolverError> {
        self.reconcile(ChallengeAction::Present, request, ctx).await
    }

    async fn cleanup(
        &self,
        request: &ChallengeRequest,
        ctx: &CallContext,
    ) -> Result<(), SolverError> {
        self.reconcile(ChallengeAction::CleanUp, request, ctx).await
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod solver_tests;
