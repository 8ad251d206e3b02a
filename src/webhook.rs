// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP surface of the cert-manager webhook solver.
//!
//! cert-manager reaches the solver through the Kubernetes API aggregation layer, which
//! forwards requests for the registered API group to this server:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `POST` | `/apis/{group}/v1alpha1/{solver}` | Present or CleanUp one challenge |
//! | `GET` | `/apis/{group}/v1alpha1` | API discovery (`APIResourceList`) |
//! | `GET` | `/healthz`, `/readyz` | Probes |
//! | `GET` | `/metrics` | Prometheus metrics |
//!
//! Solver failures are not HTTP errors: the payload comes back with
//! `response.success = false` and a `Failure` status carrying the message and reason.
//! Only a payload without `request`, or a request for another API group, is rejected
//! at the HTTP level.

use crate::challenge::{ChallengeAction, ChallengePayload, ChallengeRequest, ChallengeResponse};
use crate::constants::{
    CHALLENGE_CALL_TIMEOUT_SECS, CHALLENGE_PAYLOAD_API_VERSION, HEALTHZ_PATH,
    KIND_CHALLENGE_PAYLOAD, METRICS_SERVER_PATH, READYZ_PATH, WEBHOOK_API_VERSION,
};
use crate::context::CallContext;
use crate::dns_errors::ApiError;
use crate::metrics::gather_metrics;
use crate::solver::Solver;
use crate::status_reasons::{REASON_UNKNOWN_ACTION, REASON_UNKNOWN_SOLVER};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIResource, APIResourceList, Status};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Shared state of the webhook server.
#[derive(Clone)]
pub struct WebhookState {
    /// API group the webhook is registered under (e.g., `acme.example.com`)
    pub group_name: String,
    /// Solver challenge requests are dispatched to
    pub solver: Arc<dyn Solver>,
    /// Upper bound for a single Present or CleanUp call
    pub call_timeout: Duration,
}

impl WebhookState {
    /// Create state for `solver` registered under `group_name`.
    #[must_use]
    pub fn new(group_name: impl Into<String>, solver: Arc<dyn Solver>) -> Self {
        Self {
            group_name: group_name.into(),
            solver,
            call_timeout: Duration::from_secs(CHALLENGE_CALL_TIMEOUT_SECS),
        }
    }
}

/// Requests the webhook refuses to process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The payload carried no `request`
    #[error("challenge payload has no request")]
    MissingRequest,

    /// The path names an API group or version this server does not serve
    #[error("unknown API group version '{group}/{version}'")]
    UnknownGroupVersion {
        /// Requested API group
        group: String,
        /// Requested API version
        version: String,
    },
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingRequest => StatusCode::BAD_REQUEST,
            Self::UnknownGroupVersion { .. } => StatusCode::NOT_FOUND,
        };
        (status, self.to_string()).into_response()
    }
}

/// Build the webhook router.
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/apis/{group}/{version}/{solver}", post(challenge_handler))
        .route("/apis/{group}/{version}", get(discovery_handler))
        .route(HEALTHZ_PATH, get(probe_handler))
        .route(READYZ_PATH, get(probe_handler))
        .route(METRICS_SERVER_PATH, get(metrics_handler))
        .with_state(state)
}

/// Dispatch one challenge payload to the solver and fill in its response.
///
/// # Errors
///
/// Returns [`WebhookError::MissingRequest`] if `payload.request` is absent. Solver
/// failures are reported inside the returned payload.
pub async fn process_payload(
    state: &WebhookState,
    solver_name: &str,
    mut payload: ChallengePayload,
) -> Result<ChallengePayload, WebhookError> {
    let request = payload.request.as_ref().ok_or(WebhookError::MissingRequest)?;

    let response = if solver_name != state.solver.name() {
        warn!(solver = %solver_name, uid = %request.uid, "Request for unknown solver");
        failure(
            request,
            format!("unknown solver '{solver_name}'"),
            REASON_UNKNOWN_SOLVER,
            None,
        )
    } else {
        match ChallengeAction::parse(&request.action) {
            None => {
                warn!(action = %request.action, uid = %request.uid, "Request with unknown action");
                failure(
                    request,
                    format!("unknown action '{}'", request.action),
                    REASON_UNKNOWN_ACTION,
                    None,
                )
            }
            Some(action) => {
                let ctx = CallContext::background().with_timeout(state.call_timeout);
                let result = match action {
                    ChallengeAction::Present => state.solver.present(request, &ctx).await,
                    ChallengeAction::CleanUp => state.solver.cleanup(request, &ctx).await,
                };
                match result {
                    Ok(()) => ChallengeResponse {
                        uid: request.uid.clone(),
                        success: true,
                        status: None,
                    },
                    Err(e) => failure(
                        request,
                        e.to_string(),
                        e.status_reason(),
                        e.api_error().and_then(ApiError::status),
                    ),
                }
            }
        }
    };

    if payload.api_version.is_empty() {
        payload.api_version = CHALLENGE_PAYLOAD_API_VERSION.to_string();
    }
    if payload.kind.is_empty() {
        payload.kind = KIND_CHALLENGE_PAYLOAD.to_string();
    }
    payload.response = Some(response);
    Ok(payload)
}

/// Discovery document advertising the solver under `group_name`.
#[must_use]
pub fn api_resource_list(group_name: &str, solver_name: &str) -> APIResourceList {
    APIResourceList {
        group_version: format!("{group_name}/{WEBHOOK_API_VERSION}"),
        resources: vec![APIResource {
            name: solver_name.to_string(),
            singular_name: solver_name.to_string(),
            namespaced: false,
            kind: KIND_CHALLENGE_PAYLOAD.to_string(),
            verbs: vec!["create".to_string()],
            ..APIResource::default()
        }],
    }
}

/// `code` is the Fornex HTTP status when the failure came from an API response.
fn failure(
    request: &ChallengeRequest,
    message: String,
    reason: &str,
    code: Option<u16>,
) -> ChallengeResponse {
    ChallengeResponse {
        uid: request.uid.clone(),
        success: false,
        status: Some(Status {
            status: Some("Failure".to_string()),
            message: Some(message),
            reason: Some(reason.to_string()),
            code: code.map(i32::from),
            ..Status::default()
        }),
    }
}

fn check_group_version(
    state: &WebhookState,
    group: &str,
    version: &str,
) -> Result<(), WebhookError> {
    if group == state.group_name && version == WEBHOOK_API_VERSION {
        Ok(())
    } else {
        Err(WebhookError::UnknownGroupVersion {
            group: group.to_string(),
            version: version.to_string(),
        })
    }
}

async fn challenge_handler(
    State(state): State<WebhookState>,
    Path((group, version, solver)): Path<(String, String, String)>,
    Json(payload): Json<ChallengePayload>,
) -> Result<Json<ChallengePayload>, WebhookError> {
    check_group_version(&state, &group, &version)?;
    let payload = process_payload(&state, &solver, payload).await?;

    if let Some(response) = &payload.response {
        info!(
            uid = %response.uid,
            success = response.success,
            "Challenge request processed"
        );
    }
    Ok(Json(payload))
}

async fn discovery_handler(
    State(state): State<WebhookState>,
    Path((group, version)): Path<(String, String)>,
) -> Result<Json<APIResourceList>, WebhookError> {
    check_group_version(&state, &group, &version)?;
    Ok(Json(api_resource_list(&state.group_name, state.solver.name())))
}

async fn probe_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn metrics_handler() -> Response {
    match gather_metrics() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod webhook_tests;
