// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use fornex_webhook::{
    constants::{DEFAULT_FORNEX_API_URL, DEFAULT_LISTEN_ADDR, TOKIO_WORKER_THREADS},
    solver::{FornexSolver, Solver},
    webhook::{router, WebhookState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info};
use url::Url;

/// cert-manager DNS-01 webhook solver for the Fornex DNS API
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// API group the webhook is registered under
    #[arg(long, env = "GROUP_NAME")]
    group_name: String,

    /// Address the webhook server listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    listen_addr: SocketAddr,

    /// Fornex API base URL used unless an issuer sets `baseUrl`
    #[arg(long, env = "FORNEX_API_URL", default_value = DEFAULT_FORNEX_API_URL)]
    fornex_api_url: Url,

    /// Log output format (`text` or `json`)
    #[arg(long, env = "RUST_LOG_FORMAT", default_value = "text")]
    log_format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("fornex-webhook")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(args))
}

fn init_tracing(log_format: &str) {
    // Respects RUST_LOG if set, otherwise defaults to INFO level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(args: Args) -> Result<()> {
    init_tracing(&args.log_format);

    info!(
        group = %args.group_name,
        listen_addr = %args.listen_addr,
        fornex_api_url = %args.fornex_api_url,
        "Starting Fornex DNS-01 webhook"
    );

    debug!("Loading Kubernetes client configuration");
    let kube_config = kube::Config::infer()
        .await
        .context("failed to infer Kubernetes configuration")?;

    let mut solver = FornexSolver::new(args.fornex_api_url);
    solver
        .initialize(kube_config)
        .await
        .context("failed to initialize solver")?;

    let state = WebhookState::new(args.group_name, Arc::new(solver));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", args.listen_addr))?;
    info!(addr = %args.listen_addr, "Webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Webhook server stopped");
    Ok(())
}

/// Resolve on SIGINT (Ctrl+C) or, on Unix, SIGTERM as sent by the kubelet.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}

#[cfg(test)]
mod main_tests;
