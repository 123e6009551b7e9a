// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context as _, Result};
use axum::{routing::get, Router};
use clap::Parser;
use desec_dns_operator::{
    config::{ConfigProvider, MountedConfig},
    constants::{
        DEFAULT_CONFIG_DIR, HEALTH_SERVER_PATH, METRICS_SERVER_BIND_ADDRESS, METRICS_SERVER_PATH,
        TOKIO_WORKER_THREADS,
    },
    context::Context,
    controller::{run_ingress_controller, run_managed_domain_controller},
    desec::DesecClient,
    metrics,
    store::KubeStore,
};
use kube::Client;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Kubernetes operator keeping deSEC DNS records in sync with cluster ingresses.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding the mounted `config/` and `secret/` files
    #[arg(long, env = "DESEC_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Bind address of the metrics and health endpoints
    #[arg(long, env = "DESEC_METRICS_ADDR", default_value = METRICS_SERVER_BIND_ADDRESS)]
    metrics_addr: SocketAddr,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("desec-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    // Initialize logging with custom format
    // Format: timestamp file:line LEVEL message
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Example: RUST_LOG=debug cargo run
    //
    // Respects RUST_LOG_FORMAT environment variable for output format
    // Example: RUST_LOG_FORMAT=json cargo run
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

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

    info!("Starting deSEC DNS Controller");
    debug!(config_dir = %args.config_dir.display(), "Logging initialized");

    // The deSEC client is built once; token or host changes need a restart.
    // Domain and namespace are re-read on every reconcile.
    let config_provider = Arc::new(MountedConfig::new(&args.config_dir));
    let initial_config = config_provider
        .load()
        .with_context(|| format!("failed to load config from {}", args.config_dir.display()))?;
    info!(
        domain = %initial_config.domain,
        namespace = %initial_config.namespace,
        mgmt_host = %initial_config.mgmt_host,
        "Loaded operator configuration"
    );
    let dns = Arc::new(DesecClient::new(&initial_config)?);

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let ctx = Arc::new(Context::new(
        config_provider,
        Arc::new(KubeStore::new(client.clone())),
        dns,
    ));

    info!("Starting all controllers");

    // Controllers should never exit - if one does, log it and exit the main process
    tokio::select! {
        () = run_ingress_controller(client.clone(), ctx.clone()) => {
            error!("CRITICAL: Ingress controller exited unexpectedly");
            anyhow::bail!("Ingress controller exited unexpectedly")
        }
        () = run_managed_domain_controller(client.clone(), ctx.clone()) => {
            error!("CRITICAL: ManagedDomain controller exited unexpectedly");
            anyhow::bail!("ManagedDomain controller exited unexpectedly")
        }
        result = run_metrics_server(args.metrics_addr) => {
            error!("CRITICAL: metrics server exited: {:?}", result);
            result?;
            anyhow::bail!("metrics server exited unexpectedly without error")
        }
        result = shutdown_signal() => {
            result?;
            info!("Shutdown signal received, stopping controllers");
            Ok(())
        }
    }
}

/// Serve `/metrics` and `/healthz`.
async fn run_metrics_server(addr: SocketAddr) -> Result<()> {
    let app = Router::new()
        .route(METRICS_SERVER_PATH, get(metrics_handler))
        .route(HEALTH_SERVER_PATH, get(|| async { "ok" }));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics server to {addr}"))?;
    info!(addr = %addr, "Metrics server started");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn metrics_handler() -> (axum::http::StatusCode, String) {
    match metrics::gather_metrics() {
        Ok(body) => (axum::http::StatusCode::OK, body),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

#[cfg(test)]
mod main_tests;
