// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use configmap_dns_provider::{
    cli::Cli,
    constants::SHUTDOWN_TIMEOUT,
    provider::Provider,
    record_store::RecordStore,
    store::ConfigMapStore,
    webhook::router,
};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("configmap-dns")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    init_logging(cli.log_level());
    info!("Log level: {}", cli.log_level());

    let provider_config = cli
        .provider_config()
        .context("Invalid domain filter regex")?;

    debug!("Initializing Kubernetes client");
    let client = kube_client(cli.kubeconfig.as_deref())
        .await
        .context("Could not load kubeconfig")?;

    let store = Arc::new(ConfigMapStore::new(client, &cli.namespace));
    let provider = Provider::new(provider_config, RecordStore::new(store, &cli.output));

    // Render once at startup so the ConfigMap exists and matches its records
    provider
        .canonicalize()
        .await
        .context("Canonicalizing ConfigMap failed")?;

    let listener = TcpListener::bind(cli.listen_address())
        .await
        .with_context(|| format!("Could not listen on {}", cli.listen))?;
    info!(
        "Serving webhook on {} for ConfigMap {}/{}",
        listener.local_addr()?,
        cli.namespace,
        cli.output
    );

    serve(listener, router(provider)).await
}

/// Initialize logging.
///
/// Respects `RUST_LOG` if set, otherwise uses the level from `-v` flags.
/// `RUST_LOG_FORMAT=json` switches to JSON output.
fn init_logging(level: LevelFilter) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

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
}

async fn kube_client(kubeconfig: Option<&Path>) -> Result<Client> {
    let Some(path) = kubeconfig else {
        return Ok(Client::try_default().await?);
    };
    let kubeconfig = Kubeconfig::read_from(path)?;
    let config =
        kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
    Ok(Client::try_from(config)?)
}

/// Serve until SIGINT/SIGTERM, then give in-flight requests a bounded drain period.
async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result??;
            anyhow::bail!("Webhook server exited unexpectedly without error")
        }
        () = shutdown_signal() => {
            info!("Shutdown signal received, draining in-flight requests");
        }
    }

    let _ = shutdown_tx.send(());
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await {
        Ok(result) => {
            result??;
            info!("Webhook server stopped");
        }
        Err(_) => warn!(
            "In-flight requests did not finish within {}s, exiting",
            SHUTDOWN_TIMEOUT.as_secs()
        ),
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
