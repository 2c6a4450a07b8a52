mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use burrow_core::{Repository, Shortener};
use burrow_gateway::{App, AppState, RouterSettings};
use burrow_generator::RandomGenerator;
use burrow_shortener::{ShortenerService, ShortenerSettings};
use burrow_storage::{InMemoryRepository, RedbRepository};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    burrow_telemetry::init(config.log_format.into())?;

    let base_url = config.base_url();
    info!(
        port = config.port,
        base_url = %base_url,
        storage_backend = %config.storage,
        db_path = %config.db_path.display(),
        code_length = config.code_length,
        max_attempts = ?config.max_attempts(),
        "starting burrow HTTP server"
    );

    let generator = RandomGenerator::new(usize::from(config.code_length));
    let settings = ShortenerSettings::builder()
        .max_attempts(config.max_attempts())
        .build();

    let shortener: Arc<dyn Shortener> = match config.storage {
        StorageBackendArg::Redb => {
            let repository = RedbRepository::open(&config.db_path).with_context(|| {
                format!("failed to open store at {}", config.db_path.display())
            })?;
            build_shortener(repository, generator, settings)
        }
        StorageBackendArg::InMemory => {
            build_shortener(InMemoryRepository::new(), generator, settings)
        }
    };

    let state = AppState::new(shortener, base_url);
    let router = App::router(
        state,
        RouterSettings {
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        },
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // The router, and with it the last store handle, is dropped by now.
    info!("server stopped, store closed");
    Ok(())
}

fn build_shortener<R: Repository>(
    repository: R,
    generator: RandomGenerator,
    settings: ShortenerSettings,
) -> Arc<dyn Shortener> {
    Arc::new(ShortenerService::with_settings(repository, generator, settings))
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
