//! URL fetcher server binary
//!
//! Parses arguments, starts the service and serves until SIGINT or
//! SIGTERM arrives. Signal delivery is wired to the service's explicit
//! `shutdown` here; the core never installs global handlers itself.

use std::process;

use clap::Parser;
use tokio::sync::oneshot;
use tracing::{info, warn};

use urlfetcher::app::{ServiceConfig, UrlFetcherService};
use urlfetcher::cli::{init_logging, Cli};
use urlfetcher::errors::Result;
use urlfetcher::server;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("urlfetcher server v{} starting", env!("CARGO_PKG_VERSION"));
    let addr = server::resolve_listen_addr(&cli.address).await?;

    let config = ServiceConfig {
        worker_count: cli.threads,
        ..Default::default()
    };
    let service = UrlFetcherService::new(config)?;

    // Stop the service first so blocked resolvers drain, then let the
    // transport finish its in-flight streams
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn({
        let service = service.clone();
        async move {
            let signal = shutdown_signal().await;
            info!("received {}, server shutting down", signal);
            service.shutdown().await;
            let _ = shutdown_tx.send(());
        }
    });

    server::serve(service, addr, async {
        let _ = shutdown_rx.await;
    })
    .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() -> &'static str {
    let interrupt = tokio::signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
