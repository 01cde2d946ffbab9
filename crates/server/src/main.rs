//! clinic-server: clinic chat responder binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use clinic_server::SharedResponder;
use clinic_server::config::Config;

#[derive(Parser)]
#[command(name = "clinic-server")]
#[command(about = "Rule-based chat responder for clinic records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP chat API (default)
    Serve,
    /// Chat on the terminal until `quit`
    Chat,
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let command = Cli::parse().command.unwrap_or(Command::Serve);
    init_tracing(&command);

    // Load configuration
    let config = Config::from_env();
    let responder = Arc::new(clinic_server::build_responder(&config)?);

    match command {
        Command::Serve => serve(responder, &config).await,
        Command::Chat => chat(responder).await,
    }
}

/// JSON logs for the server; plain, quieter logs on stderr for the prompt
fn init_tracing(command: &Command) {
    let registry = tracing_subscriber::registry();

    match command {
        Command::Serve => registry
            .with(EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
            ))
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        Command::Chat => registry
            .with(EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
            ))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn serve(responder: SharedResponder, config: &Config) -> Result<(), BoxError> {
    tracing::info!(db_path = %config.db_path.display(), "Using clinic store");
    if config.response_seed.is_some() {
        tracing::info!("Reply selection seeded from RESPONSE_SEED");
    }

    // Build application
    let app = clinic_server::build_app(responder, config);

    // Start server
    let addr: SocketAddr = config.bind_address.parse()?;
    tracing::info!("Starting clinic chat server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn chat(responder: SharedResponder) -> Result<(), BoxError> {
    tokio::task::spawn_blocking(move || {
        clinic_server::repl::run(&responder, std::io::stdin().lock(), std::io::stdout())
    })
    .await??;
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
