//! Dodo Pet Store Kernel
//!
//! HTTP server for the storefront content pages and their admin screens.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dodo_kernel::config::SessionBackend;
use dodo_kernel::{AppState, Config, password, routes, session};

#[derive(Parser)]
#[command(name = "dodo", about = "Dodo pet store content server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print an Argon2 hash for ADMIN_PASSWORD_HASH.
    HashPassword {
        /// Plain-text password to hash.
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::HashPassword { password } => {
            let hash = password::hash_password(&password)?;
            println!("{hash}");
            Ok(())
        }
    }
}

async fn serve() -> Result<()> {
    init_tracing();

    info!("Starting Dodo kernel");

    // Load configuration from environment
    let config = Config::from_env().context("failed to load configuration")?;
    info!(port = config.port, "Configuration loaded");

    if config.admin_password_hash.is_none() {
        tracing::warn!("ADMIN_PASSWORD_HASH is not set; admin login is disabled");
    }

    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    let same_site = session::parse_same_site(&config.cookie_same_site);

    // Middleware layers (last added = first executed in request flow):
    // TraceLayer → session → routes
    let app: Router = match config.session_store {
        SessionBackend::Redis => {
            let session_layer = session::create_session_layer(&config.redis_url, same_site)
                .await
                .context("failed to create session layer")?;
            routes::app_router()
                .layer(session_layer)
                .layer(TraceLayer::new_for_http())
                .with_state(state)
        }
        SessionBackend::Memory => {
            info!("using in-memory sessions; logins are lost on restart");
            routes::app_router()
                .layer(session::memory_session_layer(same_site))
                .layer(TraceLayer::new_for_http())
                .with_state(state)
        }
    };

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
