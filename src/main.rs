use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use filedrop::api;
use filedrop::archiver::spawn_archiver;
use filedrop::config::{Config, sqlite_file_path};
use filedrop::utils::cli::Args;
use filedrop::utils::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = validate_config(&args).await;

    let options = SqliteConnectOptions::from_str(&config.db_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(12)
        .connect_with(options)
        .await?;
    let state = Arc::new(AppState::new(config, Arc::new(pool)).await?);

    let archiver = spawn_archiver(state.clone(), CancellationToken::new());
    let app = api::create_router(state.clone());

    let listener = tokio::net::TcpListener::bind((state.config.host.as_str(), state.config.port))
        .await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    archiver.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down...");
}

async fn validate_config(args: &Args) -> Config {
    let mut validation_errors = Vec::new();

    let root_dir = Path::new(&args.root);
    if let Ok(meta) = tokio::fs::metadata(root_dir).await {
        if !meta.is_dir() {
            validation_errors.push(format!(
                "FILEDROP_ROOTDIR `{}` exists but is not a directory",
                args.root,
            ));
        }
    }

    if args.archive_interval_secs == 0 {
        validation_errors.push("FILEDROP_ARCHIVE_INTERVAL_SECS must be greater than zero".to_string());
    }

    if axum::http::HeaderValue::from_str(&args.cors_origin).is_err() {
        validation_errors.push(format!(
            "FILEDROP_CORS_ORIGIN `{}` is not a valid origin",
            args.cors_origin,
        ));
    }

    if let Some(db_path) = sqlite_file_path(&args.database_url) {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                validation_errors.push(format!(
                    "The directory for the database `{}` does not exist",
                    parent.display(),
                ));
            }
        }
    }

    if !validation_errors.is_empty() {
        eprintln!("{}", validation_errors.join("\n"));
        std::process::exit(1);
    }

    Config {
        host: args.host.clone(),
        port: args.port,
        root_dir: root_dir.to_path_buf(),
        db_url: args.database_url.clone(),
        archive_interval: Duration::from_secs(args.archive_interval_secs),
        cors_origin: args.cors_origin.clone(),
        legacy_parity: args.legacy_parity,
    }
}
