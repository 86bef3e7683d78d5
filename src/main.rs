use std::sync::Arc;

use event_listing_api::{AppState, ListingPage};
use event_listing_app::build_application;
use event_persistence_sea_orm::{ConnectionManager, events::EventRepositoryImpl};
use event_listing_server::{config::ServerConfig, logs};
use log::{error, info};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env file: {}", e);
            std::process::exit(1);
        }
    }

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logs::init_logger(&config.log) {
        eprintln!("Failed to initialize logger: {}", e);
        std::process::exit(1);
    }

    let connections = Arc::new(ConnectionManager::new(config.database.clone()));
    let event_repo = Arc::new(EventRepositoryImpl::new(connections));
    let app = Arc::new(build_application(event_repo));

    let page = match ListingPage::new(config.base_url.clone()) {
        Ok(page) => Arc::new(page),
        Err(e) => {
            error!("Failed to prepare listing page: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting application");

    if let Err(e) =
        event_listing_api::run(AppState { app, page }, config.http, shutdown_signal()).await
    {
        error!("HTTP API failed: {}", e);
        std::process::exit(1);
    }
}
