use std::sync::Arc;

use axum::{Router, routing::get};
use event_listing_app::Application;
use log::info;
use tower_http::cors::CorsLayer;

use crate::http::page::ListingPage;

pub mod event;
pub mod page;
pub mod payload;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
    pub page: Arc<ListingPage>,
}

#[derive(Clone, Debug)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route(
            "/api/event",
            get(event::list_events).post(event::create_event),
        )
        .route(
            "/api/event/{slug}",
            get(event::get_event).post(event::create_event_in_collection),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(
    state: AppState,
    settings: HttpSettings,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.host, settings.port)).await?;

    info!("API server listening on {}:{}", settings.host, settings.port);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}
