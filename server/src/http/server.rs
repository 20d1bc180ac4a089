use anyhow::Result;
use axum::{Router, middleware, routing::get};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{error::attach_error_path, handlers, state::AppState};
use crate::service::BulbService;

pub fn build_router(service: BulbService) -> Router {
    let app_state = Arc::new(AppState { service });

    Router::new()
        // Health checks
        .route("/health", get(handlers::health_check))
        .route("/ping", get(handlers::ping))
        // Bulb CRUD operations
        .route(
            "/bulbs",
            get(handlers::list_bulbs).post(handlers::create_bulb),
        )
        .route(
            "/bulbs/:id",
            get(handlers::get_bulb)
                .put(handlers::update_bulb)
                .delete(handlers::delete_bulb),
        )
        .with_state(app_state)
        .layer(middleware::from_fn(attach_error_path))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, service: BulbService) -> Result<()> {
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(service)).await?;
    Ok(())
}

pub async fn start_server(service: BulbService, bind_address: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(bind_address).await?;
    serve(listener, service).await
}
