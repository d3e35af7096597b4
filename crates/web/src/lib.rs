pub use crate::common::RouteResult;

use std::path::Path;

use axum::{extract::FromRef, routing::get_service, Router};
use repair_directory::Client;
use tokio::net::TcpListener;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{config::WebConfig, store::DirectoryStore};

pub mod api;
pub mod common;
pub mod config;
pub mod hateoas;
pub mod middleware;
pub mod store;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub directory: Client<DirectoryStore>,
}

/// The api under `/api`, everything else served from `static_dir`.
pub fn app(state: WebState, static_dir: &Path) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content_router(static_dir))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(state: WebState, config: &WebConfig) -> std::io::Result<()> {
    let routes = app(state, &config.static_dir);

    let listener = TcpListener::bind(config.bind_address).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

/// Installs the `RUST_LOG`-filtered subscriber for request traces.
/// Fails if a global subscriber is already set.
pub fn init_tracing() -> Result<(), SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
}

fn static_content_router(static_dir: &Path) -> Router {
    Router::new().nest_service(
        "/",
        get_service(
            ServeDir::new(static_dir)
                .not_found_service(ServeFile::new(static_dir.join("error404.html"))),
        ),
    )
}
