use axum::{
    extract::State,
    routing::{get, on},
    Json, Router,
};
use serde::Serialize;

pub mod v1;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        format!("/api{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest_service("/v1", v1::routes(state.clone()))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    /// Which backend the locations are read from and written to.
    pub store: &'static str,
}

/// Liveness check. Does not touch the store.
async fn health(State(WebState { directory }): State<WebState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        store: directory.store().name(),
    })
}
