use std::sync::Arc;

use axum::{
    routing::{get, on},
    Extension, Router,
};
use serde::Serialize;

use crate::{
    common::{route_not_found, HateoasResult, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

mod location_types;
mod locations;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(index))
        .nest_service("/locations", locations::routes(state.clone()))
        .nest_service("/location-types", location_types::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize)]
struct IndexDto {
    name: &'static str,
    version: &'static str,
}

/// Entry point listing the resources and frontend pages.
async fn index(Extension(base_url): Extension<Arc<BaseUrl>>) -> HateoasResult<IndexDto> {
    let index = IndexDto {
        name: "repair directory",
        version: "v1",
    };
    Ok(hateoas::Response::builder(index, base_url)
        .link("locations", locations::resource!(""))
        .link("location-types", resource!("/location-types"))
        .link("location-schema", locations::resource!("/schema"))
        .link("form-schema", locations::resource!("/form/schema"))
        .page("/")
        .page("/search")
        .page("/add")
        .build()
        .json())
}
