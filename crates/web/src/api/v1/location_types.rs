use std::sync::Arc;

use axum::{
    routing::{get, on},
    Extension, Router,
};
use model::{
    filter::TypeFilter,
    location::LocationType,
    presentation::{BadgeVariant, TypeColor},
};
use serde::Serialize;
use utility::let_also::LetAlso;

use crate::{
    common::{route_not_found, HateoasResult, VecResponse, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_location_types))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationTypeDto {
    pub value: LocationType,
    pub label: &'static str,
    pub plural_label: &'static str,
    pub badge: BadgeVariant,
    pub color: TypeColor,
}

impl From<LocationType> for LocationTypeDto {
    fn from(value: LocationType) -> Self {
        Self {
            value,
            label: value.label(),
            plural_label: value.plural_label(),
            badge: value.badge(),
            color: value.color(),
        }
    }
}

async fn get_location_types(
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<LocationTypeDto>>> {
    LocationType::ALL
        .into_iter()
        .map(|location_type| {
            let filter = TypeFilter::from(location_type);
            hateoas::Response::builder(LocationTypeDto::from(location_type), base_url.clone())
                .link("locations", super::locations::resource!("?type={}", filter))
                .page(format!("/search?type={}", filter))
                .build()
        })
        .collect::<Vec<_>>()
        .let_owned(|data| Ok(VecResponse::new(data).hateoas().json()))
}
