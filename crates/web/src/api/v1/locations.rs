use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Json, Router,
};
use model::{
    filter::{LocationQuery, TypeFilter},
    location::{Coordinates, LocationType, RepairLocation},
    presentation::{
        results_summary, type_badge, type_color, type_label, BadgeVariant, ServicePreview,
        TypeColor, CARD_SERVICE_PREVIEW,
    },
    ExampleData, WithDistance,
};
use repair_directory::{client::SUBMIT_SUCCESS_MESSAGE, LocationForm};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo,
    id::Id,
    let_also::LetAlso,
    serde::{blank_as_none, empty_as_none},
};

use crate::{
    common::{
        route_not_found, schema, HateoasResult, RouteErrorResponse, RouteResult,
        VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/locations{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<RepairLocation>))
        .route("/form/schema", get(schema::<LocationFormBody>))
        .route("/:id", get(get_location))
        .route("/", get(get_locations).post(add_location))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// A location together with everything needed to render its card.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    #[serde(flatten)]
    pub location: WithDistance<RepairLocation>,
    pub type_label: String,
    pub badge: BadgeVariant,
    pub color: TypeColor,
    pub service_preview: ServicePreview,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub more_services: Option<String>,
}

impl LocationView {
    pub fn new(location: RepairLocation, reference: Option<&Coordinates>) -> Self {
        let raw_type = location.location_type.as_str();
        let service_preview = ServicePreview::of(&location.services, CARD_SERVICE_PREVIEW);
        Self {
            type_label: type_label(raw_type).to_owned(),
            badge: type_badge(raw_type),
            color: type_color(raw_type),
            more_services: service_preview.more_label(),
            service_preview,
            location: location.with_distance_to(reference),
        }
    }
}

pub(crate) fn location_hateoas(
    view: LocationView,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<LocationView> {
    let id = view.location.content.id.clone();
    let website = view.location.content.website.clone();
    hateoas::Response::builder(view, base_url)
        .link("self", resource!("/{}", id))
        .page(format!("/location/{}", id))
        .link_extern_option("website", website)
        .build()
}

#[derive(Debug, Deserialize)]
struct LocationsQuery {
    #[serde(default)]
    q: String,

    #[serde(rename = "type", default)]
    location_type: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    latitude: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    longitude: Option<f64>,
}

fn reference_point(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<Coordinates>, RouteErrorResponse> {
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(latitude), Some(longitude)) if geo::is_valid_coordinate(latitude, longitude) => {
            Ok(Some(Coordinates::new(latitude, longitude)))
        }
        (Some(_), Some(_)) => Err(RouteErrorResponse::bad_request(
            "latitude and longitude are out of range.",
        )),
        _ => Err(RouteErrorResponse::bad_request(
            "latitude and longitude must be given together.",
        )),
    }
}

async fn get_locations(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { directory, .. }): State<WebState>,
    Query(params): Query<LocationsQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<LocationView>>> {
    let bad_request = |why: RouteErrorResponse| why.with_method(&Method::GET).with_uri(original_uri.path());

    let location_type = match params.location_type.as_deref().map(str::trim) {
        None | Some("") => TypeFilter::All,
        Some(raw) => raw.parse::<TypeFilter>().map_err(|why| {
            RouteErrorResponse::bad_request(why.to_string())
                .with_detailed_information(format!(
                    "type must be one of: all, {}",
                    LocationType::ALL.map(|t| t.as_str()).join(", ")
                ))
                .let_owned(bad_request)
        })?,
    };
    let reference = reference_point(params.latitude, params.longitude).map_err(bad_request)?;

    let query = LocationQuery::new(params.q, location_type);
    let locations = directory.search(&query).await;

    let summary = results_summary(locations.len());
    locations
        .into_iter()
        .map(|location| {
            location_hateoas(LocationView::new(location, reference.as_ref()), base_url.clone())
        })
        .collect::<Vec<_>>()
        .let_owned(|data| VecResponse::new(data).with_summary(summary))
        .let_owned(|response| {
            hateoas::Response::builder(response, base_url)
                .link("self", resource!(""))
                .link("schema", resource!("/schema"))
                .page("/search")
                .build()
                .json()
        })
        .let_owned(Ok)
}

#[derive(Debug, Deserialize)]
struct ReferenceQuery {
    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    latitude: Option<f64>,

    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    longitude: Option<f64>,
}

async fn get_location(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { directory, .. }): State<WebState>,
    Query(params): Query<ReferenceQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<LocationView> {
    let reference = reference_point(params.latitude, params.longitude)
        .map_err(|why| why.with_method(&Method::GET).with_uri(original_uri.path()))?;

    directory
        .fetch_by_id(&Id::new(id))
        .await
        .map(|location| location_hateoas(LocationView::new(location, reference.as_ref()), base_url).json())
        .ok_or_else(|| RouteErrorResponse::not_found(&Method::GET, original_uri.path()))
}

/// What the "add location" page posts.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationFormBody {
    pub name: String,
    #[serde(deserialize_with = "blank_as_none::deserialize")]
    pub description: Option<String>,
    pub address: String,
    #[serde(deserialize_with = "blank_as_none::deserialize")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "blank_as_none::deserialize")]
    pub website: Option<String>,
    pub location_type: String,
    pub services: Vec<String>,
}

impl ExampleData for LocationFormBody {
    fn example_data() -> Self {
        Self {
            name: "Downtown Repair Cafe".to_owned(),
            description: Some("Volunteers help you fix electronics, clothing and bikes.".to_owned()),
            address: "12 Canal Street, New York, NY".to_owned(),
            phone: Some("(555) 123-4567".to_owned()),
            website: None,
            location_type: LocationType::RepairCafe.as_str().to_owned(),
            services: vec!["Electronics".to_owned(), "Clothing".to_owned()],
        }
    }
}

impl From<LocationFormBody> for LocationForm {
    fn from(body: LocationFormBody) -> Self {
        let mut form = LocationForm::default();
        form.name = body.name;
        form.description = body.description.unwrap_or_default();
        form.address = body.address;
        form.phone = body.phone.unwrap_or_default();
        form.website = body.website.unwrap_or_default();
        form.location_type = body.location_type;
        for service in body.services.iter() {
            form.add_service(service);
        }
        form
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddedLocation {
    pub message: String,
    pub location: LocationView,
}

async fn add_location(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { directory, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    body: Result<Json<LocationFormBody>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<AddedLocation>>)> {
    let Json(body) = body.map_err(|why| {
        RouteErrorResponse::new(why.status())
            .with_default_message()
            .with_detailed_information(why.body_text())
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })?;

    let mut form = LocationForm::from(body);
    let location = directory.submit(&mut form).await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })?;

    let id = location.id.clone();
    let added = AddedLocation {
        message: SUBMIT_SUCCESS_MESSAGE.to_owned(),
        location: LocationView::new(location, None),
    };
    let response = hateoas::Response::builder(added, base_url)
        .link("self", resource!("/{}", id))
        .link("search", resource!(""))
        .page("/search")
        .build();

    Ok((StatusCode::CREATED, response.json()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use repair_directory::form::FormField;

    #[test]
    fn form_body_drops_blank_and_repeated_services() {
        let body: LocationFormBody = serde_json::from_value(serde_json::json!({
            "name": "Fix-It Van",
            "address": "Anywhere",
            "locationType": "mobile_service",
            "phone": "  ",
            "services": ["Electronics", " ", "Electronics", "Bikes "]
        }))
        .unwrap();
        assert_eq!(body.phone, None);
        let form = LocationForm::from(body);
        assert_eq!(form.services().to_vec(), vec!["Electronics", "Bikes"]);
        assert_eq!(form.location_type, "mobile_service");
        assert_eq!(form.phone, "");
    }

    #[test]
    fn field_errors_name_body_keys() {
        let body = serde_json::to_value(LocationFormBody::example_data()).unwrap();
        for field in [FormField::Name, FormField::Address, FormField::LocationType] {
            let key = serde_json::to_value(field).unwrap();
            let key = key.as_str().unwrap();
            assert!(body.get(key).is_some(), "{key} is not a form body key");
        }
    }

    #[test]
    fn view_previews_three_services() {
        let mut location = RepairLocation::example_data();
        location.services = ["a", "b", "c", "d", "e"].into_iter().collect();
        let view = LocationView::new(location, None);
        assert_eq!(view.service_preview.shown, vec!["a", "b", "c"]);
        assert_eq!(view.more_services.as_deref(), Some("+2 more"));
        assert_eq!(view.type_label, "Repair Cafe");
        assert_eq!(view.location.distance_km, None);
    }

    #[test]
    fn view_of_unrecognized_type_uses_fallbacks() {
        let mut location = RepairLocation::example_data();
        location.location_type = "bakery".to_owned().into();
        let view = LocationView::new(location, None);
        assert_eq!(view.type_label, "Repair Service");
        assert_eq!(view.badge, BadgeVariant::Default);
        assert_eq!(view.color, TypeColor::Gray);
    }

    #[test]
    fn reference_needs_both_coordinates() {
        assert!(reference_point(None, None).unwrap().is_none());
        assert!(reference_point(Some(1.0), Some(2.0)).unwrap().is_some());
        assert!(reference_point(Some(1.0), None).is_err());
        assert!(reference_point(Some(100.0), Some(2.0)).is_err());
    }
}
