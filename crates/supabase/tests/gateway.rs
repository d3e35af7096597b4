use std::collections::HashMap;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use model::{
    location::{LocationType, NewRepairLocation},
    ExampleData,
};
use repair_directory::{LocationStore, StoreError};
use serde_json::{json, Value};
use supabase::{SupabaseCredentials, SupabaseStore};
use tokio::net::TcpListener;
use utility::id::Id;

const KEY: &str = "anon-test-key";

fn row(id: &str, name: &str, location_type: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "address": "1 Main Street",
        "phone": null,
        "website": null,
        "location_type": location_type,
        "services": ["bikes"],
        "latitude": 40.71,
        "longitude": -74.0,
        "created_at": created_at
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(KEY)
        && headers.get("authorization").and_then(|v| v.to_str().ok())
            == Some("Bearer anon-test-key")
}

async fn select(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "no key"})));
    }
    let wants_object = headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("vnd.pgrst.object"));

    match params.get("id") {
        Some(filter) if wants_object => match filter.as_str() {
            "eq.acme" => (
                StatusCode::OK,
                Json(row("acme", "Acme Repair", "repair_cafe", "2024-05-01T09:00:00+00:00")),
            ),
            "eq.twin" => (
                StatusCode::NOT_ACCEPTABLE,
                Json(json!({
                    "code": "PGRST116",
                    "message": "JSON object requested, multiple (or no) rows returned",
                    "details": "The result contains 2 rows",
                    "hint": null
                })),
            ),
            _ => (
                StatusCode::NOT_ACCEPTABLE,
                Json(json!({
                    "code": "PGRST116",
                    "message": "JSON object requested, multiple (or no) rows returned",
                    "details": "The result contains 0 rows",
                    "hint": null
                })),
            ),
        },
        _ => {
            assert_eq!(params.get("order").map(String::as_str), Some("created_at.desc"));
            (
                StatusCode::OK,
                Json(json!([
                    row("acme", "Acme Repair", "repair_cafe", "2024-05-01T09:00:00+00:00"),
                    row("odd", "Odd Row", "bakery", "2024-05-01T08:30:00+00:00"),
                    json!({"id": "torn", "name": "Torn Row", "latitude": null}),
                    row("bob", "Bob's Shop", "commercial_shop", "2024-05-01T08:00:00+00:00"),
                ])),
            )
        }
    }
}

async fn insert(headers: HeaderMap, Json(mut body): Json<Value>) -> impl IntoResponse {
    assert_eq!(
        headers.get("prefer").and_then(|v| v.to_str().ok()),
        Some("return=representation")
    );
    if body["name"] == "Rejected" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"code": "23505", "message": "duplicate key", "details": null, "hint": null})),
        );
    }
    body["id"] = json!("new-id");
    body["created_at"] = json!("2024-06-01T12:00:00+00:00");
    (StatusCode::CREATED, Json(body))
}

async fn gateway() -> SupabaseStore {
    let router = Router::new().route("/rest/v1/repair_locations", get(select).post(insert));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    SupabaseStore::new(SupabaseCredentials::new(format!("http://{address}/"), KEY)).unwrap()
}

#[tokio::test]
async fn lists_rows_newest_first_and_skips_malformed_rows() {
    let store = gateway().await;
    let rows = store.select_all_newest_first().await.unwrap();
    let ids = rows.iter().map(|row| row.id.raw()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["acme", "odd", "bob"]);
    assert_eq!(rows[1].location_type.as_str(), "bakery");
    assert_eq!(rows[1].location_type.known(), None);
    assert_eq!(rows[2].location_type, LocationType::CommercialShop);
}

#[tokio::test]
async fn single_row_lookup() {
    let store = gateway().await;

    let acme = store.select_single(&Id::new("acme".to_owned())).await.unwrap();
    assert_eq!(acme.name, "Acme Repair");

    let missing = store.select_single(&Id::new("nope".to_owned())).await;
    assert!(matches!(missing, Err(StoreError::NotFound)));

    let twin = store.select_single(&Id::new("twin".to_owned())).await;
    assert!(matches!(twin, Err(StoreError::Ambiguous)));
}

#[tokio::test]
async fn insert_returns_stored_row() {
    let store = gateway().await;
    let stored = store.insert(NewRepairLocation::example_data()).await.unwrap();
    assert_eq!(stored.id.raw(), "new-id");
    assert_eq!(stored.name, NewRepairLocation::example_data().name);
    assert_eq!(stored.services, NewRepairLocation::example_data().services);
}

#[tokio::test]
async fn insert_errors_are_opaque() {
    let store = gateway().await;
    let mut location = NewRepairLocation::example_data();
    location.name = "Rejected".to_owned();
    let result = store.insert(location).await;
    assert!(matches!(result, Err(StoreError::Other(_))));
}

#[tokio::test]
async fn wrong_key_is_a_failure_not_an_absence() {
    let store = gateway().await;
    let address = store_address(&store);
    let stranger =
        SupabaseStore::new(SupabaseCredentials::new(address, "someone-else")).unwrap();
    let result = stranger.select_all_newest_first().await;
    assert!(matches!(result, Err(StoreError::Other(_))));
}

fn store_address(store: &SupabaseStore) -> String {
    store.base_url().to_owned()
}
