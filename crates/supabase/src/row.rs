use chrono::{DateTime, Utc};
use model::{
    location::{LocationType, NewRepairLocation, RepairLocation},
    services::Services,
};
use repair_directory::store::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utility::id::Id;

/// A `repair_locations` row as the gateway returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub location_type: String,
    pub services: Option<Vec<String>>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

impl LocationRow {
    /// Decodes one element of a list response on its own, so a single
    /// malformed row does not fail the whole listing.
    pub fn decode(value: Value) -> StoreResult<Self> {
        let id = value["id"].as_str().unwrap_or("?").to_owned();
        serde_json::from_value(value)
            .map_err(|why| StoreError::InvalidRow(format!("location {}: {}", id, why)))
    }

    pub fn to_model(self) -> RepairLocation {
        RepairLocation {
            id: Id::new(self.id),
            name: self.name,
            description: self.description,
            address: self.address,
            phone: self.phone,
            website: self.website,
            location_type: self.location_type.into(),
            services: Services::from_column(self.services),
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: self.created_at,
        }
    }
}

/// The insert body. Absent optionals are sent as `null`, never as `""`.
#[derive(Debug, Clone, Serialize)]
pub struct InsertRow {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub location_type: LocationType,
    pub services: Option<Vec<String>>,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<NewRepairLocation> for InsertRow {
    fn from(location: NewRepairLocation) -> Self {
        Self {
            services: location.services.to_column(),
            name: location.name,
            description: location.description,
            address: location.address,
            phone: location.phone,
            website: location.website,
            location_type: location.location_type,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::ExampleData;
    use serde_json::json;

    #[test]
    fn decodes_gateway_row() {
        let row: LocationRow = serde_json::from_value(json!({
            "id": "9a0e",
            "name": "Acme Repair",
            "description": null,
            "address": "1 Main Street",
            "phone": null,
            "website": "https://acme.example",
            "location_type": "repair_cafe",
            "services": ["bikes", "bikes", "phones"],
            "latitude": 40.71,
            "longitude": -74.0,
            "created_at": "2024-05-01T09:00:00.123456+00:00"
        }))
        .unwrap();
        let location = row.to_model();
        assert_eq!(location.location_type, LocationType::RepairCafe);
        assert_eq!(location.services.to_vec(), vec!["bikes", "phones"]);
    }

    #[test]
    fn row_without_coordinates_is_invalid() {
        let result = LocationRow::decode(json!({
            "id": "5f1d",
            "name": "Half Row",
            "address": "1 Main Street",
            "location_type": "repair_cafe",
            "latitude": null,
            "longitude": -74.0,
            "created_at": "2024-05-01T09:00:00+00:00"
        }));
        match result {
            Err(StoreError::InvalidRow(why)) => assert!(why.starts_with("location 5f1d")),
            other => panic!("expected an invalid row, got {:?}", other),
        }
    }

    #[test]
    fn insert_body_uses_nulls() {
        let mut new = NewRepairLocation::example_data();
        new.phone = None;
        new.services = Services::new();
        let body = serde_json::to_value(InsertRow::from(new)).unwrap();
        assert_eq!(body["phone"], serde_json::Value::Null);
        assert_eq!(body["services"], serde_json::Value::Null);
        assert_eq!(body["location_type"], "repair_cafe");
        assert!(body.get("id").is_none());
    }
}
