use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo,
    id::{HasId, Id},
};

use crate::{services::Services, ExampleData, WithDistance};

/// The kind of repair service a location offers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    RepairCafe,
    CommercialShop,
    MobileService,
}

impl LocationType {
    pub const ALL: [LocationType; 3] = [
        LocationType::RepairCafe,
        LocationType::CommercialShop,
        LocationType::MobileService,
    ];

    /// The value stored in the `location_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RepairCafe => "repair_cafe",
            Self::CommercialShop => "commercial_shop",
            Self::MobileService => "mobile_service",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocationType(pub String);

impl fmt::Display for UnknownLocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown location type '{}', expected one of repair_cafe, commercial_shop, mobile_service",
            self.0
        )
    }
}

impl std::error::Error for UnknownLocationType {}

impl FromStr for LocationType {
    type Err = UnknownLocationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationType::ALL
            .into_iter()
            .find(|location_type| location_type.as_str() == s)
            .ok_or_else(|| UnknownLocationType(s.to_owned()))
    }
}

/// The `location_type` column as read back from the table.
///
/// Rows written by other clients may hold a value outside [`LocationType`].
/// Those rows are kept and rendered with the fallback presentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoredLocationType {
    Known(LocationType),
    Unrecognized(String),
}

impl StoredLocationType {
    pub fn known(&self) -> Option<LocationType> {
        match self {
            Self::Known(location_type) => Some(*location_type),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(location_type) => location_type.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<LocationType> for StoredLocationType {
    fn from(value: LocationType) -> Self {
        Self::Known(value)
    }
}

impl From<String> for StoredLocationType {
    fn from(value: String) -> Self {
        value
            .parse()
            .map(Self::Known)
            .unwrap_or(Self::Unrecognized(value))
    }
}

impl From<StoredLocationType> for String {
    fn from(value: StoredLocationType) -> Self {
        match value {
            StoredLocationType::Known(location_type) => location_type.as_str().to_owned(),
            StoredLocationType::Unrecognized(raw) => raw,
        }
    }
}

impl PartialEq<LocationType> for StoredLocationType {
    fn eq(&self, other: &LocationType) -> bool {
        self.known() == Some(*other)
    }
}

impl fmt::Display for StoredLocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn distance_km_to(&self, other: &Coordinates) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// A repair service entry as stored in `repair_locations`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepairLocation {
    pub id: Id<RepairLocation>,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    #[schemars(with = "String")]
    pub location_type: StoredLocationType,
    #[serde(default)]
    pub services: Services,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

impl HasId for RepairLocation {
    type IdType = String;
}

impl RepairLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Attaches the distance to `reference`, if one is given.
    pub fn with_distance_to(
        self,
        reference: Option<&Coordinates>,
    ) -> WithDistance<RepairLocation> {
        let distance = reference.map(|point| self.coordinates().distance_km_to(point));
        WithDistance::new(distance, self)
    }
}

impl ExampleData for RepairLocation {
    fn example_data() -> Self {
        let new = NewRepairLocation::example_data();
        RepairLocation {
            id: Id::new("4f1c2a4e-8d0b-4e5e-9a57-2f3d1b6c7e90".to_owned()),
            name: new.name,
            description: new.description,
            address: new.address,
            phone: new.phone,
            website: new.website,
            location_type: new.location_type.into(),
            services: new.services,
            latitude: new.latitude,
            longitude: new.longitude,
            created_at: Utc
                .with_ymd_and_hms(2024, 3, 16, 10, 0, 0)
                .single()
                .unwrap_or_default(),
        }
    }
}

/// A fully assembled location that has not been stored yet. The store assigns
/// `id` and `created_at`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewRepairLocation {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub location_type: LocationType,
    #[serde(default)]
    pub services: Services,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewRepairLocation {
    /// Turns the pending record into a stored one.
    pub fn stored(self, id: Id<RepairLocation>, created_at: DateTime<Utc>) -> RepairLocation {
        RepairLocation {
            id,
            name: self.name,
            description: self.description,
            address: self.address,
            phone: self.phone,
            website: self.website,
            location_type: self.location_type.into(),
            services: self.services,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at,
        }
    }
}

impl ExampleData for NewRepairLocation {
    fn example_data() -> Self {
        NewRepairLocation {
            name: "Downtown Repair Cafe".to_owned(),
            description: Some(
                "Volunteers help you fix electronics, clothing and bikes.".to_owned(),
            ),
            address: "12 Canal Street, New York, NY".to_owned(),
            phone: Some("(555) 123-4567".to_owned()),
            website: Some("https://example.com".to_owned()),
            location_type: LocationType::RepairCafe,
            services: ["Electronics", "Clothing", "Bikes"].into_iter().collect(),
            latitude: 40.7191,
            longitude: -74.0021,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_type_round_trips_through_str() {
        for location_type in LocationType::ALL {
            assert_eq!(location_type.as_str().parse(), Ok(location_type));
        }
        assert_eq!(
            "bakery".parse::<LocationType>(),
            Err(UnknownLocationType("bakery".to_owned()))
        );
    }

    #[test]
    fn location_type_serializes_as_column_value() {
        let json = serde_json::to_string(&LocationType::CommercialShop).unwrap();
        assert_eq!(json, "\"commercial_shop\"");
    }

    #[test]
    fn stored_type_keeps_unrecognized_values() {
        assert_eq!(
            StoredLocationType::from("mobile_service".to_owned()),
            LocationType::MobileService
        );
        let bakery = StoredLocationType::from("bakery".to_owned());
        assert_eq!(bakery.known(), None);
        assert_eq!(bakery.as_str(), "bakery");

        let json = serde_json::to_string(&bakery).unwrap();
        assert_eq!(json, "\"bakery\"");
        let back: StoredLocationType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bakery);
    }

    #[test]
    fn location_serializes_camel_case_without_empty_optionals() {
        let mut location = RepairLocation::example_data();
        location.phone = None;
        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value["locationType"], "repair_cafe");
        assert_eq!(value["services"][0], "Electronics");
        assert!(value.get("phone").is_none());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn distance_is_only_attached_with_reference() {
        let location = RepairLocation::example_data();
        assert_eq!(location.clone().with_distance_to(None).distance_km, None);

        let here = location.coordinates();
        let with_distance = location.with_distance_to(Some(&here));
        assert_eq!(with_distance.distance_km, Some(0.0));
    }
}
