use chrono::{DateTime, Utc};
use model::{location::RepairLocation, services::Services};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;

/// A repair service location.
/// Table: `repair_locations`
#[derive(Debug, Clone, FromRow)]
pub struct RepairLocationRow {
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

impl DatabaseRow for RepairLocationRow {
    type Model = RepairLocation;

    fn to_model(self) -> Self::Model {
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
