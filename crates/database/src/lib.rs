use std::error::Error;

use async_trait::async_trait;
use model::location::{NewRepairLocation, RepairLocation};
use repair_directory::store::{LocationStore, StoreResult};
use utility::id::Id;

pub mod data_model;
pub mod queries;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

/// `repair_locations` in a Postgres database reached directly.
#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> Result<Self, Box<dyn Error>> {
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("connected to postgres, migrations applied");

        Ok(Self { connection: pool })
    }
}

#[async_trait]
impl LocationStore for PgDatabase {
    async fn select_all_newest_first(&self) -> StoreResult<Vec<RepairLocation>> {
        queries::location::get_all_newest_first(&self.connection).await
    }

    async fn select_single(&self, id: &Id<RepairLocation>) -> StoreResult<RepairLocation> {
        queries::location::get_single(&self.connection, id).await
    }

    async fn insert(&self, location: NewRepairLocation) -> StoreResult<RepairLocation> {
        queries::location::insert(&self.connection, location).await
    }
}
