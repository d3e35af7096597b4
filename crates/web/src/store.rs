use std::error::Error;

use async_trait::async_trait;
use database::PgDatabase;
use model::location::{NewRepairLocation, RepairLocation};
use repair_directory::{memory::MemoryStore, LocationStore, StoreResult};
use supabase::SupabaseStore;
use utility::id::Id;

use crate::config::StoreConfig;

/// The backend picked at startup.
#[derive(Clone)]
pub enum DirectoryStore {
    Postgres(PgDatabase),
    Supabase(SupabaseStore),
    Memory(MemoryStore),
}

impl DirectoryStore {
    pub async fn connect(config: StoreConfig) -> Result<Self, Box<dyn Error>> {
        let store = match config {
            StoreConfig::Postgres(info) => Self::Postgres(PgDatabase::connect(info).await?),
            StoreConfig::Supabase(credentials) => {
                log::info!("using supabase table at {}", credentials.url);
                Self::Supabase(SupabaseStore::new(credentials)?)
            }
            StoreConfig::Memory => {
                log::warn!("no hosted store configured, locations are kept in memory only");
                Self::Memory(MemoryStore::new())
            }
        };
        Ok(store)
    }

    /// Same names as [`StoreConfig::name`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Supabase(_) => "supabase",
            Self::Memory(_) => "memory",
        }
    }
}


#[async_trait]
impl LocationStore for DirectoryStore {
    async fn select_all_newest_first(&self) -> StoreResult<Vec<RepairLocation>> {
        match self {
            Self::Postgres(store) => store.select_all_newest_first().await,
            Self::Supabase(store) => store.select_all_newest_first().await,
            Self::Memory(store) => store.select_all_newest_first().await,
        }
    }

    async fn select_single(&self, id: &Id<RepairLocation>) -> StoreResult<RepairLocation> {
        match self {
            Self::Postgres(store) => store.select_single(id).await,
            Self::Supabase(store) => store.select_single(id).await,
            Self::Memory(store) => store.select_single(id).await,
        }
    }

    async fn insert(&self, location: NewRepairLocation) -> StoreResult<RepairLocation> {
        match self {
            Self::Postgres(store) => store.insert(location).await,
            Self::Supabase(store) => store.insert(location).await,
            Self::Memory(store) => store.insert(location).await,
        }
    }
}
