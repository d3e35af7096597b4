use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use model::location::{NewRepairLocation, RepairLocation};
use tokio::sync::RwLock;
use utility::id::Id;

use crate::store::{LocationStore, StoreError, StoreResult};

/// A process-local store, used when no hosted table is configured and in
/// tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<Vec<RepairLocation>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `rows`, in insertion order.
    pub fn with_locations(rows: Vec<RepairLocation>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn generate_id(&self) -> Id<RepairLocation> {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        Id::new(format!("local-{n}"))
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn select_all_newest_first(&self) -> StoreResult<Vec<RepairLocation>> {
        // Reverse first so that rows sharing a timestamp stay newest-inserted
        // first under the stable sort.
        let mut rows = self.rows.read().await.iter().rev().cloned().collect::<Vec<_>>();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn select_single(&self, id: &Id<RepairLocation>) -> StoreResult<RepairLocation> {
        let rows = self.rows.read().await;
        let mut matching = rows.iter().filter(|row| &row.id == id);
        match (matching.next(), matching.next()) {
            (Some(row), None) => Ok(row.clone()),
            (Some(_), Some(_)) => Err(StoreError::Ambiguous),
            (None, _) => Err(StoreError::NotFound),
        }
    }

    async fn insert(&self, location: NewRepairLocation) -> StoreResult<RepairLocation> {
        let stored = location.stored(self.generate_id(), Utc::now());
        self.rows.write().await.push(stored.clone());
        Ok(stored)
    }
}
