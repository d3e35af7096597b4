use std::{error, result};

use async_trait::async_trait;
use model::location::{NewRepairLocation, RepairLocation};
use utility::id::Id;

pub const TABLE: &str = "repair_locations";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no matching location")]
    NotFound,
    #[error("more than one location matched")]
    Ambiguous,
    #[error("malformed row: {0}")]
    InvalidRow(String),
    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync>),
}

impl StoreError {
    pub fn other<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }

    /// Whether the error only says that nothing matched.
    pub fn is_absence(&self) -> bool {
        matches!(self, Self::NotFound | Self::Ambiguous)
    }
}

pub type StoreResult<T> = result::Result<T, StoreError>;

/// Keeps the rows that could be converted, logging the ones that could not.
pub fn collect_valid_rows<I>(rows: I) -> Vec<RepairLocation>
where
    I: IntoIterator<Item = StoreResult<RepairLocation>>,
{
    rows.into_iter()
        .filter_map(|row| {
            row.inspect_err(|why| log::warn!("skipping row: {}", why))
                .ok()
        })
        .collect()
}

/// The hosted `repair_locations` table.
///
/// Implementations only select and insert; nothing in this workspace updates
/// or deletes a location. Every call is a single, independent request.
#[async_trait]
pub trait LocationStore: Clone + Send + Sync + 'static {
    /// All rows, newest `created_at` first.
    async fn select_all_newest_first(&self) -> StoreResult<Vec<RepairLocation>>;

    /// Exactly one row with the given id. Zero rows is `NotFound`, several rows
    /// is `Ambiguous`.
    async fn select_single(&self, id: &Id<RepairLocation>) -> StoreResult<RepairLocation>;

    /// Inserts one row and returns it with the store-assigned `id` and
    /// `created_at`.
    async fn insert(&self, location: NewRepairLocation) -> StoreResult<RepairLocation>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::ExampleData;

    #[test]
    fn invalid_rows_are_skipped() {
        let rows = vec![
            Ok(RepairLocation::example_data()),
            Err(StoreError::InvalidRow("location 5f1d: missing field `latitude`".to_owned())),
        ];
        assert_eq!(collect_valid_rows(rows), vec![RepairLocation::example_data()]);
    }

    #[test]
    fn absence_errors() {
        assert!(StoreError::NotFound.is_absence());
        assert!(StoreError::Ambiguous.is_absence());
        assert!(!StoreError::InvalidRow(String::new()).is_absence());
    }
}
