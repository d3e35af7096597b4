use model::location::{NewRepairLocation, RepairLocation};
use repair_directory::store::{StoreError, StoreResult};
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::{location::RepairLocationRow, to_models, DatabaseRow};

use super::convert_error;

pub async fn get_all_newest_first<'c, E>(executor: E) -> StoreResult<Vec<RepairLocation>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, name, description, address, phone, website,
            location_type, services, latitude, longitude, created_at
        FROM
            repair_locations
        ORDER BY created_at DESC;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<RepairLocationRow>| Ok(to_models(rows)))
}

pub async fn get_single<'c, E>(
    executor: E,
    id: &Id<RepairLocation>,
) -> StoreResult<RepairLocation>
where
    E: Executor<'c, Database = Postgres>,
{
    // two rows are enough to tell "exactly one" from "several"
    let mut rows: Vec<RepairLocationRow> = sqlx::query_as(
        "
        SELECT
            id, name, description, address, phone, website,
            location_type, services, latitude, longitude, created_at
        FROM
            repair_locations
        WHERE id = $1
        LIMIT 2;
        ",
    )
    .bind(id.raw_ref::<str>())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;

    match rows.len() {
        0 => Err(StoreError::NotFound),
        1 => Ok(rows.remove(0).to_model()),
        _ => Err(StoreError::Ambiguous),
    }
}

pub async fn insert<'c, E>(
    executor: E,
    location: NewRepairLocation,
) -> StoreResult<RepairLocation>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO repair_locations(
            name,
            description,
            address,
            phone,
            website,
            location_type,
            services,
            latitude,
            longitude
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING
            id, name, description, address, phone, website,
            location_type, services, latitude, longitude, created_at;
        ",
    )
    .bind(&location.name)
    .bind(&location.description)
    .bind(&location.address)
    .bind(&location.phone)
    .bind(&location.website)
    .bind(location.location_type.as_str())
    .bind(location.services.to_column())
    .bind(location.latitude)
    .bind(location.longitude)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: RepairLocationRow| row.to_model())
}
