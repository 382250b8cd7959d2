use anyhow::Context;
use sqlx::PgPool;

use super::errors::DestinationError;
use super::models::DestinationModel;
use super::schemas::{CreateDestinationRequest, DestinationData, UpdateDestinationRequest};
use crate::schemas::{Pagination, Status};

const DESTINATION_COLUMNS: &str =
    "id, name, country, description, image_url, is_active, created_at, updated_at";

#[tracing::instrument(name = "Create destination", skip(pool))]
pub async fn create_destination(
    pool: &PgPool,
    request: CreateDestinationRequest,
) -> Result<DestinationData, DestinationError> {
    if request.name.trim().is_empty() {
        return Err(DestinationError::ValidationError(
            "Destination name cannot be empty".to_string(),
        ));
    }
    let row = sqlx::query_as::<_, DestinationModel>(&format!(
        r#"
        INSERT INTO destination (name, country, description, image_url)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        DESTINATION_COLUMNS
    ))
    .bind(&request.name)
    .bind(&request.country)
    .bind(&request.description)
    .bind(&request.image_url)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query while creating destination: {:?}", e);
        DestinationError::DatabaseError(
            "A database failure occurred while creating the destination".to_string(),
            anyhow::Error::new(e),
        )
    })?;
    Ok(row.into_schema())
}

#[tracing::instrument(name = "Fetch destinations", skip(pool))]
pub async fn fetch_destinations(
    pool: &PgPool,
    pagination: &Pagination,
    include_inactive: bool,
) -> Result<Vec<DestinationData>, anyhow::Error> {
    let rows = sqlx::query_as::<_, DestinationModel>(&format!(
        r#"
        SELECT {} FROM destination
        WHERE ($1 OR is_active = 'active')
        ORDER BY name
        LIMIT $2 OFFSET $3
        "#,
        DESTINATION_COLUMNS
    ))
    .bind(include_inactive)
    .bind(pagination.limit)
    .bind(pagination.offset)
    .fetch_all(pool)
    .await
    .context("A database failure occurred while fetching destinations")?;
    Ok(rows.into_iter().map(DestinationModel::into_schema).collect())
}

#[tracing::instrument(name = "Fetch destination", skip(pool))]
pub async fn fetch_destination(
    pool: &PgPool,
    id: i64,
) -> Result<Option<DestinationData>, anyhow::Error> {
    let row = sqlx::query_as::<_, DestinationModel>(&format!(
        r#"SELECT {} FROM destination WHERE id = $1"#,
        DESTINATION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("A database failure occurred while fetching the destination")?;
    Ok(row.map(DestinationModel::into_schema))
}

#[tracing::instrument(name = "Update destination", skip(pool))]
pub async fn update_destination(
    pool: &PgPool,
    id: i64,
    request: UpdateDestinationRequest,
) -> Result<DestinationData, DestinationError> {
    let row = sqlx::query_as::<_, DestinationModel>(&format!(
        r#"
        UPDATE destination
        SET name = COALESCE($2, name),
            country = COALESCE($3, country),
            description = COALESCE($4, description),
            image_url = COALESCE($5, image_url),
            is_active = COALESCE($6, is_active)
        WHERE id = $1
        RETURNING {}
        "#,
        DESTINATION_COLUMNS
    ))
    .bind(id)
    .bind(&request.name)
    .bind(&request.country)
    .bind(&request.description)
    .bind(&request.image_url)
    .bind(request.is_active)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query while updating destination: {:?}", e);
        DestinationError::DatabaseError(
            "A database failure occurred while updating the destination".to_string(),
            anyhow::Error::new(e),
        )
    })?;
    row.map(DestinationModel::into_schema)
        .ok_or_else(|| DestinationError::NotFoundError("Destination not found".to_string()))
}

#[tracing::instrument(name = "Deactivate destination", skip(pool))]
pub async fn deactivate_destination(pool: &PgPool, id: i64) -> Result<(), DestinationError> {
    let result = sqlx::query(r#"UPDATE destination SET is_active = $2 WHERE id = $1"#)
        .bind(id)
        .bind(Status::Inactive)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to execute query while deactivating destination: {:?}",
                e
            );
            DestinationError::DatabaseError(
                "A database failure occurred while deactivating the destination".to_string(),
                anyhow::Error::new(e),
            )
        })?;
    if result.rows_affected() == 0 {
        return Err(DestinationError::NotFoundError(
            "Destination not found".to_string(),
        ));
    }
    Ok(())
}

#[tracing::instrument(name = "Hard delete destination", skip(pool))]
pub async fn hard_delete_destination(pool: &PgPool, id: i64) -> Result<(), anyhow::Error> {
    sqlx::query(r#"DELETE FROM destination WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await
        .context("A database failure occurred while deleting the destination")?;
    Ok(())
}
