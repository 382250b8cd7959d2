use anyhow::Context;
use bigdecimal::BigDecimal;
use sqlx::PgPool;

use super::errors::ExcursionError;
use super::models::{BookableExcursionModel, ExcursionModel};
use super::schemas::{
    CreateExcursionRequest, ExcursionData, ExcursionListFilter, UpdateExcursionRequest,
};
use crate::schemas::Status;

const EXCURSION_SELECT: &str = r#"
    SELECT e.id, e.destination_id, d.name AS destination_name, e.title, e.description,
           e.price, e.capacity, e.duration_hours, e.is_active, e.created_at, e.updated_at
    FROM excursion e
    JOIN destination d ON d.id = e.destination_id
"#;

#[tracing::instrument(name = "Create excursion", skip(pool))]
pub async fn create_excursion(
    pool: &PgPool,
    request: CreateExcursionRequest,
) -> Result<ExcursionData, ExcursionError> {
    if request.title.trim().is_empty() {
        return Err(ExcursionError::ValidationError(
            "Excursion title cannot be empty".to_string(),
        ));
    }
    if request.price < BigDecimal::from(0) {
        return Err(ExcursionError::ValidationError(
            "Excursion price cannot be negative".to_string(),
        ));
    }
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO excursion (destination_id, title, description, price, capacity, duration_hours)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(request.destination_id)
    .bind(&request.title)
    .bind(&request.description)
    .bind(&request.price)
    .bind(request.capacity)
    .bind(request.duration_hours)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.constraint().is_some() => {
            ExcursionError::ValidationError("Referenced destination does not exist".to_string())
        }
        _ => ExcursionError::DatabaseError(
            "A database failure occurred while creating the excursion".to_string(),
            anyhow::Error::new(e),
        ),
    })?;
    fetch_excursion(pool, id)
        .await
        .map_err(ExcursionError::UnexpectedError)?
        .ok_or_else(|| ExcursionError::NotFoundError("Excursion not found".to_string()))
}

#[tracing::instrument(name = "Fetch excursions", skip(pool))]
pub async fn fetch_excursions(
    pool: &PgPool,
    filter: &ExcursionListFilter,
    include_inactive: bool,
) -> Result<Vec<ExcursionData>, anyhow::Error> {
    let rows = sqlx::query_as::<_, ExcursionModel>(&format!(
        r#"
        {}
        WHERE ($1 OR e.is_active = 'active')
        AND ($2::BIGINT IS NULL OR e.destination_id = $2)
        ORDER BY e.title
        LIMIT $3 OFFSET $4
        "#,
        EXCURSION_SELECT
    ))
    .bind(include_inactive)
    .bind(filter.destination_id)
    .bind(filter.limit)
    .bind(filter.offset)
    .fetch_all(pool)
    .await
    .context("A database failure occurred while fetching excursions")?;
    Ok(rows.into_iter().map(ExcursionModel::into_schema).collect())
}

#[tracing::instrument(name = "Fetch excursion", skip(pool))]
pub async fn fetch_excursion(
    pool: &PgPool,
    id: i64,
) -> Result<Option<ExcursionData>, anyhow::Error> {
    let row = sqlx::query_as::<_, ExcursionModel>(&format!(
        r#"{} WHERE e.id = $1"#,
        EXCURSION_SELECT
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("A database failure occurred while fetching the excursion")?;
    Ok(row.map(ExcursionModel::into_schema))
}

/// Loads the price basis for checkout; only active excursions are bookable.
#[tracing::instrument(name = "Fetch bookable excursion", skip(pool))]
pub async fn fetch_bookable_excursion(
    pool: &PgPool,
    id: i64,
) -> Result<Option<BookableExcursionModel>, anyhow::Error> {
    let row = sqlx::query_as::<_, BookableExcursionModel>(
        r#"SELECT id, price FROM excursion WHERE id = $1 AND is_active = 'active'"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("A database failure occurred while fetching the excursion")?;
    Ok(row)
}

#[tracing::instrument(name = "Update excursion", skip(pool))]
pub async fn update_excursion(
    pool: &PgPool,
    id: i64,
    request: UpdateExcursionRequest,
) -> Result<ExcursionData, ExcursionError> {
    if let Some(price) = &request.price {
        if *price < BigDecimal::from(0) {
            return Err(ExcursionError::ValidationError(
                "Excursion price cannot be negative".to_string(),
            ));
        }
    }
    let result = sqlx::query(
        r#"
        UPDATE excursion
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            capacity = COALESCE($5, capacity),
            duration_hours = COALESCE($6, duration_hours),
            is_active = COALESCE($7, is_active)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&request.title)
    .bind(&request.description)
    .bind(&request.price)
    .bind(request.capacity)
    .bind(request.duration_hours)
    .bind(request.is_active)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query while updating excursion: {:?}", e);
        ExcursionError::DatabaseError(
            "A database failure occurred while updating the excursion".to_string(),
            anyhow::Error::new(e),
        )
    })?;
    if result.rows_affected() == 0 {
        return Err(ExcursionError::NotFoundError(
            "Excursion not found".to_string(),
        ));
    }
    fetch_excursion(pool, id)
        .await
        .map_err(ExcursionError::UnexpectedError)?
        .ok_or_else(|| ExcursionError::NotFoundError("Excursion not found".to_string()))
}

#[tracing::instrument(name = "Deactivate excursion", skip(pool))]
pub async fn deactivate_excursion(pool: &PgPool, id: i64) -> Result<(), ExcursionError> {
    let result = sqlx::query(r#"UPDATE excursion SET is_active = $2 WHERE id = $1"#)
        .bind(id)
        .bind(Status::Inactive)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to execute query while deactivating excursion: {:?}",
                e
            );
            ExcursionError::DatabaseError(
                "A database failure occurred while deactivating the excursion".to_string(),
                anyhow::Error::new(e),
            )
        })?;
    if result.rows_affected() == 0 {
        return Err(ExcursionError::NotFoundError(
            "Excursion not found".to_string(),
        ));
    }
    Ok(())
}

#[tracing::instrument(name = "Hard delete excursion", skip(pool))]
pub async fn hard_delete_excursion(pool: &PgPool, id: i64) -> Result<(), anyhow::Error> {
    sqlx::query(r#"DELETE FROM excursion WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await
        .context("A database failure occurred while deleting the excursion")?;
    Ok(())
}
