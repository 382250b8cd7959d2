use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{CreateDestinationRequest, DestinationData, UpdateDestinationRequest};
use super::utils::{
    create_destination, deactivate_destination, fetch_destination, fetch_destinations,
    update_destination,
};
use crate::errors::GenericError;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::{GenericResponse, Pagination};

#[utoipa::path(
    get,
    path = "/destination",
    tag = "Destination",
    description = "Lists active destinations for the catalog.",
    responses(
        (status=200, description= "Destination list", body= GenericResponse<Vec<DestinationData>>),
    )
)]
#[tracing::instrument(name = "List destinations", skip(pool))]
pub async fn list_destinations(
    pool: web::Data<PgPool>,
    pagination: web::Query<Pagination>,
) -> Result<web::Json<GenericResponse<Vec<DestinationData>>>, GenericError> {
    // Catalog listing degrades to an empty page when the store is down.
    let data = fetch_destinations(&pool, &pagination, false)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to fetch destinations: {:?}", e);
            vec![]
        });
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched destinations",
        Some(data),
    )))
}

#[utoipa::path(
    get,
    path = "/destination/{id}",
    tag = "Destination",
    description = "Fetches a single destination.",
    responses(
        (status=200, description= "Destination", body= GenericResponse<DestinationData>),
        (status=404, description= "Destination not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Get destination", skip(pool))]
pub async fn get_destination(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<web::Json<GenericResponse<DestinationData>>, GenericError> {
    let data = fetch_destination(&pool, path.into_inner())
        .await
        .map_err(|e| {
            GenericError::DatabaseError("Failed to fetch the destination".to_string(), e)
        })?
        .ok_or_else(|| GenericError::NotFoundError("Destination not found".to_string()))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched destination",
        Some(data),
    )))
}

#[utoipa::path(
    post,
    path = "/destination",
    tag = "Destination",
    description = "Creates a destination (admin).",
    request_body(content = CreateDestinationRequest, description = "Request Body"),
    responses(
        (status=200, description= "Destination created", body= GenericResponse<DestinationData>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Privilege", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Create destination API", skip(pool), fields(admin = %user.id))]
pub async fn create_destination_handler(
    body: CreateDestinationRequest,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<DestinationData>>, GenericError> {
    let data = create_destination(&pool, body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully created destination",
        Some(data),
    )))
}

#[utoipa::path(
    patch,
    path = "/destination/{id}",
    tag = "Destination",
    description = "Updates a destination (admin).",
    request_body(content = UpdateDestinationRequest, description = "Request Body"),
    responses(
        (status=200, description= "Destination updated", body= GenericResponse<DestinationData>),
        (status=404, description= "Destination not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Update destination API", skip(pool), fields(admin = %user.id))]
pub async fn update_destination_handler(
    body: UpdateDestinationRequest,
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<DestinationData>>, GenericError> {
    let data = update_destination(&pool, path.into_inner(), body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated destination",
        Some(data),
    )))
}

#[utoipa::path(
    delete,
    path = "/destination/{id}",
    tag = "Destination",
    description = "Removes a destination from the catalog (admin). The row is kept for referencing excursions.",
    responses(
        (status=200, description= "Destination removed", body= GenericResponse<TupleUnit>),
        (status=404, description= "Destination not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "Deactivate destination API", skip(pool), fields(admin = %user.id))]
pub async fn deactivate_destination_handler(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    deactivate_destination(&pool, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully removed destination",
        Some(()),
    )))
}
