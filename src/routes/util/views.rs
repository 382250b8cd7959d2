use actix_web::HttpResponse;

#[utoipa::path(
    get,
    path = "/util/health_check",
    tag = "Util",
    description = "Liveness probe.",
    responses(
        (status=200, description= "Service is up"),
    )
)]
#[tracing::instrument(name = "Health check")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("still alive")
}
