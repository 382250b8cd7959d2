use utoipa::OpenApi;
use utoipauto::utoipauto;

#[utoipauto]
#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Excursion Booking REST API", description = "Excursion booking and back-office API endpoints")
    ),
)]
pub struct ApiDoc {}
