//! Liveness endpoint.

use actix_web::HttpResponse;

/// GET / and GET /v1 - plain liveness text.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Hello from GeoPost's post service")
}
