use actix_web::{http::StatusCode, HttpResponse};

use crate::entities::envelope::ApiResponse;

pub fn json_error(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::failure(message))
}

pub async fn route_not_found() -> HttpResponse {
    json_error(StatusCode::NOT_FOUND, "Route not found")
}
