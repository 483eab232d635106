use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        contact::{MarkReadRequest, NewContactForm},
        envelope::{ApiResponse, Empty},
    },
    errors::AppError,
    use_cases::extractors::AdminClaims,
    utils::get_client_ip::get_client_ip,
    AppState,
};

#[instrument(skip(req, state, form))]
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<NewContactForm>,
) -> Result<impl Responder, AppError> {
    let client_ip = get_client_ip(&req, state.trust_forwarded_for);

    state
        .contact_handler
        .submit_contact(&client_ip, form.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Email sent successfully")))
}

#[instrument(skip(_claims, state, query))]
pub async fn get_contacts(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<impl Responder, AppError> {
    let page = state.contact_handler.list_contacts(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(_claims, state))]
pub async fn get_contact(
    _claims: AdminClaims,
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let contact = state.contact_handler.view_contact(&contact_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(contact)))
}

#[instrument(skip(_claims, state))]
pub async fn delete_contact(
    _claims: AdminClaims,
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.contact_handler.delete_contact(&contact_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(Empty::default())))
}

/// An empty body (or one without `isRead`) toggles the flag. A body that is
/// not a valid `MarkReadRequest` is rejected.
#[instrument(skip(_claims, state, body))]
pub async fn mark_contact_read(
    _claims: AdminClaims,
    contact_id: web::Path<String>,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let request = parse_mark_read(&body)?;
    let contact = state.contact_handler.mark_read(&contact_id, request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(contact)))
}

fn parse_mark_read(body: &[u8]) -> Result<MarkReadRequest, AppError> {
    if body.trim_ascii().is_empty() {
        return Ok(MarkReadRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON payload: {}", e)))
}
