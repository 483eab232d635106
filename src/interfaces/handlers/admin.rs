use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        envelope::{ApiResponse, Empty},
        user::{NewUser, UpdateUserRequest},
    },
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state, query))]
pub async fn get_users(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<impl Responder, AppError> {
    let page = state.admin_handler.list_users(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(_claims, state))]
pub async fn get_user(
    _claims: AdminClaims,
    user_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user = state.admin_handler.get_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_user(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewUser>,
) -> Result<impl Responder, AppError> {
    let user = state.admin_handler.create_user(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(user)))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_user(
    _claims: AdminClaims,
    user_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateUserRequest>,
) -> Result<impl Responder, AppError> {
    let user = state.admin_handler.update_user(&user_id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

#[instrument(skip(_claims, state))]
pub async fn delete_user(
    _claims: AdminClaims,
    user_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.admin_handler.delete_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(Empty::default())))
}

#[instrument(skip(_claims, state))]
pub async fn dashboard_stats(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let stats = state.admin_handler.dashboard_stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

#[instrument(skip(_claims, state))]
pub async fn recent_activities(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let activities = state.admin_handler.recent_activities().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(activities)))
}
