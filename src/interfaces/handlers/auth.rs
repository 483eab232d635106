use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{envelope::ApiResponse, user::LoginUser},
    errors::{AppError, AuthError},
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>,
) -> Result<impl Responder, AuthError> {
    let auth_response = state.auth_handler.login(user.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(auth_response)))
}

#[instrument(skip(claims, state), fields(user = %claims.0.sub))]
pub async fn me(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user = state.auth_handler.current_user(&claims.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}
