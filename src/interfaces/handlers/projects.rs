use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        envelope::{ApiResponse, Empty},
        project::{NewProjectRequest, UpdateProjectRequest},
    },
    errors::AppError,
    use_cases::extractors::AdminClaims,
    utils::uploads::UploadError,
    AppState,
};

#[derive(Debug, MultipartForm)]
pub struct PhotoUpload {
    #[multipart(limit = "10MB")]
    pub file: Option<TempFile>,
}

#[instrument(skip(state, query))]
pub async fn get_projects(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<impl Responder, AppError> {
    let page = state.project_handler.list_projects(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(state))]
pub async fn get_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(project)))
}

#[instrument(skip(claims, state, data), fields(admin = %claims.0.sub))]
pub async fn create_project(
    claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let owner = uuid::Uuid::parse_str(&claims.0.sub).map_err(|_| AppError::UnauthorizedAccess)?;

    let project = state
        .project_handler
        .create_project(data.into_inner(), owner)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(project)))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_project(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .update_project(&project_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(project)))
}

#[instrument(skip(_claims, state))]
pub async fn delete_project(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(Empty::default())))
}

#[instrument(skip(_claims, state, form))]
pub async fn upload_project_photo(
    _claims: AdminClaims,
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<PhotoUpload>,
) -> Result<impl Responder, AppError> {
    let bytes = match &form.file {
        Some(file) => Some(
            tokio::fs::read(file.file.path())
                .await
                .map_err(UploadError::from)?,
        ),
        None => None,
    };

    let project = state
        .project_handler
        .upload_photo(&project_id, bytes.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(project.image)))
}
