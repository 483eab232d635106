use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        list_query::{ListQuery, ResultPage},
        project::{NewProjectRequest, Project, ProjectDraft, UpdateProjectRequest, PROJECT_FIELDS, PROJECT_OWNER},
    },
    errors::AppError,
    repositories::{listing::ReferenceSource, project::ProjectRepository},
    use_cases::advanced_results::{advanced_results, populate},
    utils::{
        uploads::{save_project_photo, UploadError, UploadSettings},
        valid_uuid::{not_found, valid_uuid},
    },
};

const RESOURCE: &str = "Project";

pub struct ProjectHandler<P, U>
where
    P: ProjectRepository + ?Sized,
    U: ReferenceSource + ?Sized,
{
    pub project_repo: Arc<P>,
    pub user_repo: Arc<U>,
    pub uploads: UploadSettings,
}

impl<P, U> ProjectHandler<P, U>
where
    P: ProjectRepository + ?Sized,
    U: ReferenceSource + ?Sized,
{
    pub fn new(project_repo: Arc<P>, user_repo: Arc<U>, uploads: UploadSettings) -> Self {
        ProjectHandler { project_repo, user_repo, uploads }
    }

    /// Lists projects with each owner resolved to `{id, name, email}`.
    pub async fn list_projects(&self, params: &[(String, String)]) -> Result<ResultPage, AppError> {
        let query = ListQuery::from_params(params, PROJECT_FIELDS);
        let mut page = advanced_results::<Project, _>(self.project_repo.as_ref(), &query).await?;
        populate(&mut page, Some(&PROJECT_OWNER), self.user_repo.as_ref()).await?;
        Ok(page)
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let project_id = valid_uuid(id, RESOURCE)?;

        self.project_repo
            .get_project_by_id(&project_id)
            .await?
            .ok_or_else(|| not_found(RESOURCE, id))
    }

    pub async fn create_project(&self, request: NewProjectRequest, owner: Uuid) -> Result<Project, AppError> {
        let draft = ProjectDraft::from_request(request, Some(owner));
        draft.validate()?;

        let project = self.project_repo.create_project(&draft).await?;
        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    /// Merges the patch over the stored project and re-validates the result.
    pub async fn update_project(&self, id: &str, patch: UpdateProjectRequest) -> Result<Project, AppError> {
        let current = self.get_project(id).await?;
        let project_id = current.id;

        let draft = ProjectDraft::from(current).merge(patch);
        draft.validate()?;

        self.project_repo
            .update_project(&project_id, &draft)
            .await?
            .ok_or_else(|| not_found(RESOURCE, id))
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let project_id = valid_uuid(id, RESOURCE)?;

        if self.project_repo.delete_project(&project_id).await? {
            Ok(())
        } else {
            Err(not_found(RESOURCE, id))
        }
    }

    /// The project must exist before the file is looked at.
    pub async fn upload_photo(&self, id: &str, bytes: Option<&[u8]>) -> Result<Project, AppError> {
        let project = self.get_project(id).await?;
        let bytes = bytes.ok_or(UploadError::Missing)?;

        let file_name = save_project_photo(&self.uploads, &project.id, bytes).await?;

        self.project_repo
            .set_project_image(&project.id, &file_name)
            .await?
            .ok_or_else(|| not_found(RESOURCE, id))
    }
}
