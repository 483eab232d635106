use std::sync::Arc;

use serde::Serialize;
use validator::Validate;

use crate::{
    auth::password::hash_password,
    entities::{
        contact::RecentContact,
        list_query::{ListQuery, ResultPage},
        project::RecentProject,
        user::{NewUser, PublicUser, UpdateUserRequest, UserProfile, USER_FIELDS},
    },
    errors::AppError,
    repositories::{contact::ContactRepository, project::ProjectRepository, user::UserRepository},
    use_cases::advanced_results::advanced_results,
    utils::valid_uuid::{not_found, valid_uuid},
};

const RESOURCE: &str = "User";
const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: u64,
    pub total_contacts: u64,
    pub unread_contacts: u64,
    pub total_users: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivities {
    pub recent_contacts: Vec<RecentContact>,
    pub recent_projects: Vec<RecentProject>,
}

pub struct AdminHandler<P, C, U>
where
    P: ProjectRepository + ?Sized,
    C: ContactRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub project_repo: Arc<P>,
    pub contact_repo: Arc<C>,
    pub user_repo: Arc<U>,
}

impl<P, C, U> AdminHandler<P, C, U>
where
    P: ProjectRepository + ?Sized,
    C: ContactRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub fn new(project_repo: Arc<P>, contact_repo: Arc<C>, user_repo: Arc<U>) -> Self {
        AdminHandler { project_repo, contact_repo, user_repo }
    }

    pub async fn list_users(&self, params: &[(String, String)]) -> Result<ResultPage, AppError> {
        let query = ListQuery::from_params(params, USER_FIELDS);
        advanced_results::<PublicUser, _>(self.user_repo.as_ref(), &query).await
    }

    pub async fn get_user(&self, id: &str) -> Result<PublicUser, AppError> {
        let user_id = valid_uuid(id, RESOURCE)?;

        self.user_repo
            .get_user_by_id(&user_id)
            .await?
            .ok_or_else(|| not_found(RESOURCE, id))
    }

    /// Hashes the password after the strength check; duplicate emails are a conflict.
    pub async fn create_user(&self, request: NewUser) -> Result<PublicUser, AppError> {
        request.validate()?;

        let password_hash = hash_password(&request.password)?;
        let insert = request.prepare_for_insert(password_hash);

        let user = self.user_repo.create_user(&insert).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn update_user(&self, id: &str, patch: UpdateUserRequest) -> Result<PublicUser, AppError> {
        let current = self.get_user(id).await?;
        let user_id = current.id;

        let profile = UserProfile::merge(current, patch);
        profile.validate()?;

        self.user_repo
            .update_user(&user_id, &profile)
            .await?
            .ok_or_else(|| not_found(RESOURCE, id))
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let user_id = valid_uuid(id, RESOURCE)?;

        if self.user_repo.delete_user(&user_id).await? {
            Ok(())
        } else {
            Err(not_found(RESOURCE, id))
        }
    }

    /// The four counts run concurrently; any failure fails the whole result.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let (total_projects, total_contacts, unread_contacts, total_users) = futures::try_join!(
            self.project_repo.count_projects(),
            self.contact_repo.count_contacts(),
            self.contact_repo.count_unread_contacts(),
            self.user_repo.count_users(),
        )?;

        Ok(DashboardStats { total_projects, total_contacts, unread_contacts, total_users })
    }

    pub async fn recent_activities(&self) -> Result<RecentActivities, AppError> {
        let (recent_contacts, recent_projects) = futures::try_join!(
            self.contact_repo.recent_contacts(RECENT_LIMIT),
            self.project_repo.recent_projects(RECENT_LIMIT),
        )?;

        Ok(RecentActivities { recent_contacts, recent_projects })
    }
}
