use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::{
        list_query::ListQuery,
        project::{Project, ProjectDraft, RecentProject},
    },
    errors::AppError,
    repositories::{
        listing::{self, ListSource},
        sqlx_repo::SqlxProjectRepo,
    },
};

const TABLE: &str = "projects";

// Both updates keep `updated_at` monotonic and never touch `created_at`.
const UPDATE_PROJECT_SQL: &str = r#"
            UPDATE projects
            SET
                title = $2,
                description = $3,
                long_description = $4,
                image = $5,
                technologies = $6,
                github_url = $7,
                demo_url = $8,
                featured = $9,
                updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $1
            RETURNING *
            "#;

const SET_IMAGE_SQL: &str = r#"
            UPDATE projects
            SET image = $2, updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $1
            RETURNING *
            "#;

#[async_trait]
pub trait ProjectRepository: ListSource<Project> + Send + Sync {
    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError>;
    async fn update_project(&self, id: &Uuid, draft: &ProjectDraft) -> Result<Option<Project>, AppError>;
    async fn set_project_image(&self, id: &Uuid, image: &str) -> Result<Option<Project>, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn count_projects(&self) -> Result<u64, AppError>;
    async fn recent_projects(&self, limit: i64) -> Result<Vec<RecentProject>, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl ListSource<Project> for SqlxProjectRepo {
    async fn count_matching(&self, query: &ListQuery) -> Result<u64, AppError> {
        let count: i64 = listing::count_matching(TABLE, query)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn find_matching(&self, query: &ListQuery) -> Result<Vec<Project>, AppError> {
        let projects = listing::select_matching(TABLE, "*", query)
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                id, title, description, long_description, image,
                technologies, github_url, demo_url, featured, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.long_description)
        .bind(&draft.image)
        .bind(&draft.technologies)
        .bind(&draft.github_url)
        .bind(&draft.demo_url)
        .bind(draft.featured)
        .bind(draft.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update_project(&self, id: &Uuid, draft: &ProjectDraft) -> Result<Option<Project>, AppError> {
        sqlx::query_as::<_, Project>(UPDATE_PROJECT_SQL)
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.long_description)
        .bind(&draft.image)
        .bind(&draft.technologies)
        .bind(&draft.github_url)
        .bind(&draft.demo_url)
        .bind(draft.featured)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn set_project_image(&self, id: &Uuid, image: &str) -> Result<Option<Project>, AppError> {
        sqlx::query_as::<_, Project>(SET_IMAGE_SQL)
        .bind(id)
        .bind(image)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_project(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_projects(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn recent_projects(&self, limit: i64) -> Result<Vec<RecentProject>, AppError> {
        sqlx::query_as::<_, RecentProject>(
            r#"
            SELECT id, title, description, image, created_at
            FROM projects
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
