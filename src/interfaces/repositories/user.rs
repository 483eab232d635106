use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;
use std::borrow::Cow;

use crate::{
    entities::{
        list_query::ListQuery,
        user::{PublicUser, User, UserInsert, UserProfile},
    },
    errors::AppError,
    repositories::{
        listing::{self, ListSource, ReferenceSource},
        sqlx_repo::SqlxUserRepo,
    },
};

const TABLE: &str = "users";
const PUBLIC_COLUMNS: &str = "id, name, email, role, created_at";

#[async_trait]
pub trait UserRepository: ListSource<PublicUser> + ReferenceSource + Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn count_users(&self) -> Result<u64, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<PublicUser>, AppError>;
    async fn create_user(&self, user: &UserInsert) -> Result<PublicUser, AppError>;
    async fn update_user(&self, id: &Uuid, profile: &UserProfile) -> Result<Option<PublicUser>, AppError>;
    async fn delete_user(&self, id: &Uuid) -> Result<bool, AppError>;
}

impl SqlxUserRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

fn map_email_conflict(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
            AppError::Conflict("User with this email already exists".to_string())
        }
        _ => AppError::from(e),
    }
}

#[async_trait]
impl ListSource<PublicUser> for SqlxUserRepo {
    async fn count_matching(&self, query: &ListQuery) -> Result<u64, AppError> {
        let count: i64 = listing::count_matching(TABLE, query)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn find_matching(&self, query: &ListQuery) -> Result<Vec<PublicUser>, AppError> {
        let users = listing::select_matching(TABLE, PUBLIC_COLUMNS, query)
            .build_query_as::<PublicUser>()
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}

#[async_trait]
impl ReferenceSource for SqlxUserRepo {
    async fn find_references(&self, ids: &[Uuid]) -> Result<Vec<Value>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, PublicUser>(
            "SELECT id, name, email, role, created_at FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        users
            .into_iter()
            .map(|u| serde_json::to_value(u).map_err(|e| AppError::InternalError(e.to_string())))
            .collect()
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn count_users(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<PublicUser>, AppError> {
        sqlx::query_as::<_, PublicUser>(
            "SELECT id, name, email, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn create_user(&self, user: &UserInsert) -> Result<PublicUser, AppError> {
        sqlx::query_as::<_, PublicUser>(
            r#"
            INSERT INTO users (id, name, email, role, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, role, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_email_conflict)
    }

    async fn update_user(&self, id: &Uuid, profile: &UserProfile) -> Result<Option<PublicUser>, AppError> {
        sqlx::query_as::<_, PublicUser>(
            r#"
            UPDATE users
            SET name = $2, email = $3, role = $4
            WHERE id = $1
            RETURNING id, name, email, role, created_at
            "#,
        )
        .bind(id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_email_conflict)
    }

    async fn delete_user(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
