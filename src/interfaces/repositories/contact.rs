use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::{
        contact::{Contact, NewContactForm, RecentContact},
        list_query::ListQuery,
    },
    errors::AppError,
    repositories::{
        listing::{self, ListSource},
        sqlx_repo::SqlxContactRepo,
    },
};

const TABLE: &str = "contacts";

#[async_trait]
pub trait ContactRepository: ListSource<Contact> + Send + Sync {
    async fn create_contact(&self, form: &NewContactForm) -> Result<Contact, AppError>;
    async fn get_contact_by_id(&self, id: &Uuid) -> Result<Option<Contact>, AppError>;
    /// Flips `is_read` only if it is still false. `None` means nothing changed.
    async fn mark_first_read(&self, id: &Uuid) -> Result<Option<Contact>, AppError>;
    /// `None` toggles the current value.
    async fn set_read(&self, id: &Uuid, is_read: Option<bool>) -> Result<Option<Contact>, AppError>;
    async fn delete_contact(&self, id: &Uuid) -> Result<bool, AppError>;
    async fn count_contacts(&self) -> Result<u64, AppError>;
    async fn count_unread_contacts(&self) -> Result<u64, AppError>;
    async fn recent_contacts(&self, limit: i64) -> Result<Vec<RecentContact>, AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactRepo { pool }
    }

    async fn count_where(&self, sql: &str) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ListSource<Contact> for SqlxContactRepo {
    async fn count_matching(&self, query: &ListQuery) -> Result<u64, AppError> {
        let count: i64 = listing::count_matching(TABLE, query)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn find_matching(&self, query: &ListQuery) -> Result<Vec<Contact>, AppError> {
        let contacts = listing::select_matching(TABLE, "*", query)
            .build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await?;

        Ok(contacts)
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_contact(&self, form: &NewContactForm) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (id, name, email, phone, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&form.name)
        .bind(&form.email)
        .bind(&form.phone)
        .bind(&form.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn get_contact_by_id(&self, id: &Uuid) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn mark_first_read(&self, id: &Uuid) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            "UPDATE contacts SET is_read = TRUE WHERE id = $1 AND is_read = FALSE RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn set_read(&self, id: &Uuid, is_read: Option<bool>) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            "UPDATE contacts SET is_read = COALESCE($2::boolean, NOT is_read) WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_read)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_contact(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_contacts(&self) -> Result<u64, AppError> {
        self.count_where("SELECT COUNT(*) FROM contacts").await
    }

    async fn count_unread_contacts(&self) -> Result<u64, AppError> {
        self.count_where("SELECT COUNT(*) FROM contacts WHERE is_read = FALSE").await
    }

    async fn recent_contacts(&self, limit: i64) -> Result<Vec<RecentContact>, AppError> {
        sqlx::query_as::<_, RecentContact>(
            r#"
            SELECT id, name, email, message, is_read, created_at
            FROM contacts
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
