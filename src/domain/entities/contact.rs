use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::list_query::{FieldKind, FieldSpec};

pub static CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", "id", FieldKind::Uuid),
    FieldSpec::new("name", "name", FieldKind::Text),
    FieldSpec::new("email", "email", FieldKind::Text),
    FieldSpec::new("phone", "phone", FieldKind::Text),
    FieldSpec::new("message", "message", FieldKind::Text),
    FieldSpec::new("isRead", "is_read", FieldKind::Bool),
    FieldSpec::new("createdAt", "created_at", FieldKind::Timestamp),
];

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewContactForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,

    #[validate(length(max = 30, message = "Phone number cannot be longer than 30 characters"))]
    pub phone: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters"))]
    pub message: String,
}

impl NewContactForm {
    /// Trims surrounding whitespace and drops a blank phone number.
    pub fn normalized(self) -> Self {
        NewContactForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            message: self.message.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub is_read: Option<bool>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentContact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
