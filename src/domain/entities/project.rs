use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::{
    list_query::{FieldKind, FieldSpec, Population},
    option_fields::PatchString,
};

// ───── Constants ──────────────────────────────────────────────────────
pub const DEFAULT_IMAGE: &str = "no-photo.jpg";
const MAX_TITLE_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 500;

pub static PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", "id", FieldKind::Uuid),
    FieldSpec::new("title", "title", FieldKind::Text),
    FieldSpec::new("description", "description", FieldKind::Text),
    FieldSpec::new("longDescription", "long_description", FieldKind::Text),
    FieldSpec::new("image", "image", FieldKind::Text),
    FieldSpec::new("technologies", "technologies", FieldKind::TextList),
    FieldSpec::new("githubUrl", "github_url", FieldKind::Text),
    FieldSpec::new("demoUrl", "demo_url", FieldKind::Text),
    FieldSpec::new("featured", "featured", FieldKind::Bool),
    FieldSpec::new("user", "user_id", FieldKind::Uuid),
    FieldSpec::new("createdAt", "created_at", FieldKind::Timestamp),
    FieldSpec::new("updatedAt", "updated_at", FieldKind::Timestamp),
];

/// Project lists resolve the owning user to its public name and email.
pub static PROJECT_OWNER: Population = Population {
    path: "user",
    select: &["name", "email"],
};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub image: String,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub featured: bool,
    #[serde(rename = "user")]
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The full, validated set of writable columns. Both inserts and updates go
/// through a draft so that every mutation is checked against the same rules.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProjectDraft {
    #[validate(custom(function = "validate_title"))]
    pub title: String,

    #[validate(custom(function = "validate_description"))]
    pub description: String,

    pub long_description: Option<String>,

    #[validate(length(min = 1, message = "Image cannot be empty"))]
    pub image: String,

    #[validate(custom(function = "validate_technologies"))]
    pub technologies: Vec<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub demo_url: Option<String>,

    pub featured: bool,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentProject {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

// ───── Input Requests ───────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub long_description: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: PatchString,
    pub image: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub github_url: PatchString,
    pub demo_url: PatchString,
    pub featured: Option<bool>,
}

impl ProjectDraft {
    pub fn from_request(request: NewProjectRequest, owner: Option<Uuid>) -> Self {
        ProjectDraft {
            title: request.title.trim().to_string(),
            description: request.description,
            long_description: request.long_description,
            image: request.image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            technologies: request.technologies,
            github_url: request.github_url,
            demo_url: request.demo_url,
            featured: request.featured,
            user_id: owner,
        }
    }

    /// Merges the provided fields over the current ones.
    pub fn merge(self, patch: UpdateProjectRequest) -> Self {
        ProjectDraft {
            title: patch.title.map(|t| t.trim().to_string()).unwrap_or(self.title),
            description: patch.description.unwrap_or(self.description),
            long_description: patch.long_description.apply_to(self.long_description),
            image: patch.image.unwrap_or(self.image),
            technologies: patch.technologies.unwrap_or(self.technologies),
            github_url: patch.github_url.apply_to(self.github_url),
            demo_url: patch.demo_url.apply_to(self.demo_url),
            featured: patch.featured.unwrap_or(self.featured),
            user_id: self.user_id,
        }
    }
}

impl From<Project> for ProjectDraft {
    fn from(project: Project) -> Self {
        ProjectDraft {
            title: project.title,
            description: project.description,
            long_description: project.long_description,
            image: project.image,
            technologies: project.technologies,
            github_url: project.github_url,
            demo_url: project.demo_url,
            featured: project.featured,
            user_id: project.user_id,
        }
    }
}

// ───── Validation Helpers ───────────────────────────────────────────

fn new_validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(new_validation_error("title_required", "Please add a title"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(new_validation_error("title_length", "Title cannot be more than 100 characters"));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(new_validation_error("description_required", "Please add a description"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(new_validation_error(
            "description_length",
            "Description cannot be more than 500 characters",
        ));
    }
    Ok(())
}

pub fn validate_technologies(technologies: &Vec<String>) -> Result<(), ValidationError> {
    if technologies.iter().all(|t| t.trim().is_empty()) {
        return Err(new_validation_error("technologies_empty", "Please add at least one technology"));
    }
    if technologies.iter().any(|t| t.trim().is_empty()) {
        return Err(new_validation_error("technology_blank", "Technologies cannot contain blank entries"));
    }
    Ok(())
}

pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => Ok(()),
        Ok(_) | Err(_) => Err(new_validation_error("invalid_url", "Please use a valid URL with HTTP or HTTPS")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewProjectRequest {
        NewProjectRequest {
            title: "  Portfolio  ".into(),
            description: "A site".into(),
            long_description: None,
            image: None,
            technologies: vec!["rust".into()],
            github_url: Some("https://github.com/me/portfolio".into()),
            demo_url: None,
            featured: false,
        }
    }

    #[test]
    fn draft_applies_defaults_and_trims_title() {
        let draft = ProjectDraft::from_request(request(), None);
        assert_eq!(draft.title, "Portfolio");
        assert_eq!(draft.image, DEFAULT_IMAGE);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn empty_technologies_fail_validation() {
        let mut req = request();
        req.technologies.clear();
        let errors = ProjectDraft::from_request(req, None).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("technologies"));
    }

    #[test]
    fn title_and_description_limits() {
        let mut req = request();
        req.title = "x".repeat(101);
        req.description = "y".repeat(501);
        let errors = ProjectDraft::from_request(req, None).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn urls_must_be_http_or_https() {
        assert!(validate_http_url("https://example.com/a?b=c").is_ok());
        assert!(validate_http_url("http://localhost:3000").is_ok());
        assert!(validate_http_url("ftp://example.com").is_err());
        assert!(validate_http_url("not a url").is_err());
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let draft = ProjectDraft::from_request(request(), Some(Uuid::new_v4()));
        let patch: UpdateProjectRequest =
            serde_json::from_str(r#"{"featured": true, "githubUrl": null, "demoUrl": "https://demo.dev"}"#).unwrap();

        let merged = draft.clone().merge(patch);

        assert_eq!(merged.title, draft.title);
        assert_eq!(merged.technologies, draft.technologies);
        assert_eq!(merged.user_id, draft.user_id);
        assert!(merged.featured);
        assert_eq!(merged.github_url, None);
        assert_eq!(merged.demo_url.as_deref(), Some("https://demo.dev"));
    }
}
