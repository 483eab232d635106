#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::NormalizePath,
    web, App, Error,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mockall::mock;
use serde_json::Value;
use uuid::Uuid;

use portfolio_api::{
    auth::jwt::JwtService,
    entities::{
        contact::{Contact, NewContactForm, RecentContact},
        list_query::ListQuery,
        project::{Project, ProjectDraft, RecentProject},
        user::{PublicUser, User, UserInsert, UserProfile, UserRole},
    },
    errors::AppError,
    mail::{MailError, Mailer, OutgoingEmail},
    middlewares::{auth::AuthMiddleware, error_details::error_details},
    repositories::{
        contact::ContactRepository,
        listing::{ListSource, ReferenceSource},
        project::ProjectRepository,
        user::UserRepository,
    },
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    shared_repos::SharedRepositories,
    AppState,
};

mock! {
    pub ProjectRepo {}

    #[async_trait]
    impl ListSource<Project> for ProjectRepo {
        async fn count_matching(&self, query: &ListQuery) -> Result<u64, AppError>;
        async fn find_matching(&self, query: &ListQuery) -> Result<Vec<Project>, AppError>;
    }

    #[async_trait]
    impl ProjectRepository for ProjectRepo {
        async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, AppError>;
        async fn get_project_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError>;
        async fn update_project(&self, id: &Uuid, draft: &ProjectDraft) -> Result<Option<Project>, AppError>;
        async fn set_project_image(&self, id: &Uuid, image: &str) -> Result<Option<Project>, AppError>;
        async fn delete_project(&self, id: &Uuid) -> Result<bool, AppError>;
        async fn count_projects(&self) -> Result<u64, AppError>;
        async fn recent_projects(&self, limit: i64) -> Result<Vec<RecentProject>, AppError>;
    }
}

mock! {
    pub ContactRepo {}

    #[async_trait]
    impl ListSource<Contact> for ContactRepo {
        async fn count_matching(&self, query: &ListQuery) -> Result<u64, AppError>;
        async fn find_matching(&self, query: &ListQuery) -> Result<Vec<Contact>, AppError>;
    }

    #[async_trait]
    impl ContactRepository for ContactRepo {
        async fn create_contact(&self, form: &NewContactForm) -> Result<Contact, AppError>;
        async fn get_contact_by_id(&self, id: &Uuid) -> Result<Option<Contact>, AppError>;
        async fn mark_first_read(&self, id: &Uuid) -> Result<Option<Contact>, AppError>;
        async fn set_read(&self, id: &Uuid, is_read: Option<bool>) -> Result<Option<Contact>, AppError>;
        async fn delete_contact(&self, id: &Uuid) -> Result<bool, AppError>;
        async fn count_contacts(&self) -> Result<u64, AppError>;
        async fn count_unread_contacts(&self) -> Result<u64, AppError>;
        async fn recent_contacts(&self, limit: i64) -> Result<Vec<RecentContact>, AppError>;
    }
}

mock! {
    pub UserRepo {}

    #[async_trait]
    impl ListSource<PublicUser> for UserRepo {
        async fn count_matching(&self, query: &ListQuery) -> Result<u64, AppError>;
        async fn find_matching(&self, query: &ListQuery) -> Result<Vec<PublicUser>, AppError>;
    }

    #[async_trait]
    impl ReferenceSource for UserRepo {
        async fn find_references(&self, ids: &[Uuid]) -> Result<Vec<Value>, AppError>;
    }

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn check_connection(&self) -> Result<(), AppError>;
        async fn count_users(&self) -> Result<u64, AppError>;
        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
        async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<PublicUser>, AppError>;
        async fn create_user(&self, user: &UserInsert) -> Result<PublicUser, AppError>;
        async fn update_user(&self, id: &Uuid, profile: &UserProfile) -> Result<Option<PublicUser>, AppError>;
        async fn delete_user(&self, id: &Uuid) -> Result<bool, AppError>;
    }
}

mock! {
    pub MailService {}

    #[async_trait]
    impl Mailer for MailService {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
    }
}

pub const ADMIN_EMAIL: &str = "admin@example.com";

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio API Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: "postgres://localhost/portfolio_test".into(),
        cors_allowed_origins: vec!["*".to_string()],
        jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".into(),
        jwt_expiration_minutes: 5,
        admin_email: ADMIN_EMAIL.into(),
        mail_from: "Portfolio <noreply@example.com>".into(),
        smtp_host: None,
        smtp_port: 587,
        smtp_username: String::new(),
        smtp_password: String::new(),
        upload_dir: std::env::temp_dir().join("portfolio-test-uploads").display().to_string(),
        max_upload_bytes: 1_000_000,
        contact_rate_limit_per_hour: 5,
        trust_forwarded_for: false,
    }
}

/// Mocks with no expectations panic on any call, so each test only
/// primes the repositories it means to hit.
pub struct TestRepos {
    pub project: MockProjectRepo,
    pub contact: MockContactRepo,
    pub user: MockUserRepo,
    pub mailer: MockMailService,
}

impl TestRepos {
    pub fn new() -> Self {
        TestRepos {
            project: MockProjectRepo::new(),
            contact: MockContactRepo::new(),
            user: MockUserRepo::new(),
            mailer: MockMailService::new(),
        }
    }

    pub fn into_state(self, config: &AppConfig) -> web::Data<AppState> {
        let repos = SharedRepositories {
            project: Arc::new(self.project),
            contact: Arc::new(self.contact),
            user: Arc::new(self.user),
        };
        web::Data::new(AppState::new(config, repos, Arc::new(self.mailer)))
    }
}

pub fn build_app(
    state: web::Data<AppState>,
    expose_details: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
> {
    App::new()
        .app_data(state)
        .configure(configure_routes)
        .wrap(AuthMiddleware)
        .wrap(error_details(expose_details))
        .wrap(NormalizePath::trim())
}

pub fn bearer(role: UserRole) -> (Uuid, String) {
    let user_id = Uuid::new_v4();
    let token = JwtService::new(&test_config())
        .create_jwt(&user_id, "someone@example.com", role)
        .expect("Failed to create test token");
    (user_id, format!("Bearer {}", token))
}

pub fn admin_bearer() -> String {
    bearer(UserRole::Admin).1
}

pub fn user_bearer() -> String {
    bearer(UserRole::User).1
}

pub fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn sample_project(owner: Option<Uuid>) -> Project {
    Project {
        id: Uuid::new_v4(),
        title: "Portfolio".into(),
        description: "My personal site".into(),
        long_description: None,
        image: "no-photo.jpg".into(),
        technologies: vec!["rust".into(), "actix".into()],
        github_url: Some("https://github.com/someone/portfolio".into()),
        demo_url: None,
        featured: false,
        user_id: owner,
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn sample_contact(is_read: bool) -> Contact {
    Contact {
        id: Uuid::new_v4(),
        name: "Jane".into(),
        email: "jane@example.com".into(),
        phone: None,
        message: "Hello there".into(),
        is_read,
        created_at: fixed_time(),
    }
}

pub fn contact_from_form(form: &NewContactForm) -> Contact {
    Contact {
        id: Uuid::new_v4(),
        name: form.name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        message: form.message.clone(),
        is_read: false,
        created_at: fixed_time(),
    }
}

pub fn sample_user(role: UserRole) -> PublicUser {
    PublicUser {
        id: Uuid::new_v4(),
        name: "Jane Admin".into(),
        email: "jane@example.com".into(),
        role,
        created_at: fixed_time(),
    }
}
