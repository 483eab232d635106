use std::{path::PathBuf, sync::Arc};

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, password, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, db, limiter, mail, utils};

use auth::jwt::JwtService;
use limiter::rate_limiter::RateLimiterStore;
use mail::Mailer;
use repositories::{contact::ContactRepository, project::ProjectRepository, user::UserRepository};
use settings::{AppConfig, AppEnvironment};
use shared_repos::SharedRepositories;
use use_cases::{admin::AdminHandler, auth::AuthHandler, contact::ContactHandler, projects::ProjectHandler};
use utils::uploads::UploadSettings;

pub type AppProjectHandler = ProjectHandler<dyn ProjectRepository, dyn UserRepository>;
pub type AppContactHandler = ContactHandler<dyn ContactRepository>;
pub type AppAdminHandler = AdminHandler<dyn ProjectRepository, dyn ContactRepository, dyn UserRepository>;
pub type AppAuthHandler = AuthHandler<dyn UserRepository, JwtService>;

pub struct AppState {
    pub project_handler: AppProjectHandler,
    pub contact_handler: AppContactHandler,
    pub admin_handler: AppAdminHandler,
    pub auth_handler: AppAuthHandler,
    pub environment: AppEnvironment,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, repos: SharedRepositories, mailer: Arc<dyn Mailer>) -> Self {
        let uploads = UploadSettings {
            dir: PathBuf::from(&config.upload_dir),
            max_bytes: config.max_upload_bytes,
        };

        let project_handler = ProjectHandler::new(repos.project.clone(), repos.user.clone(), uploads);

        let contact_handler = ContactHandler::new(
            repos.contact.clone(),
            mailer,
            config.admin_email.clone(),
            RateLimiterStore::per_hour(config.contact_rate_limit_per_hour),
        );

        let admin_handler = AdminHandler::new(
            repos.project.clone(),
            repos.contact.clone(),
            repos.user.clone(),
        );

        let auth_handler = AuthHandler::new(repos.user, JwtService::new(config));

        AppState {
            project_handler,
            contact_handler,
            admin_handler,
            auth_handler,
            environment: config.env.clone(),
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == AppEnvironment::Production
    }
}
