use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::auth::password::verify_password;
use crate::entities::token::{AuthResponse, Claims};
use crate::entities::user::{LoginUser, PublicUser};
use crate::errors::{AppError, AuthError};
use crate::repositories::{token::TokenService, user::UserRepository};

pub struct AuthHandler<R, T>
where
    R: UserRepository + ?Sized,
    T: TokenService,
{
    pub user_repo: Arc<R>,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository + ?Sized,
    T: TokenService,
{
    pub fn new(user_repo: Arc<R>, token_service: T) -> Self {
        AuthHandler { user_repo, token_service }
    }

    /// Checks the credentials and issues an access token
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let user = self.user_repo.get_user_by_email(&request.email)
            .await
            .map_err(|e| {
                tracing::error!("User lookup failed during login: {}", e);
                AuthError::WrongCredentials
            })?
            .ok_or(AuthError::WrongCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            tracing::warn!("Login rejected: wrong password");
            return Err(AuthError::WrongCredentials);
        }

        let token = self.token_service.create_jwt(&user.id, &user.email, user.role)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(AuthResponse::new(token))
    }

    /// Loads the account behind a verified token
    pub async fn current_user(&self, claims: &Claims) -> Result<PublicUser, AppError> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::UnauthorizedAccess)?;

        self.user_repo
            .get_user_by_id(&user_id)
            .await?
            .ok_or(AppError::UnauthorizedAccess)
    }
}
