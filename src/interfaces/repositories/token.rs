use jsonwebtoken::TokenData;
use uuid::Uuid;

use crate::{entities::{token::Claims, user::UserRole}, errors::AuthError};

pub trait TokenService: Send + Sync {
    /// Issues an access token for the given user
    fn create_jwt(&self, user_id: &Uuid, email: &str, role: UserRole) -> Result<String, AuthError>;

    /// Verifies signature and expiry, then returns the claims
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
}
