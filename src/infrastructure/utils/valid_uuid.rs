use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path id. A malformed id cannot match a record, so it is reported
/// as a missing one.
pub fn valid_uuid(id: &str, resource: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| not_found(resource, id))
}

pub fn not_found(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} not found with id of {}", resource, id))
}
