use std::sync::Arc;

use crate::repositories::{
    contact::ContactRepository,
    project::ProjectRepository,
    sqlx_repo::{SqlxContactRepo, SqlxProjectRepo, SqlxUserRepo},
    user::UserRepository,
};

#[derive(Clone)]
pub struct SharedRepositories {
    pub project: Arc<dyn ProjectRepository>,
    pub contact: Arc<dyn ContactRepository>,
    pub user: Arc<dyn UserRepository>,
}

impl SharedRepositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            project: Arc::new(SqlxProjectRepo::new(pool.clone())),
            contact: Arc::new(SqlxContactRepo::new(pool.clone())),
            user: Arc::new(SqlxUserRepo::new(pool)),
        }
    }
}
