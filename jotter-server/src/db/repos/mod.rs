//! Repository implementations for database access
//!
//! Each repository borrows the pool and exposes one method per statement.
//! Missing rows come back as `DbError::NotFound`, constraint clashes as
//! `DbError::Conflict`.

pub mod notes;
pub mod users;

pub use notes::{Note, NoteRepo, Owner};
pub use users::{User, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{value}' already exists")]
    Conflict { resource: &'static str, value: String },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::SqlitePool;

    use crate::db::{create_pool_with_options, migrations};

    /// Fresh in-memory database with the schema applied.
    pub async fn pool() -> SqlitePool {
        let pool = create_pool_with_options("sqlite::memory:", 1)
            .await
            .expect("in-memory pool");
        migrations::run(&pool).await.expect("migrations");
        pool
    }
}
