//! Local username + password authentication
//!
//! Argon2 work runs on the blocking pool so a login burst does not stall the
//! async workers.

mod password;
mod session;

use sqlx::SqlitePool;

use crate::db::{DbError, User, UserRepo};
use crate::models::Registration;

pub use password::{hash_password, verify_password, PasswordError};
pub use session::{
    current_user_id, flash, login, logout, take_flashes, Flash, FlashLevel, SESSION_USER_ID_KEY,
};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("password task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash and store a new account. A taken username is `DbError::Conflict`.
pub async fn create_account(
    pool: &SqlitePool,
    registration: &Registration,
) -> Result<User, AuthError> {
    let password = registration.password.expose().to_owned();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let user = UserRepo::new(pool)
        .create(registration.username.as_str(), &hash)
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "account created");
    Ok(user)
}

/// The user with these credentials, or `None` for an unknown name or wrong password.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>, AuthError> {
    let Some(user) = UserRepo::new(pool).find_by_username(username.trim()).await? else {
        return Ok(None);
    };

    let hash = user.password_hash.clone();
    let password = password.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;

    Ok(valid.then_some(user))
}

/// Accept a post-login redirect only if it stays on this site.
///
/// Local absolute paths pass. Scheme-relative (`//host`) paths fail, as does
/// any whitespace, control character, backslash, quote or angle bracket.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| {
        n.starts_with('/')
            && !n.starts_with("//")
            && !n
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || "\\\"'<>".contains(c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::testing;
    use crate::models::RegisterForm;

    fn registration(username: &str, password: &str) -> Registration {
        RegisterForm {
            username: username.into(),
            password: password.into(),
            confirm_password: password.into(),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_authenticate() {
        let pool = testing::pool().await;
        let user = create_account(&pool, &registration("alice", "correct horse"))
            .await
            .unwrap();
        assert_ne!(user.password_hash, "correct horse");

        let found = authenticate(&pool, "alice", "correct horse").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn wrong_password_or_unknown_user() {
        let pool = testing::pool().await;
        create_account(&pool, &registration("alice", "correct horse"))
            .await
            .unwrap();

        assert!(authenticate(&pool, "alice", "wrong password")
            .await
            .unwrap()
            .is_none());
        assert!(authenticate(&pool, "mallory", "correct horse")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_account_conflicts() {
        let pool = testing::pool().await;
        create_account(&pool, &registration("alice", "correct horse"))
            .await
            .unwrap();

        let err = create_account(&pool, &registration("alice", "other password"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Database(DbError::Conflict { .. })));
    }

    #[test]
    fn next_must_be_local() {
        assert_eq!(safe_next(Some("/home")), Some("/home"));
        assert_eq!(safe_next(Some("/view/3?x=1")), Some("/view/3?x=1"));
        assert_eq!(safe_next(Some("https://evil.example")), None);
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        assert_eq!(safe_next(Some("/\" autofocus onfocus=\"alert(1)")), None);
        assert_eq!(safe_next(Some("/<script>")), None);
        assert_eq!(safe_next(Some("/home\n")), None);
        assert_eq!(safe_next(None), None);
    }
}
