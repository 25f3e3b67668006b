//! Session helpers on top of tower-sessions
//!
//! The session holds the signed-in user id and a queue of one-shot flash
//! messages. Everything else about the cookie (name, SameSite, Secure) is set
//! on the layer in `http::server`.

use serde::{Deserialize, Serialize};
use tower_sessions::{session, Expiry, Session};

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

const FLASH_KEY: &str = "_flashes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// Message shown once on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Mark the session as belonging to `user_id`.
///
/// The session id is rotated first. With `remember_for` set the session
/// survives browser restarts until that much inactivity; without it the
/// cookie ends with the browser session.
pub async fn login(
    session: &Session,
    user_id: i64,
    remember_for: Option<time::Duration>,
) -> Result<(), session::Error> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, user_id).await?;
    session.set_expiry(Some(match remember_for {
        Some(duration) => Expiry::OnInactivity(duration),
        None => Expiry::OnSessionEnd,
    }));
    Ok(())
}

/// Drop all session data and delete the stored record.
pub async fn logout(session: &Session) -> Result<(), session::Error> {
    session.flush().await
}

pub async fn current_user_id(session: &Session) -> Result<Option<i64>, session::Error> {
    session.get(SESSION_USER_ID_KEY).await
}

/// Queue a flash message for the next page.
pub async fn flash(
    session: &Session,
    level: FlashLevel,
    message: impl Into<String>,
) -> Result<(), session::Error> {
    let mut queued: Vec<Flash> = session.get(FLASH_KEY).await?.unwrap_or_default();
    queued.push(Flash {
        level,
        message: message.into(),
    });
    session.insert(FLASH_KEY, queued).await
}

/// Remove and return every queued flash message.
pub async fn take_flashes(session: &Session) -> Result<Vec<Flash>, session::Error> {
    Ok(session
        .remove::<Vec<Flash>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn login_stores_user_id() {
        let session = session();
        assert_eq!(current_user_id(&session).await.unwrap(), None);

        login(&session, 7, None).await.unwrap();
        assert_eq!(current_user_id(&session).await.unwrap(), Some(7));
        assert!(matches!(session.expiry(), Some(Expiry::OnSessionEnd)));
    }

    #[tokio::test]
    async fn remember_me_extends_expiry() {
        let session = session();
        login(&session, 7, Some(time::Duration::days(30)))
            .await
            .unwrap();
        assert!(matches!(session.expiry(), Some(Expiry::OnInactivity(_))));
    }

    #[tokio::test]
    async fn logout_clears_user() {
        let session = session();
        login(&session, 7, None).await.unwrap();
        logout(&session).await.unwrap();
        assert_eq!(current_user_id(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn flashes_are_shown_once() {
        let session = session();
        flash(&session, FlashLevel::Success, "Note added").await.unwrap();
        flash(&session, FlashLevel::Error, "Oops").await.unwrap();

        let shown = take_flashes(&session).await.unwrap();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].message, "Note added");
        assert_eq!(shown[1].level, FlashLevel::Error);

        assert!(take_flashes(&session).await.unwrap().is_empty());
    }
}
