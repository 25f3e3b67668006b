//! Note repository
//!
//! Every statement is scoped by [`Owner`]: single-user notes have no owner,
//! multi-user notes belong to the account that wrote them. A note outside the
//! caller's scope is indistinguishable from a missing one.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Row, SqlitePool};

use super::DbError;
use crate::models::{NoteInput, NoteTitle, Paginated, Pagination};

/// Whose notes a query may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// Single-user mode: notes without an account
    Nobody,
    /// Multi-user mode: notes of one account
    User(i64),
}

impl Owner {
    /// Value bound against `notes.user_id` (compared with `IS`, so NULL matches NULL).
    fn user_id(self) -> Option<i64> {
        match self {
            Self::Nobody => None,
            Self::User(id) => Some(id),
        }
    }
}

/// Note record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Note {
    pub id: i64,
    pub title: Option<String>,
    pub content: String,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Note repository
pub struct NoteRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NoteRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a note stamped with the current time.
    pub async fn create(&self, owner: Owner, input: &NoteInput) -> Result<Note, DbError> {
        let note: Note = sqlx::query_as(
            r#"
            INSERT INTO notes (title, content, user_id, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, content, user_id, created_at
            "#,
        )
        .bind(input.title.as_ref().map(NoteTitle::as_str))
        .bind(input.content.as_str())
        .bind(owner.user_id())
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(note)
    }

    /// List notes oldest first, with the total count in the same query.
    pub async fn list(&self, owner: Owner, page: Pagination) -> Result<Paginated<Note>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, user_id, created_at, COUNT(*) OVER() AS total
            FROM notes
            WHERE user_id IS ?
            ORDER BY created_at ASC, id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(owner.user_id())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            // past the last page the window count is gone with the rows
            None if page.offset() > 0 => self.count(owner).await?,
            None => 0,
        };

        let items = rows
            .iter()
            .map(Note::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    pub async fn count(&self, owner: Owner) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes WHERE user_id IS ?")
            .bind(owner.user_id())
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Get a single note by ID.
    pub async fn get(&self, owner: Owner, id: i64) -> Result<Note, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, title, content, user_id, created_at
            FROM notes
            WHERE id = ? AND user_id IS ?
            "#,
        )
        .bind(id)
        .bind(owner.user_id())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("note", id))
    }

    /// Replace title and content; the creation time is kept.
    pub async fn update(&self, owner: Owner, id: i64, input: &NoteInput) -> Result<Note, DbError> {
        sqlx::query_as(
            r#"
            UPDATE notes
            SET title = ?, content = ?
            WHERE id = ? AND user_id IS ?
            RETURNING id, title, content, user_id, created_at
            "#,
        )
        .bind(input.title.as_ref().map(NoteTitle::as_str))
        .bind(input.content.as_str())
        .bind(id)
        .bind(owner.user_id())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("note", id))
    }

    pub async fn delete(&self, owner: Owner, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id IS ?")
            .bind(id)
            .bind(owner.user_id())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("note", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::testing;
    use crate::db::UserRepo;
    use crate::models::{NoteContent, NoteTitle};

    fn input(title: Option<&str>, content: &str) -> NoteInput {
        NoteInput {
            title: title.and_then(|t| NoteTitle::parse(t).unwrap()),
            content: NoteContent::new(content).unwrap(),
        }
    }

    #[tokio::test]
    async fn create_then_list_oldest_first() {
        let pool = testing::pool().await;
        let repo = NoteRepo::new(&pool);

        let first = repo.create(Owner::Nobody, &input(None, "first")).await.unwrap();
        let second = repo.create(Owner::Nobody, &input(None, "second")).await.unwrap();

        let listing = repo.list(Owner::Nobody, Pagination::default()).await.unwrap();
        assert_eq!(listing.total, 2);
        assert_eq!(listing.items, vec![first, second]);
    }

    #[tokio::test]
    async fn pagination_keeps_total_past_last_page() {
        let pool = testing::pool().await;
        let repo = NoteRepo::new(&pool);
        for i in 0..3 {
            repo.create(Owner::Nobody, &input(None, &format!("note {i}")))
                .await
                .unwrap();
        }

        let page = repo.list(Owner::Nobody, Pagination::new(2, 2)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 3);

        let beyond = repo.list(Owner::Nobody, Pagination::new(5, 2)).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 3);
    }

    #[tokio::test]
    async fn update_keeps_created_at() {
        let pool = testing::pool().await;
        let repo = NoteRepo::new(&pool);
        let note = repo.create(Owner::Nobody, &input(None, "draft")).await.unwrap();

        let updated = repo
            .update(Owner::Nobody, note.id, &input(Some("Title"), "final"))
            .await
            .unwrap();

        assert_eq!(updated.content, "final");
        assert_eq!(updated.title.as_deref(), Some("Title"));
        assert_eq!(updated.created_at, note.created_at);
    }

    #[tokio::test]
    async fn missing_note_is_not_found() {
        let pool = testing::pool().await;
        let repo = NoteRepo::new(&pool);

        assert!(matches!(
            repo.get(Owner::Nobody, 42).await,
            Err(DbError::NotFound { resource: "note", .. })
        ));
        assert!(matches!(
            repo.delete(Owner::Nobody, 42).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.update(Owner::Nobody, 42, &input(None, "x")).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn owners_are_isolated() {
        let pool = testing::pool().await;
        let users = UserRepo::new(&pool);
        let alice = users.create("alice", "hash-a").await.unwrap();
        let bob = users.create("bobby", "hash-b").await.unwrap();
        let repo = NoteRepo::new(&pool);

        let note = repo
            .create(Owner::User(alice.id), &input(Some("private"), "alice only"))
            .await
            .unwrap();
        repo.create(Owner::Nobody, &input(None, "shared")).await.unwrap();

        assert!(repo.get(Owner::User(alice.id), note.id).await.is_ok());
        assert!(repo.get(Owner::User(bob.id), note.id).await.is_err());
        assert!(repo.get(Owner::Nobody, note.id).await.is_err());
        assert!(repo.delete(Owner::User(bob.id), note.id).await.is_err());

        assert_eq!(repo.count(Owner::User(alice.id)).await.unwrap(), 1);
        assert_eq!(repo.count(Owner::User(bob.id)).await.unwrap(), 0);
        assert_eq!(repo.count(Owner::Nobody).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_removes_note() {
        let pool = testing::pool().await;
        let repo = NoteRepo::new(&pool);
        let note = repo.create(Owner::Nobody, &input(None, "bye")).await.unwrap();

        repo.delete(Owner::Nobody, note.id).await.unwrap();
        assert_eq!(repo.count(Owner::Nobody).await.unwrap(), 0);
    }
}
