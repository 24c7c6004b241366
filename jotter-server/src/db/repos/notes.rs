//! Notes repository
//!
//! Every query is scoped by user_id; a note owned by someone else is
//! indistinguishable from a missing one.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::models::{NoteBody, NoteTitle, Paginated, Pagination};

use super::DbError;

/// Note record from database
#[derive(Debug, Clone, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notes repository
pub struct NoteRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> NoteRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a note for a user.
    pub async fn create(
        &self,
        user_id: Uuid,
        title: &NoteTitle,
        body: &NoteBody,
    ) -> Result<Note, DbError> {
        let note: Note = sqlx::query_as(
            r#"
            INSERT INTO notes (user_id, title, body)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, body, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(title.as_str())
        .bind(body.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(note)
    }

    /// List a user's notes, most recently updated first.
    ///
    /// Window function for the total keeps this a single query.
    pub async fn list(&self, user_id: Uuid, page: Pagination) -> Result<Paginated<Note>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                user_id,
                title,
                body,
                created_at,
                updated_at,
                COUNT(*) OVER() AS total
            FROM notes
            WHERE user_id = $1
            ORDER BY updated_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        let total = rows.first().map(|r| r.get::<i64, _>("total")).unwrap_or(0);
        let items = rows
            .into_iter()
            .map(|r| Note {
                id: r.get("id"),
                user_id: r.get("user_id"),
                title: r.get("title"),
                body: r.get("body"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            })
            .collect();

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Get a single note by id, scoped to the user.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Note, DbError> {
        let note: Option<Note> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, body, created_at, updated_at
            FROM notes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        note.ok_or_else(|| DbError::NotFound {
            resource: "note",
            id: id.to_string(),
        })
    }

    /// Replace a note's title and body, bumping updated_at.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        title: &NoteTitle,
        body: &NoteBody,
    ) -> Result<Note, DbError> {
        let note: Option<Note> = sqlx::query_as(
            r#"
            UPDATE notes
            SET title = $3, body = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, body, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title.as_str())
        .bind(body.as_str())
        .fetch_optional(self.pool)
        .await?;

        note.ok_or_else(|| DbError::NotFound {
            resource: "note",
            id: id.to_string(),
        })
    }

    /// Delete a note, scoped to the user.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "note",
                id: id.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteBody, NoteTitle};

    async fn test_user(pool: &PgPool, email: &str) -> Uuid {
        let otp = crate::db::repos::OtpRepo::new(pool)
            .issue(email, "123456", chrono::Duration::minutes(10))
            .await
            .expect("issue");
        let token = jotter_core::rng::session_token();
        let (_, user) = crate::db::repos::SessionRepo::new(pool)
            .establish(otp.id, email, &token, chrono::Duration::days(1))
            .await
            .expect("establish");
        user.id
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn crud_roundtrip_scoped_to_user() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let owner = test_user(&pool, "notes-owner@example.com").await;
        let other = test_user(&pool, "notes-other@example.com").await;

        let repo = NoteRepo::new(&pool);
        let title = NoteTitle::new("shopping").unwrap();
        let body = NoteBody::new("milk, eggs").unwrap();

        let note = repo.create(owner, &title, &body).await.expect("create");
        assert_eq!(note.title, "shopping");

        // Owner sees it, the other user gets not-found
        assert!(repo.get(owner, note.id).await.is_ok());
        let err = repo.get(other, note.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        repo.delete(owner, note.id).await.expect("delete");
        let err = repo.delete(owner, note.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
