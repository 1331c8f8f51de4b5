use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Content record owned by an account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: OffsetDateTime,
}

/// Storage collaborator for account-owned content. Account removal goes
/// through `delete_by_author` before the account row itself is deleted.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn create(&self, author_id: Uuid, title: &str, body: &str) -> anyhow::Result<Post>;
    async fn list_by_author(&self, author_id: Uuid) -> anyhow::Result<Vec<Post>>;
    async fn delete_by_author(&self, author_id: Uuid) -> anyhow::Result<u64>;
}

pub struct PgContentStore {
    db: PgPool,
}

impl PgContentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn create(&self, author_id: Uuid, title: &str, body: &str) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author_id, title, body)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, title, body, created_at
            "#,
        )
        .bind(author_id)
        .bind(title)
        .bind(body)
        .fetch_one(&self.db)
        .await?;
        Ok(post)
    }

    async fn list_by_author(&self, author_id: Uuid) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, title, body, created_at
            FROM posts
            WHERE author_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn delete_by_author(&self, author_id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM posts WHERE author_id = $1")
            .bind(author_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
