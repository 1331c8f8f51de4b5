use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Account record in the database. The credential hash and the session-token
/// sequence never leave the process through serde.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: Option<i32>,
    #[serde(skip_serializing, default)]
    pub tokens: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Account {
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password_hash, age, tokens, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password_hash, age, tokens, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        age: Option<i32>,
    ) -> Result<Account, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (name, email, password_hash, age)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, age, tokens, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(age)
        .fetch_one(db)
        .await
    }

    /// Partial update; absent fields leave their columns alone.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        age: Option<i32>,
        password_hash: Option<&str>,
    ) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                age = COALESCE($4, age),
                password_hash = COALESCE($5, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, password_hash, age, tokens, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(age)
        .bind(password_hash)
        .fetch_optional(db)
        .await
    }

    /// Append a freshly issued session token. `array_append` keeps concurrent
    /// appends from clobbering each other.
    pub async fn append_token(db: &PgPool, id: Uuid, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET tokens = array_append(tokens, $2),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAA".into(),
            age: Some(36),
            tokens: vec!["issued.token.one".into()],
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn serialized_account_never_leaks_credentials() {
        let json = serde_json::to_value(sample_account()).expect("serialize");
        let obj = json.as_object().expect("object");
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("tokens"));
        assert!(obj.contains_key("email"));
        assert!(obj.contains_key("name"));
    }
}
