use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::accounts::repo::Account;

/// Request body for account registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    pub age: Option<i32>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update. Unknown fields are rejected outright.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub password: Option<String>,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub account: PublicAccount,
}

/// The only account shape handed to callers: no hash, no tokens.
#[derive(Debug, Serialize)]
pub struct PublicAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Account> for PublicAccount {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            age: account.age,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
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
            age: None,
            tokens: vec!["issued.token.one".into()],
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn public_view_strips_credentials() {
        let json = serde_json::to_value(PublicAccount::from(sample_account())).expect("serialize");
        let obj = json.as_object().expect("object");
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("tokens"));
        assert_eq!(obj["email"], "ada@example.com");
    }

    #[test]
    fn update_request_rejects_unknown_fields() {
        let err = serde_json::from_str::<UpdateAccountRequest>(r#"{"height": 180}"#).unwrap_err();
        assert!(err.to_string().contains("height"));
    }
}
