use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    accounts::{
        dto::{RegisterRequest, UpdateAccountRequest},
        jwt::SessionKeys,
        password,
        repo::Account,
        validate,
    },
    error::{AppError, AuthError, ValidationError},
    posts::store::ContentStore,
};

/// Validated registration input, name defaulted and email normalized.
#[derive(Debug)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: Option<i32>,
}

/// Field checks plus the application-level uniqueness pre-check. The unique
/// index on `accounts.email` remains the authoritative guard underneath.
pub async fn validate_registration(
    db: &PgPool,
    req: &RegisterRequest,
) -> Result<NewAccount, AppError> {
    let name = validate::validate_name(req.name.as_deref())?;
    let email = validate::validate_email(&req.email)?;
    validate::validate_password(&req.password)?;
    let age = validate::validate_age(req.age)?;

    if Account::find_by_email(db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ValidationError::new("email", "is already registered").into());
    }

    Ok(NewAccount {
        name,
        email,
        password: req.password.clone(),
        age,
    })
}

/// Runs ahead of every account write. Hashes only when the caller supplied a
/// new password value; a value that is already a hash passes through
/// untouched, so unrelated updates never re-hash.
pub fn before_persist(password: Option<&str>) -> Result<Option<String>, AppError> {
    match password {
        Some(plain) => Ok(Some(password::ensure_hashed(plain)?)),
        None => Ok(None),
    }
}

/// Runs ahead of account removal: owned content goes first, and any failure
/// there aborts the removal so no content is orphaned.
pub async fn before_delete(content: &dyn ContentStore, account_id: Uuid) -> Result<(), AppError> {
    let removed = content.delete_by_author(account_id).await?;
    debug!(account_id = %account_id, removed, "owned content deleted");
    Ok(())
}

pub async fn register(db: &PgPool, req: RegisterRequest) -> Result<Account, AppError> {
    let new_account = validate_registration(db, &req).await?;
    let password_hash = before_persist(Some(&new_account.password))?
        .expect("before_persist hashes a supplied password");
    let account = Account::create(
        db,
        &new_account.name,
        &new_account.email,
        &password_hash,
        new_account.age,
    )
    .await?;
    info!(account_id = %account.id, email = %account.email, "account registered");
    Ok(account)
}

/// Looks the account up by email and checks the plaintext against the stored
/// hash. Unknown email and wrong password stay distinct error kinds.
pub async fn authenticate(db: &PgPool, email: &str, password: &str) -> Result<Account, AppError> {
    let email = email.trim().to_lowercase();
    let account = Account::find_by_email(db, &email)
        .await?
        .ok_or(AuthError::NotFound)?;
    if !password::verify_password(password, &account.password_hash)? {
        warn!(account_id = %account.id, "login with invalid password");
        return Err(AuthError::InvalidCredential.into());
    }
    Ok(account)
}

/// Mints a session token for an authenticated account, appends it to the
/// account's token sequence, and returns the raw string. This is the only
/// point where the raw token is observable.
pub async fn issue_session(
    db: &PgPool,
    keys: &SessionKeys,
    account: &Account,
) -> Result<String, AppError> {
    let token = keys.sign(account.id)?;
    Account::append_token(db, account.id, &token).await?;
    info!(account_id = %account.id, "session token issued");
    Ok(token)
}

pub async fn update_account(
    db: &PgPool,
    id: Uuid,
    req: UpdateAccountRequest,
) -> Result<Account, AppError> {
    let name = match req.name.as_deref() {
        Some(n) => Some(validate::validate_name(Some(n))?),
        None => None,
    };
    let email = match req.email.as_deref() {
        Some(e) => Some(validate::validate_email(e)?),
        None => None,
    };
    let age = validate::validate_age(req.age)?;
    if let Some(plain) = req.password.as_deref() {
        validate::validate_password(plain)?;
    }
    let password_hash = before_persist(req.password.as_deref())?;

    let account = Account::update(
        db,
        id,
        name.as_deref(),
        email.as_deref(),
        age,
        password_hash.as_deref(),
    )
    .await?
    .ok_or(AuthError::NotFound)?;
    info!(account_id = %account.id, "account updated");
    Ok(account)
}

pub async fn remove_account(
    db: &PgPool,
    content: &dyn ContentStore,
    id: Uuid,
) -> Result<(), AppError> {
    before_delete(content, id).await?;
    let deleted = Account::delete(db, id).await?;
    if deleted == 0 {
        return Err(AuthError::NotFound.into());
    }
    info!(account_id = %id, "account deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::store::Post;
    use async_trait::async_trait;

    #[test]
    fn before_persist_hashes_fresh_plaintext() {
        let hashed = before_persist(Some("secret1"))
            .expect("hashing succeeds")
            .expect("value present");
        assert_ne!(hashed, "secret1");
        assert!(password::verify_password("secret1", &hashed).expect("verifies"));
    }

    #[test]
    fn before_persist_leaves_existing_hash_alone() {
        let hashed = password::hash_password("secret1").expect("hash");
        let again = before_persist(Some(&hashed))
            .expect("no-op succeeds")
            .expect("value present");
        assert_eq!(hashed, again);
    }

    #[test]
    fn before_persist_skips_untouched_password() {
        assert!(before_persist(None).expect("ok").is_none());
    }

    struct FailingContentStore;

    #[async_trait]
    impl ContentStore for FailingContentStore {
        async fn create(&self, _: Uuid, _: &str, _: &str) -> anyhow::Result<Post> {
            anyhow::bail!("content store down")
        }
        async fn list_by_author(&self, _: Uuid) -> anyhow::Result<Vec<Post>> {
            anyhow::bail!("content store down")
        }
        async fn delete_by_author(&self, _: Uuid) -> anyhow::Result<u64> {
            anyhow::bail!("content store down")
        }
    }

    #[tokio::test]
    async fn failed_content_cascade_aborts_account_removal() {
        let state = crate::state::AppState::fake();
        let err = remove_account(&state.db, &FailingContentStore, Uuid::new_v4())
            .await
            .expect_err("cascade failure must abort");
        assert!(err.to_string().contains("content store down"));
    }
}
