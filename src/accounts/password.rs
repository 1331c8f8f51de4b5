use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::error;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// A value that parses as a PHC string is already a stored hash.
pub fn is_hashed(value: &str) -> bool {
    PasswordHash::new(value).is_ok()
}

/// Hash a plaintext password; pass an already-hashed value through untouched
/// so a stored hash is never hashed a second time.
pub fn ensure_hashed(value: &str) -> anyhow::Result<String> {
    if is_hashed(value) {
        return Ok(value.to_string());
    }
    hash_password(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "secret1";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn plaintext_is_not_mistaken_for_a_hash() {
        assert!(!is_hashed("secret1"));
        let hash = hash_password("secret1").expect("hashing should succeed");
        assert!(is_hashed(&hash));
    }

    #[test]
    fn ensure_hashed_never_rehashes() {
        let hash = ensure_hashed("secret1").expect("first pass hashes");
        let again = ensure_hashed(&hash).expect("second pass is a no-op");
        assert_eq!(hash, again);
        assert!(verify_password("secret1", &again).expect("still verifies"));
    }
}
