use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with Argon2id.
///
/// Used by operators to produce the `PAGETRACE_ADMIN_PASSWORD_HASH` value
/// and by test fixtures. The server itself only ever verifies.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash_password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against an Argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_matching_password() {
        let hash = hash_password("a sufficiently long passphrase").expect("hash");
        assert!(verify_password("a sufficiently long passphrase", &hash));
    }

    #[test]
    fn verify_rejects_wrong_password_and_garbage_hash() {
        let hash = hash_password("a sufficiently long passphrase").expect("hash");
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
