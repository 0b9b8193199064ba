use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, Secret};

/// Plaintext password as received from a login request. Redacted in `Debug`.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// PHC-formatted Argon2 hash, as stored in `users.password`.
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(PasswordHashString::new(password_hash))
}

/// Check a plaintext password against a stored hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(
    password: &Password,
    password_hash: &PasswordHashString,
) -> Result<bool, anyhow::Error> {
    let parsed_hash = PasswordHash::new(password_hash.as_str())
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.expose().as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_phc_formatted() {
        let hash = hash_password(&Password::new("321dsa".to_string())).unwrap();
        assert!(hash.as_str().starts_with("$argon2"));
    }

    #[test]
    fn test_verify_matches_only_original_password() {
        let password = Password::new("321dsa".to_string());
        let hash = hash_password(&password).unwrap();

        assert!(verify_password(&password, &hash).unwrap());
        assert!(!verify_password(&Password::new("wrong".to_string()), &hash).unwrap());
    }

    #[test]
    fn test_same_password_salted_differently() {
        let password = Password::new("321dsa".to_string());
        let first = hash_password(&password).unwrap();
        let second = hash_password(&password).unwrap();

        assert_ne!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        let hash = PasswordHashString::new("plaintext".to_string());
        assert!(verify_password(&Password::new("plaintext".to_string()), &hash).is_err());
    }

    #[test]
    fn test_debug_redacts_plaintext() {
        let rendered = format!("{:?}", Password::new("321dsa".to_string()));
        assert!(!rendered.contains("321dsa"));
    }
}
