use once_cell::sync::Lazy;
use thiserror::Error;
use uuid::Uuid;

pub const MIN_PASSWORD_LENGTH: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "12345678",
    "123456789",
    "1234567890",
    "password",
    "password1",
    "password123",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "welcome1",
    "admin123",
    "letmein1",
    "trustno1",
    "superman",
    "starwars",
    "passw0rd",
];

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error(transparent)]
    Argon2Error(#[from] argon2::Error),

    #[error(transparent)]
    JoinError(#[from] tokio::task::JoinError),
}

/// Hash checked when a login names no known worker, so unknown usernames cost
/// as much as wrong passwords.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("dummy-password-for-timing").ok());

fn argon2_config<'a>() -> argon2::Config<'a> {
    argon2::Config {
        variant: argon2::Variant::Argon2id,
        mem_cost: 19_456,
        time_cost: 2,
        ..argon2::Config::default()
    }
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = Uuid::new_v4();
    let hash = argon2::hash_encoded(password.as_bytes(), salt.as_bytes(), &argon2_config())?;

    Ok(hash)
}

pub fn verify_password(hash: &str, password: &str) -> Result<bool, PasswordError> {
    Ok(argon2::verify_encoded(hash, password.as_bytes())?)
}

/// Runs `hash_password` on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// Runs `verify_password` on the blocking pool.
pub async fn verify_password_blocking(
    hash: String,
    password: String,
) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&hash, &password)).await?
}

/// Burns one verification against a throwaway hash. Always rejects.
pub async fn verify_dummy_password(password: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || match DUMMY_HASH.as_deref() {
        Some(hash) => verify_password(hash, &password).map(|_| false),
        None => Ok(false),
    })
    .await?
}

/// Returns every policy the password violates. `user_attributes` are values
/// the password should not resemble (username, names, email).
pub fn password_policy_violations(password: &str, user_attributes: &[&str]) -> Vec<String> {
    let mut violations = vec![];
    let lowered = password.to_lowercase();

    for attribute in user_attributes {
        if too_similar(&lowered, &attribute.to_lowercase()) {
            violations.push("The password is too similar to your personal information.".to_string());
            break;
        }
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }

    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        violations.push("This password is too common.".to_string());
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        violations.push("This password is entirely numeric.".to_string());
    }

    violations
}

fn too_similar(password: &str, attribute: &str) -> bool {
    let attribute = attribute.split('@').next().unwrap_or_default();
    if password.is_empty() || attribute.len() < 3 {
        return false;
    }

    password.contains(attribute) || attribute.contains(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "correct horse battery").unwrap());
        assert!(!verify_password(&hash, "wrong horse battery").unwrap());
    }

    #[tokio::test]
    async fn test_blocking_hash_and_verify() {
        let hash = hash_password_blocking("correct horse battery".to_string())
            .await
            .unwrap();

        assert!(
            verify_password_blocking(hash.clone(), "correct horse battery".to_string())
                .await
                .unwrap()
        );
        assert!(
            !verify_password_blocking(hash, "wrong horse battery".to_string())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_dummy_password_never_matches() {
        assert!(DUMMY_HASH.is_some());
        assert!(
            !verify_dummy_password("dummy-password-for-timing".to_string())
                .await
                .unwrap()
        );
    }

    #[test]
    fn test_policy_accepts_strong_password() {
        let violations = password_policy_violations("pale-ocean-42", &["jdoe", "Jane", "Doe"]);

        assert!(violations.is_empty());
    }

    #[test]
    fn test_policy_rejects_short_numeric_password() {
        let violations = password_policy_violations("1234", &[]);

        assert_eq!(2, violations.len());
        assert!(violations[0].contains("too short"));
        assert!(violations[1].contains("entirely numeric"));
    }

    #[test]
    fn test_policy_rejects_common_password() {
        let violations = password_policy_violations("Password123", &[]);

        assert_eq!(vec!["This password is too common.".to_string()], violations);
    }

    #[test]
    fn test_policy_rejects_password_similar_to_username() {
        let violations =
            password_policy_violations("margaret-2024", &["margaret", "", "jane@example.com"]);

        assert_eq!(1, violations.len());
        assert!(violations[0].contains("too similar"));
    }
}
