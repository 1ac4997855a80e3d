use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Argon2id work factors. Defaults follow the OWASP baseline (19 MiB, 2 passes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
        }
    }
}

/// Hash a password using Argon2id with a fresh random salt.
pub fn hash(password: &str, cost: PasswordCost) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let params = Params::new(cost.memory_kib, cost.iterations, 1, None)
        .map_err(|e| format!("Invalid params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| format!("Hashing failed: {e}"))
}

/// Verify a password against a hash. The work factors are read from the hash itself.
pub fn verify(password: &str, hash: &str) -> Result<bool, String> {
    let parsed = PasswordHash::new(hash).map_err(|e| format!("Invalid hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Run a full verification against a throwaway hash so that a login for an unknown
/// account costs the same as one with a wrong password. The hash is built on first
/// use with the process's configured cost.
pub fn verify_dummy(password: &str, cost: PasswordCost) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash("no-account-has-this-password", cost).ok());
    if let Some(dummy) = dummy {
        let _ = verify(password, dummy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHEAP: PasswordCost = PasswordCost {
        memory_kib: 1024,
        iterations: 1,
    };

    #[test]
    fn hash_never_contains_plaintext() {
        let hashed = hash("secret1", CHEAP).unwrap();
        assert!(!hashed.contains("secret1"));
        assert!(hashed.starts_with("$argon2id$"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash("secret1", CHEAP).unwrap();
        let b = hash("secret1", CHEAP).unwrap();
        assert_ne!(a, b);
        assert!(verify("secret1", &a).unwrap());
        assert!(verify("secret1", &b).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hashed = hash("secret1", CHEAP).unwrap();
        assert!(!verify("secret2", &hashed).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify("secret1", "not-a-phc-string").is_err());
    }

    #[test]
    fn rejects_impossible_cost() {
        let cost = PasswordCost {
            memory_kib: 1,
            iterations: 0,
        };
        assert!(hash("secret1", cost).is_err());
    }

    #[test]
    fn dummy_verification_completes() {
        verify_dummy("anything", CHEAP);
        verify_dummy("anything else", CHEAP);
    }
}
