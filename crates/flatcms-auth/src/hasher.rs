use std::sync::OnceLock;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use tracing::warn;

use crate::error::{CredentialError, CredentialResult};

/// Salted argon2id password hasher.
///
/// Produces PHC strings (`$argon2id$v=19$...`) that embed their own salt
/// and parameters, so verification needs nothing but the stored string.
#[derive(Clone, Default)]
pub struct CredentialHasher {
    argon: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> CredentialResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }

    /// Check `password` against a stored PHC string.
    ///
    /// An unparseable stored hash never matches.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => self
                .argon
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!(error = %e, "stored password hash is unparseable");
                false
            }
        }
    }

    /// Burn one verification against a throwaway hash.
    ///
    /// Used when the username is unknown so that a miss costs as much as a
    /// wrong password.
    pub fn verify_dummy(&self, password: &str) {
        static DUMMY: OnceLock<Option<String>> = OnceLock::new();
        let dummy = DUMMY.get_or_init(|| self.hash("flatcms-dummy-password").ok());
        if let Some(stored) = dummy {
            let _ = self.verify(password, stored);
        }
    }
}
