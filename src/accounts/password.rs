//! PBKDF2-SHA256 password credentials, kept as PHC strings.

use pbkdf2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use uuid::Uuid;

/// Rounds applied when nothing else is configured.
pub const DEFAULT_HASH_ROUNDS: u32 = 600_000;

/// A stored credential, e.g. `$pbkdf2-sha256$i=600000,l=32$<salt>$<hash>`.
///
/// The round count travels inside the string, so credentials hashed under an
/// older setting still verify after it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    phc: String,
}

impl Credential {
    /// Hashes `password` under a fresh random salt.
    pub fn hash(password: &str, rounds: u32) -> Result<Self, password_hash::Error> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())?;
        let params = Params {
            rounds,
            output_length: 32,
        };
        let phc = Pbkdf2
            .hash_password_customized(password.as_bytes(), None, None, params, &salt)?
            .to_string();
        Ok(Self { phc })
    }

    /// Checks `password` with a constant-time comparison of the derived keys.
    pub fn verify(&self, password: &str) -> bool {
        PasswordHash::new(&self.phc)
            .and_then(|parsed| Pbkdf2.verify_password(password.as_bytes(), &parsed))
            .is_ok()
    }
}
