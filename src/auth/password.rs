//! Password hashing boundary.

use sha2::{Digest, Sha256};

/// Hashing strategy injected into the user service.
///
/// Stored values are self-describing (`<salt>.<digest>`, hex-encoded), so a
/// deployment can swap the strategy behind this trait without touching the
/// service layer.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> String;

    fn verify(&self, plain: &str, stored: &str) -> bool;
}

/// Salted SHA-256 hasher.
///
/// Suitable for development and tests; a production deployment substitutes
/// a key-derivation function behind the same trait.
pub struct Sha256PasswordHasher;

impl Sha256PasswordHasher {
    fn digest(salt: &[u8], plain: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(plain.as_bytes());
        hasher.finalize().into()
    }
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, plain: &str) -> String {
        let salt: [u8; 16] = rand::random();
        let digest = Self::digest(&salt, plain);
        format!("{}.{}", hex::encode(salt), hex::encode(digest))
    }

    fn verify(&self, plain: &str, stored: &str) -> bool {
        let Some((salt_hex, digest_hex)) = stored.split_once('.') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        hex::encode(Self::digest(&salt, plain)) == digest_hex
    }
}
