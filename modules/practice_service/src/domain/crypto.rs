//! Password-based file encryption and password hashing
//!
//! Envelope layout (the only one written or read):
//! - salt: 16 bytes (PBKDF2 salt)
//! - iv: 12 bytes (AES-GCM nonce)
//! - ciphertext: AEAD output (= ciphertext + 16-byte tag)
//!
//! The password itself is never stored anywhere.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

pub const SALT_LEN: usize = 16;
pub const IV_LEN: usize = 12;
pub const TAG_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

/// Iteration count used unless configured otherwise
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Identifier recorded on encrypted document rows
pub const ENVELOPE_SCHEME: &str = "pbkdf2-sha256-aes256gcm";

const PASSWORD_HASH_PREFIX: &str = "pbkdf2-sha256";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("envelope too short: {0} bytes")]
    Truncated(usize),

    #[error("authentication failed")]
    Authentication,

    #[error("encryption failed")]
    Encryption,
}

/// Encrypts and decrypts byte buffers under a password
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeCipher {
    iterations: u32,
}

impl Default for EnvelopeCipher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl EnvelopeCipher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Encrypt `plaintext` into a fresh `salt ‖ iv ‖ ciphertext+tag` envelope
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        let mut rng = rand::rng();
        rng.fill(&mut salt);
        rng.fill(&mut iv);

        let cipher = self.cipher(password, &salt)?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext)
            .map_err(|_| CryptoError::Encryption)?;

        let mut envelope = Vec::with_capacity(SALT_LEN + IV_LEN + ciphertext.len());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&iv);
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    /// Open an envelope produced by [`EnvelopeCipher::encrypt`]
    pub fn decrypt(&self, envelope: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
        if envelope.len() < SALT_LEN + IV_LEN + TAG_LEN {
            return Err(CryptoError::Truncated(envelope.len()));
        }
        let (salt, rest) = envelope.split_at(SALT_LEN);
        let (iv, ciphertext) = rest.split_at(IV_LEN);

        let cipher = self.cipher(password, salt)?;
        cipher
            .decrypt(Nonce::from_slice(iv), ciphertext)
            .map_err(|_| CryptoError::Authentication)
    }

    fn cipher(&self, password: &str, salt: &[u8]) -> Result<Aes256Gcm, CryptoError> {
        let mut key = derive_key(password, salt, self.iterations);
        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::Encryption);
        key.zeroize();
        cipher
    }
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

/// Hash a sign-in password as `pbkdf2-sha256$<iterations>$<salt hex>$<hash hex>`
pub fn hash_password(password: &str, iterations: u32) -> String {
    let iterations = iterations.max(1);
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill(&mut salt);
    let mut hash = derive_key(password, &salt, iterations);
    let encoded = format!(
        "{}${}${}${}",
        PASSWORD_HASH_PREFIX,
        iterations,
        hex::encode(salt),
        hex::encode(hash)
    );
    hash.zeroize();
    encoded
}

/// Check a password against a hash produced by [`hash_password`]
///
/// Malformed hashes never verify.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(prefix), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if prefix != PASSWORD_HASH_PREFIX {
        return false;
    }
    let (Ok(iterations), Ok(salt), Ok(expected)) =
        (iterations.parse::<u32>(), hex::decode(salt), hex::decode(expected))
    else {
        return false;
    };
    if iterations == 0 || expected.len() != KEY_LEN {
        return false;
    }

    let mut actual = derive_key(password, &salt, iterations);
    let matches: bool = actual.as_slice().ct_eq(expected.as_slice()).into();
    actual.zeroize();
    matches
}
