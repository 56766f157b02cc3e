//! Time-limited download URLs for stored objects
//!
//! `{base}/storage/{key}?expires=<unix seconds>&signature=<hex>` where the
//! signature is SHA-256 over the server secret, the object key and the expiry.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signed URL has expired")]
    Expired,

    #[error("signed URL signature does not match")]
    Mismatch,
}

pub struct SignedUrlSigner {
    secret: Vec<u8>,
    base_url: String,
    ttl: Duration,
}

impl SignedUrlSigner {
    pub fn new(secret: impl Into<Vec<u8>>, base_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ttl,
        }
    }

    pub fn sign(&self, key: &str, now: DateTime<Utc>) -> SignedUrl {
        let expires_at = now + self.ttl;
        let expires = expires_at.timestamp();
        SignedUrl {
            url: format!(
                "{}/storage/{}?expires={}&signature={}",
                self.base_url,
                key,
                expires,
                self.signature(key, expires)
            ),
            expires_at,
        }
    }

    pub fn verify(
        &self,
        key: &str,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SignatureError> {
        let expected = self.signature(key, expires);
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return Err(SignatureError::Mismatch);
        }
        if now.timestamp() > expires {
            return Err(SignatureError::Expired);
        }
        Ok(())
    }

    fn signature(&self, key: &str, expires: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(b"\n");
        hasher.update(key.as_bytes());
        hasher.update(b"\n");
        hasher.update(expires.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SignedUrlSigner {
        SignedUrlSigner::new("test-secret", "http://localhost:8080/", Duration::minutes(5))
    }

    fn parse(url: &str) -> (String, i64, String) {
        let rest = url.strip_prefix("http://localhost:8080/storage/").unwrap();
        let (key, query) = rest.split_once('?').unwrap();
        let mut expires = 0;
        let mut signature = String::new();
        for pair in query.split('&') {
            match pair.split_once('=').unwrap() {
                ("expires", v) => expires = v.parse().unwrap(),
                ("signature", v) => signature = v.to_string(),
                _ => {}
            }
        }
        (key.to_string(), expires, signature)
    }

    #[test]
    fn test_signed_url_verifies_until_expiry() {
        let now = Utc::now();
        let signed = signer().sign("owner/abc-peticao.pdf", now);
        let (key, expires, signature) = parse(&signed.url);

        assert_eq!(key, "owner/abc-peticao.pdf");
        assert_eq!(expires, signed.expires_at.timestamp());
        assert!(signer().verify(&key, expires, &signature, now).is_ok());
        assert_eq!(
            signer().verify(&key, expires, &signature, now + Duration::minutes(6)),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn test_tampered_url_is_rejected() {
        let now = Utc::now();
        let signed = signer().sign("owner/a.pdf", now);
        let (key, expires, signature) = parse(&signed.url);

        assert_eq!(
            signer().verify("owner/b.pdf", expires, &signature, now),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            signer().verify(&key, expires + 3600, &signature, now),
            Err(SignatureError::Mismatch)
        );
        let other = SignedUrlSigner::new("other", "http://localhost:8080", Duration::minutes(5));
        assert_eq!(
            other.verify(&key, expires, &signature, now),
            Err(SignatureError::Mismatch)
        );
    }
}
