//! Presigned object-storage URLs.
//!
//! The service never touches document blobs; it only mints and verifies
//! short-lived URLs against the configured storage base. Signatures are
//! HMAC-SHA256 over `method\nstorage_key\nexpires`, rendered as URL-safe
//! base64 without padding.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// How long a minted upload URL stays valid.
pub const UPLOAD_TTL_MINUTES: i64 = 15;
/// How long a minted download URL stays valid.
pub const DOWNLOAD_TTL_MINUTES: i64 = 5;

/// A minted URL plus its expiry, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PresignedUrl {
  pub url:        String,
  pub method:     String,
  pub expires_at: DateTime<Utc>,
}

/// Mints and verifies presigned URLs with one shared secret.
pub struct Signer {
  secret:   Vec<u8>,
  base_url: String,
}

impl Signer {
  pub fn new(secret: impl Into<Vec<u8>>, base_url: &str) -> Self {
    Self {
      secret:   secret.into(),
      base_url: base_url.trim_end_matches('/').to_string(),
    }
  }

  fn mac(&self) -> HmacSha256 {
    // HMAC accepts keys of any length.
    HmacSha256::new_from_slice(&self.secret).expect("hmac key")
  }

  /// Signature over `method\nstorage_key\nexpires` (unix seconds).
  pub fn sign(&self, method: &str, storage_key: &str, expires: i64) -> String {
    let mut mac = self.mac();
    mac.update(method.as_bytes());
    mac.update(b"\n");
    mac.update(storage_key.as_bytes());
    mac.update(b"\n");
    mac.update(expires.to_string().as_bytes());
    B64.encode(mac.finalize().into_bytes())
  }

  /// Constant-time signature check; expired timestamps always fail.
  pub fn verify(
    &self,
    method: &str,
    storage_key: &str,
    expires: i64,
    sig: &str,
    now: DateTime<Utc>,
  ) -> bool {
    if expires <= now.timestamp() {
      return false;
    }
    let Ok(given) = B64.decode(sig) else {
      return false;
    };
    let mut mac = self.mac();
    mac.update(method.as_bytes());
    mac.update(b"\n");
    mac.update(storage_key.as_bytes());
    mac.update(b"\n");
    mac.update(expires.to_string().as_bytes());
    mac.verify_slice(&given).is_ok()
  }

  /// Mint a URL granting `method` on `storage_key` until `now + ttl`.
  pub fn presigned_url(
    &self,
    method: &str,
    storage_key: &str,
    ttl: Duration,
    now: DateTime<Utc>,
  ) -> PresignedUrl {
    let expires_at = now + ttl;
    let expires = expires_at.timestamp();
    let sig = self.sign(method, storage_key, expires);
    PresignedUrl {
      url: format!(
        "{}/{storage_key}?method={method}&expires={expires}&sig={sig}",
        self.base_url
      ),
      method: method.to_string(),
      expires_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn signer() -> Signer {
    Signer::new(b"test-secret".to_vec(), "https://storage.example.com/")
  }

  #[test]
  fn sign_and_verify_roundtrip() {
    let s = signer();
    let now = Utc::now();
    let expires = (now + Duration::minutes(5)).timestamp();

    let sig = s.sign("GET", "org/doc/manual.pdf", expires);
    assert!(s.verify("GET", "org/doc/manual.pdf", expires, &sig, now));
  }

  #[test]
  fn tampered_key_fails() {
    let s = signer();
    let now = Utc::now();
    let expires = (now + Duration::minutes(5)).timestamp();

    let sig = s.sign("GET", "org/doc/manual.pdf", expires);
    assert!(!s.verify("GET", "org/doc/other.pdf", expires, &sig, now));
    assert!(!s.verify("PUT", "org/doc/manual.pdf", expires, &sig, now));
  }

  #[test]
  fn expired_signature_fails() {
    let s = signer();
    let now = Utc::now();
    let expires = (now - Duration::minutes(1)).timestamp();

    let sig = s.sign("GET", "org/doc/manual.pdf", expires);
    assert!(!s.verify("GET", "org/doc/manual.pdf", expires, &sig, now));
  }

  #[test]
  fn garbage_signature_fails() {
    let s = signer();
    let now = Utc::now();
    let expires = (now + Duration::minutes(5)).timestamp();

    assert!(!s.verify("GET", "org/doc/manual.pdf", expires, "!!!", now));
  }

  #[test]
  fn minted_url_contains_signature() {
    let s = signer();
    let now = Utc::now();

    let minted =
      s.presigned_url("PUT", "org/doc/manual.pdf", Duration::minutes(15), now);
    assert!(minted.url.starts_with(
      "https://storage.example.com/org/doc/manual.pdf?method=PUT&expires="
    ));
    assert!(minted.url.contains("&sig="));
    assert_eq!(minted.expires_at, now + Duration::minutes(15));
  }
}
