//! Webhook signature verification.
//!
//! The control plane signs every webhook body with HMAC-SHA512 keyed by the
//! shared secret and sends the lowercase hex digest in `X-TFC-Task-Signature`.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::AuthError;

type HmacSha512 = Hmac<Sha512>;

/// Verifies inbound webhook bodies against a shared secret.
///
/// A verifier built without a secret accepts everything. That mode exists
/// for local testing only and announces itself with a warning on creation.
#[derive(Clone)]
pub struct SignatureVerifier {
    mac: Option<HmacSha512>,
}

impl SignatureVerifier {
    /// Build a verifier; `None` or an empty secret disables verification.
    pub fn new(secret: Option<&str>) -> Result<Self, AuthError> {
        let mac = match secret.filter(|s| !s.is_empty()) {
            Some(secret) => Some(
                HmacSha512::new_from_slice(secret.as_bytes()).map_err(|_| AuthError::InvalidKey)?,
            ),
            None => {
                warn!("HMAC_KEY not set: webhook signature verification is DISABLED");
                None
            }
        };

        Ok(Self { mac })
    }

    pub fn is_enabled(&self) -> bool {
        self.mac.is_some()
    }

    /// Lowercase hex HMAC-SHA512 of `body`; `None` when verification is off.
    pub fn sign(&self, body: &[u8]) -> Option<String> {
        let mut mac = self.mac.clone()?;
        mac.update(body);
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    /// Check `signature` against the HMAC of the exact raw `body`.
    pub fn verify(&self, body: &[u8], signature: &str) -> bool {
        match self.sign(body) {
            Some(expected) => expected.as_bytes().ct_eq(signature.as_bytes()).into(),
            None => true,
        }
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
