//! The opaque `state` value round-tripped through the consent screen.
//!
//! Format: `<nonce>.<base64(redirect_uri)>`. The nonce is alphanumeric and the
//! standard base64 alphabet has no `.`, so the last delimiter always separates
//! the two segments.

use base64::{engine::general_purpose, Engine as _};
use rand::{distr::Alphanumeric, Rng};

pub const DELIMITER: char = '.';
pub const NONCE_LENGTH: usize = 16;

/// Liveness check only; the source does not need to be cryptographically strong.
pub fn generate_nonce(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateToken {
    nonce: String,
    redirect_uri: String,
}

impl StateToken {
    pub fn new(nonce: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            nonce: nonce.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    pub fn with_random_nonce(redirect_uri: impl Into<String>) -> Self {
        Self::new(generate_nonce(NONCE_LENGTH), redirect_uri)
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn encode(&self) -> String {
        format!(
            "{}{}{}",
            self.nonce,
            DELIMITER,
            general_purpose::STANDARD.encode(self.redirect_uri.as_bytes())
        )
    }

    /// Recovers the embedded redirect URI. Returns `None` when there is no
    /// delimiter or the trailing segment is not base64 of a UTF-8 string.
    pub fn decode_redirect_uri(raw: &str) -> Option<String> {
        let (_, encoded) = raw.rsplit_once(DELIMITER)?;
        let bytes = general_purpose::STANDARD.decode(encoded).ok()?;
        let uri = String::from_utf8(bytes).ok()?;
        if uri.is_empty() {
            return None;
        }
        Some(uri)
    }
}
