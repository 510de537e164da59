//! Access tokens issued by the identity backend.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

/// Bearer token text. Zeroed on drop and redacted from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap raw token text.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Token text for the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Token issued for a tenant's service account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDetails {
    /// Bearer token.
    pub access_token: AccessToken,
    /// Token type, normally `Bearer`.
    pub token_type: String,
    /// Lifetime in seconds reported by the issuer.
    pub expires_in: u64,
    /// Refresh-token lifetime in seconds; zero when none was issued.
    pub refresh_expires_in: u64,
    /// Granted scopes.
    pub scope: Option<String>,
    /// Absolute expiry computed when the token was received.
    pub expires_at: DateTime<Utc>,
}

impl TokenDetails {
    /// Whether the token is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose())
    }
}
