use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Bearer credential held by the token cache
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Build a credential that expires `expires_in` after `issued_at`
    pub fn issued(value: impl Into<String>, issued_at: DateTime<Utc>, expires_in: Duration) -> Self {
        let lifetime = chrono::Duration::from_std(expires_in).unwrap_or(chrono::Duration::zero());
        Self::new(value, issued_at + lifetime)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// True while `now` is earlier than the expiry minus the refresh buffer
    pub fn is_usable_at(&self, now: DateTime<Utc>, refresh_buffer: Duration) -> bool {
        let buffer = chrono::Duration::from_std(refresh_buffer).unwrap_or(chrono::Duration::zero());
        now < self.expires_at - buffer
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.value)
    }

    /// Token prefix safe to print in logs and CLI output
    pub fn masked(&self) -> String {
        let prefix: String = self.value.chars().take(8).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &self.masked())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Raw token returned by a token source before it is stamped with an expiry
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub token: String,
    pub expires_in: Duration,
}

impl TokenGrant {
    pub fn new(token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            token: token.into(),
            expires_in,
        }
    }
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
