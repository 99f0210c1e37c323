//! HTTP Basic Auth credentials.
//!
//! The Mercato API authenticates with the consumer key as the user name and
//! the consumer secret as the password:
//!
//! ```text
//! Authorization: Basic base64("{consumer_key}:{consumer_secret}")
//! ```

use std::fmt;

const BASIC_PREFIX: &str = "Basic ";

/// A Basic Auth credential pair.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Full `Authorization` header value, e.g. `Basic Y2tfdGVzdDpjc190ZXN0`.
    pub fn header_value(&self) -> String {
        let pair = format!("{}:{}", self.username, self.password);
        format!(
            "{BASIC_PREFIX}{}",
            fast32::base64::RFC4648.encode(pair.as_bytes())
        )
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
