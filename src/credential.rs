//! The Deepgram API key held by a client for the lifetime of a session.
//!
//! Security notes:
//! - Never log the key value
//! - Always use masked display (`Debug` is masked too)
//! - The key is never written to disk

use std::fmt;

/// Environment variable checked for a pre-configured key.
pub const API_KEY_ENV: &str = "DEEPGRAM_API_KEY";

#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read the key from `DEEPGRAM_API_KEY`, ignoring empty values.
    pub fn from_env() -> Option<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Some(Self(key)),
            _ => None,
        }
    }

    /// The raw key, for request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Masked version of the key for display (e.g., "abc...uvwxyz")
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..3].iter().collect();
            let tail: String = chars[chars.len() - 6..].iter().collect();
            format!("{}...{}", head, tail)
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}
