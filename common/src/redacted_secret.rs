//! Credential handling with redacted Debug output.

use crate::{ErrorLocation, RedactError};

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::Error;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A secret (e.g. a Basic-auth password) that never shows up in logs.
///
/// Deserializes from a plain string so it can sit directly in config
/// structs, but refuses to serialize.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RedactedSecret {
    inner: String,
}

impl RedactedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            inner: secret.into(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Compare against a presented value without exposing the secret.
    ///
    /// Constant-time over the contents; only the length can leak.
    pub fn matches(&self, candidate: &str) -> bool {
        self.inner.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "RedactedSecret(<empty>)")
        } else {
            write!(f, "RedactedSecret([REDACTED])")
        }
    }
}

impl fmt::Display for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for RedactedSecret {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl<'de> Deserialize<'de> for RedactedSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(RedactedSecret::new)
    }
}

// Prevent accidental serialization
impl serde::Serialize for RedactedSecret {
    #[track_caller]
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: String::from("RedactedSecret cannot be serialized"),
            location: ErrorLocation::caller(),
        }))
    }
}
