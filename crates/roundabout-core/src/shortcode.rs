use crate::error::RingError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A validated, case-sensitive shortcode naming one entry of the ring.
///
/// Shortcodes are 1-50 characters long and contain only ASCII alphanumeric
/// characters, dots, hyphens, or underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

pub const MIN_LENGTH: usize = 1;
pub const MAX_LENGTH: usize = 50;

/// Path of the public redirect endpoint.
pub const GHOST_PATH: &str = "/rock";
/// Query parameter carrying the shortcode on the redirect endpoint.
pub const GHOST_PARAM: &str = "on";

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl Into<String>) -> std::result::Result<Self, RingError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for values read back from storage, which were validated
    /// on the way in.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the public redirect URL of this shortcode under `base_url`.
    pub fn ghost_url(&self, base_url: &str) -> String {
        format!(
            "{}{}?{}={}",
            base_url.trim_end_matches('/'),
            GHOST_PATH,
            GHOST_PARAM,
            self.0
        )
    }

    /// Returns the shortcode as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> std::result::Result<(), RingError> {
        let len = code.chars().count();
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&len) {
            return Err(RingError::ValidationFailed(format!(
                "shortcode length must be between {} and {}, got {}",
                MIN_LENGTH, MAX_LENGTH, len
            )));
        }

        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(RingError::ValidationFailed(format!(
                "shortcode may only contain [A-Za-z0-9._-]: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
