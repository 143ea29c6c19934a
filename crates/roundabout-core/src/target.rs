use crate::error::RingError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const MAX_LENGTH: usize = 255;

/// A validated redirect destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetUrl(String);

impl TargetUrl {
    /// Validates that the URL is non-empty, fits the storage column and has an
    /// `http` or `https` scheme followed by a host.
    pub fn parse(url: impl Into<String>) -> Result<Self, RingError> {
        let url = url.into();

        if url.is_empty() {
            return Err(RingError::ValidationFailed(
                "target URL cannot be empty".to_string(),
            ));
        }

        if url.len() > MAX_LENGTH {
            return Err(RingError::ValidationFailed(format!(
                "target URL must be at most {} bytes, got {}",
                MAX_LENGTH,
                url.len()
            )));
        }

        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(RingError::ValidationFailed(format!(
                "target URL must have a scheme and host: {}",
                url
            )));
        };

        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(RingError::ValidationFailed(format!(
                "target URL scheme must be http or https: {}",
                scheme
            )));
        }

        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() || url.chars().any(char::is_whitespace) {
            return Err(RingError::ValidationFailed(format!(
                "target URL must have a valid host: {}",
                url
            )));
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for TargetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
