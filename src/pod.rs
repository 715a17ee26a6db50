use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{PodError, Result};

/// `IT`, three-digit distributor zone, `E`, eight-digit serial.
static POD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^IT\d{3}E\d{8}$").expect("POD pattern is a valid regex"));

/// Check a string against the POD format without building a [`PodCode`]
pub fn is_valid_pod(code: &str) -> bool {
    POD_PATTERN.is_match(code)
}

/// A delivery point code that passed format validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PodCode(String);

impl PodCode {
    pub fn parse(code: &str) -> Result<Self> {
        if is_valid_pod(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(PodError::InvalidInput(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Three-digit distributor zone following the country prefix
    pub fn zone(&self) -> &str {
        &self.0[2..5]
    }
}

impl FromStr for PodCode {
    type Err = PodError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PodCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PodCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
