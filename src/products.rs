//! Products

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use crate::items::ItemKey;

/// Product code, e.g. `classic` or `premium`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ProductCode {
    /// Create a product code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Return the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ItemKey for ProductCode {
    fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ProductCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for ProductCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}
