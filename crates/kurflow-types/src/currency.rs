//! Currency definitions.

use serde::{Deserialize, Serialize};

/// A foreign currency quoted in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Three-letter code (e.g., "USD").
    code: String,
    /// English name (e.g., "US Dollar").
    name: String,
    /// Turkish name as published in the feed (e.g., "ABD DOLARI").
    local_name: String,
}

impl Currency {
    /// Creates a new currency. The code is stored upper-cased.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into().trim().to_uppercase(),
            name: name.into(),
            local_name: local_name.into(),
        }
    }

    /// Returns the currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the English name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the Turkish name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}
