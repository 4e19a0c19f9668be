use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Suffix Yahoo uses for Tokyo Stock Exchange listings.
pub const TOKYO_SUFFIX: &str = ".T";

const TOKYO_CODE_LEN: usize = 4;

/// Provider-recognized ticker symbol.
///
/// Construction goes through [`Symbol::normalize`], which rewrites bare
/// four-digit Tokyo security codes (`7203`) into Yahoo form (`7203.T`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Normalize a raw ticker. Never fails; anything that is not a bare
    /// four-digit code passes through unchanged.
    pub fn normalize(raw: &str) -> Self {
        if raw.len() == TOKYO_CODE_LEN && raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Self(format!("{raw}{TOKYO_SUFFIX}"));
        }

        Self(raw.to_owned())
    }

    /// Whether the symbol carries the Tokyo exchange suffix.
    pub fn is_tokyo_listed(&self) -> bool {
        self.0.ends_with(TOKYO_SUFFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
