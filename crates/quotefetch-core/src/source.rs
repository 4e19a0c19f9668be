use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Canonical provider identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Yahoo,
}

impl ProviderId {
    pub const ALL: [Self; 1] = [Self::Yahoo];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
        }
    }

    /// Human-readable name reported as an exchange-rate `source`.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Yahoo => "Yahoo Finance",
        }
    }

    pub fn from_display_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.display_name() == value)
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_round_trips() {
        for provider in ProviderId::ALL {
            assert_eq!(
                ProviderId::from_display_name(provider.display_name()),
                Some(provider)
            );
        }
        assert_eq!(ProviderId::from_display_name("Direct"), None);
    }
}
