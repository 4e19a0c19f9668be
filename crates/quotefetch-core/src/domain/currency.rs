use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const CURRENCY_CODE_LEN: usize = 3;

/// Three-character currency code (`USD`, `JPY`).
///
/// Case is preserved because Yahoo distinguishes minor units (`GBp` is pence).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub const USD: &'static str = "USD";
    pub const JPY: &'static str = "JPY";

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.chars().count() != CURRENCY_CODE_LEN {
            return Err(ValidationError::InvalidCurrency {
                value: input.to_owned(),
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn usd() -> Self {
        Self(String::from(Self::USD))
    }

    pub fn jpy() -> Self {
        Self(String::from(Self::JPY))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

/// Currency pair requested in exchange-rate mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl CurrencyPair {
    /// Split a pair code such as `USDJPY`: characters 0..3 are the base
    /// currency, 3..6 the quote currency; anything after that is ignored.
    /// Codes are upper-cased but otherwise kept as sliced, spaces included.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let chars = input.chars().collect::<Vec<_>>();
        if chars.len() < CURRENCY_CODE_LEN * 2 {
            return Err(ValidationError::InvalidExchangeRatePair {
                value: input.to_owned(),
            });
        }

        let code = |range: std::ops::Range<usize>| {
            CurrencyCode(chars[range].iter().collect::<String>().to_uppercase())
        };

        Ok(Self {
            from: code(0..CURRENCY_CODE_LEN),
            to: code(CURRENCY_CODE_LEN..CURRENCY_CODE_LEN * 2),
        })
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// Concatenated code used as the fallback-table key (`USDJPY`).
    pub fn code(&self) -> String {
        format!("{}{}", self.from, self.to)
    }

    /// Yahoo currency symbol for the pair (`USDJPY=X`).
    pub fn provider_symbol(&self) -> String {
        format!("{}=X", self.code())
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}
