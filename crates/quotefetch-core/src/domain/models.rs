use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{CurrencyCode, ProviderId, Symbol, UtcDateTime};

/// Normalized last-close quote for one symbol.
///
/// Field names follow the JSON contract consumed by callers (`longName`,
/// `quoteType`), which predates this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub ticker: Symbol,
    pub name: String,
    pub price: f64,
    pub currency: CurrencyCode,
    pub long_name: String,
    pub short_name: String,
    pub exchange: String,
    pub quote_type: String,
    pub timestamp: UtcDateTime,
}

/// Placeholder entry for a symbol that could not be priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteErrorEntry {
    pub ticker: Symbol,
    pub error: String,
}

/// Per-symbol outcome of a quote fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteEntry {
    Quote(QuoteRecord),
    Error(QuoteErrorEntry),
}

impl QuoteEntry {
    pub fn ticker(&self) -> &Symbol {
        match self {
            Self::Quote(record) => &record.ticker,
            Self::Error(entry) => &entry.ticker,
        }
    }

    pub fn as_quote(&self) -> Option<&QuoteRecord> {
        match self {
            Self::Quote(record) => Some(record),
            Self::Error(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Quote(_) => None,
            Self::Error(entry) => Some(entry.error.as_str()),
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Origin of an exchange rate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RateSource {
    /// Identity pair; no provider call was made.
    Direct,
    Provider(ProviderId),
    /// Static table value substituted after a provider failure.
    Fallback,
}

impl RateSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "Direct",
            Self::Provider(provider) => provider.display_name(),
            Self::Fallback => "Fallback",
        }
    }
}

impl Display for RateSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RateSource> for String {
    fn from(value: RateSource) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for RateSource {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Direct" => Ok(Self::Direct),
            "Fallback" => Ok(Self::Fallback),
            other => ProviderId::from_display_name(other)
                .map(Self::Provider)
                .ok_or_else(|| format!("unknown rate source '{other}'")),
        }
    }
}

/// Exchange rate lookup result.
///
/// A fallback rate is always paired with an `error`; callers must check
/// [`ExchangeRate::is_authoritative`] rather than the presence of `rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub rate: f64,
    pub source: RateSource,
    pub timestamp: UtcDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExchangeRate {
    pub fn is_authoritative(&self) -> bool {
        self.error.is_none() && self.source != RateSource::Fallback
    }
}
