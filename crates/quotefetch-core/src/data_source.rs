//! Provider contract and response types.
//!
//! The upstream provider is treated as a black box offering three
//! capabilities. Its loosely shaped responses are modelled explicitly here so
//! the pipeline never inspects ad hoc shapes:
//!
//! | Capability | Method | Response |
//! |------------|--------|----------|
//! | Bulk last-session download | [`MarketDataProvider::download`] | [`QuoteTable`] |
//! | Single-symbol history | [`MarketDataProvider::history`] | [`PriceHistory`] |
//! | Descriptive metadata | [`MarketDataProvider::info`] | [`InstrumentInfo`] |

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{ProviderId, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    Unauthorized,
    RateLimited,
    NotFound,
    InvalidRequest,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unauthorized, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NotFound, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message)
    }

    fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Unauthorized => "source.unauthorized",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Close prices for one symbol over the requested lookback, oldest first.
///
/// Missing sessions are `None`, exactly as the provider reports them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    pub closes: Vec<Option<f64>>,
}

impl PriceHistory {
    pub fn new(closes: Vec<Option<f64>>) -> Self {
        Self { closes }
    }

    pub fn is_empty(&self) -> bool {
        self.closes.iter().all(Option::is_none)
    }

    /// Most recent reported close, skipping trailing gaps.
    pub fn last_close(&self) -> Option<f64> {
        self.closes.iter().rev().find_map(|close| *close)
    }
}

/// Bulk download result, shaped by how many symbols were requested.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteTable {
    /// Single-symbol request: one ungrouped table.
    Flat(PriceHistory),
    /// Multi-symbol request: one table per symbol the provider answered for.
    Grouped(BTreeMap<Symbol, PriceHistory>),
}

impl QuoteTable {
    pub fn empty_for(symbol_count: usize) -> Self {
        if symbol_count == 1 {
            Self::Flat(PriceHistory::default())
        } else {
            Self::Grouped(BTreeMap::new())
        }
    }
}

/// Descriptive attributes for one symbol. Every field is optional because
/// the provider omits them freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentInfo {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub quote_type: Option<String>,
}

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Market data provider contract.
///
/// Implementations must be `Send + Sync`; the pipeline awaits calls one at a
/// time.
pub trait MarketDataProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Downloads the most recent session for every symbol in one request.
    ///
    /// Returns [`QuoteTable::Flat`] when exactly one symbol was requested and
    /// [`QuoteTable::Grouped`] otherwise.
    fn download<'a>(&'a self, symbols: &'a [Symbol]) -> SourceFuture<'a, QuoteTable>;

    /// Fetches the most recent session for a single symbol.
    fn history<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, PriceHistory>;

    /// Fetches descriptive metadata for a single symbol.
    fn info<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, InstrumentInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_close_skips_trailing_gaps() {
        let history = PriceHistory::new(vec![Some(101.0), Some(102.5), None]);
        assert_eq!(history.last_close(), Some(102.5));
        assert!(!history.is_empty());
    }

    #[test]
    fn all_gap_history_is_empty() {
        let history = PriceHistory::new(vec![None, None]);
        assert!(history.is_empty());
        assert_eq!(history.last_close(), None);
    }

    #[test]
    fn empty_table_shape_follows_symbol_count() {
        assert_eq!(
            QuoteTable::empty_for(1),
            QuoteTable::Flat(PriceHistory::default())
        );
        assert_eq!(QuoteTable::empty_for(3), QuoteTable::Grouped(BTreeMap::new()));
    }

    #[test]
    fn error_display_includes_code() {
        let error = SourceError::rate_limited("slow down");
        assert_eq!(error.to_string(), "slow down (source.rate_limited)");
        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    }
}
