//! Last-close quote fetching.
//!
//! One bulk download prices every requested symbol. Failures are isolated per
//! symbol: a symbol that cannot be priced becomes an error entry and the rest
//! of the batch continues.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data_source::{MarketDataProvider, PriceHistory, QuoteTable, SourceError};
use crate::domain::{QuoteEntry, QuoteErrorEntry, QuoteRecord};
use crate::metadata::resolve_metadata;
use crate::{Symbol, UtcDateTime};

/// Why a symbol could not be priced.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QuoteError {
    #[error("No data found for ticker: {symbol}")]
    NoData { symbol: Symbol },

    #[error("invalid price {value} for ticker: {symbol}")]
    InvalidPrice { symbol: Symbol, value: f64 },

    #[error("failed to fetch {symbol}: {source}")]
    Source {
        symbol: Symbol,
        #[source]
        source: SourceError,
    },
}

/// Per-symbol outcomes keyed by normalized symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteBatch {
    /// Symbols asked for, repeats included.
    pub requested: usize,
    pub entries: BTreeMap<Symbol, QuoteEntry>,
}

impl QuoteBatch {
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, entry: QuoteEntry) {
        self.entries.insert(entry.ticker().clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&QuoteEntry> {
        self.entries.get(symbol)
    }

    pub fn quotes(&self) -> impl Iterator<Item = &QuoteRecord> {
        self.entries.values().filter_map(QuoteEntry::as_quote)
    }

    pub fn failures(&self) -> impl Iterator<Item = &QuoteEntry> {
        self.entries.values().filter(|entry| entry.is_error())
    }

    /// The sole entry, when exactly one symbol was requested.
    pub fn into_single(self) -> Option<QuoteEntry> {
        if self.requested != 1 || self.entries.len() != 1 {
            return None;
        }
        self.entries.into_values().next()
    }
}

/// Prices every symbol, returning one entry per distinct symbol.
pub async fn fetch_quotes(provider: &dyn MarketDataProvider, symbols: &[Symbol]) -> QuoteBatch {
    let mut batch = QuoteBatch::new(symbols.len());
    let symbols = symbols
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    if symbols.is_empty() {
        return batch;
    }

    info!(count = symbols.len(), provider = %provider.id(), "fetching quotes");

    let mut bulk_error = None;
    let table = match provider.download(&symbols).await {
        Ok(table) => table,
        Err(error) => {
            warn!(%error, "bulk download failed; continuing with an empty table");
            bulk_error = Some(error);
            QuoteTable::empty_for(symbols.len())
        }
    };

    let prices = match (table, symbols.as_slice()) {
        (QuoteTable::Flat(history), [symbol]) => {
            vec![(symbol.clone(), price_single(provider, symbol, &history).await)]
        }
        (QuoteTable::Grouped(mut groups), _) => symbols
            .iter()
            .map(|symbol| {
                let price = match groups.remove(symbol) {
                    Some(history) => close_price(symbol, &history),
                    None => Err(missing_group(symbol, bulk_error.as_ref())),
                };
                (symbol.clone(), price)
            })
            .collect(),
        (QuoteTable::Flat(_), _) => symbols
            .iter()
            .map(|symbol| {
                let error = QuoteError::Source {
                    symbol: symbol.clone(),
                    source: SourceError::internal("provider returned an ungrouped table"),
                };
                (symbol.clone(), Err(error))
            })
            .collect(),
    };

    for (symbol, price) in prices {
        let entry = match price {
            Ok(price) => QuoteEntry::Quote(build_record(provider, &symbol, price).await),
            Err(error) => {
                warn!(symbol = %symbol, %error, "symbol could not be priced");
                QuoteEntry::Error(QuoteErrorEntry {
                    ticker: symbol,
                    error: error.to_string(),
                })
            }
        };
        batch.insert(entry);
    }

    batch
}

/// Single-symbol path: the flat table first, then one history request.
async fn price_single(
    provider: &dyn MarketDataProvider,
    symbol: &Symbol,
    table: &PriceHistory,
) -> Result<f64, QuoteError> {
    if let Some(close) = table.last_close() {
        return coerce_price(symbol, close);
    }

    debug!(symbol = %symbol, "bulk table has no close; requesting history");
    let history = provider
        .history(symbol)
        .await
        .map_err(|source| QuoteError::Source {
            symbol: symbol.clone(),
            source,
        })?;
    close_price(symbol, &history)
}

fn close_price(symbol: &Symbol, history: &PriceHistory) -> Result<f64, QuoteError> {
    let close = history.last_close().ok_or_else(|| QuoteError::NoData {
        symbol: symbol.clone(),
    })?;
    coerce_price(symbol, close)
}

fn missing_group(symbol: &Symbol, bulk_error: Option<&SourceError>) -> QuoteError {
    match bulk_error {
        Some(source) => QuoteError::Source {
            symbol: symbol.clone(),
            source: source.clone(),
        },
        None => QuoteError::NoData {
            symbol: symbol.clone(),
        },
    }
}

/// Prices must be finite and non-negative.
pub fn coerce_price(symbol: &Symbol, value: f64) -> Result<f64, QuoteError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(QuoteError::InvalidPrice {
            symbol: symbol.clone(),
            value,
        })
    }
}

async fn build_record(
    provider: &dyn MarketDataProvider,
    symbol: &Symbol,
    price: f64,
) -> QuoteRecord {
    let metadata = resolve_metadata(provider, symbol).await;

    QuoteRecord {
        ticker: symbol.clone(),
        name: metadata.display_name,
        price,
        currency: metadata.currency,
        long_name: metadata.long_name,
        short_name: metadata.short_name,
        exchange: metadata.exchange,
        quote_type: metadata.quote_type,
        timestamp: UtcDateTime::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_rejects_non_finite_and_negative_prices() {
        let symbol = Symbol::normalize("AAPL");

        assert_eq!(coerce_price(&symbol, 190.5), Ok(190.5));
        assert_eq!(coerce_price(&symbol, 0.0), Ok(0.0));
        assert!(matches!(
            coerce_price(&symbol, f64::NAN),
            Err(QuoteError::InvalidPrice { .. })
        ));
        assert!(coerce_price(&symbol, f64::INFINITY).is_err());
        assert!(coerce_price(&symbol, -1.0).is_err());
    }

    #[test]
    fn missing_group_carries_bulk_failure() {
        let symbol = Symbol::normalize("AAPL");
        let bulk = SourceError::unavailable("connection reset");

        let error = missing_group(&symbol, Some(&bulk));
        assert!(error.to_string().contains("connection reset"));
        assert_eq!(
            missing_group(&symbol, None).to_string(),
            "No data found for ticker: AAPL"
        );
    }

    fn failed(ticker: &str) -> QuoteEntry {
        QuoteEntry::Error(QuoteErrorEntry {
            ticker: Symbol::normalize(ticker),
            error: format!("No data found for ticker: {ticker}"),
        })
    }

    #[test]
    fn single_entry_is_extracted_only_from_single_batches() {
        let mut batch = QuoteBatch::new(1);
        batch.insert(failed("7203"));
        assert_eq!(batch.failures().count(), 1);
        assert!(batch.clone().into_single().is_some());

        batch.insert(failed("AAPL"));
        assert!(batch.into_single().is_none());
    }

    #[test]
    fn repeated_request_is_not_a_single_batch() {
        let mut batch = QuoteBatch::new(2);
        batch.insert(failed("AAPL"));

        assert_eq!(batch.len(), 1);
        assert!(batch.into_single().is_none());
    }

    #[test]
    fn entries_are_keyed_by_their_ticker() {
        let mut batch = QuoteBatch::new(1);
        batch.insert(failed("7203"));

        assert!(batch.get(&Symbol::normalize("7203.T")).is_some());
    }
}
