//! Exchange rate lookup with a static fallback table.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data_source::{MarketDataProvider, SourceError};
use crate::domain::{CurrencyPair, ExchangeRate, RateSource};
use crate::{Symbol, UtcDateTime};

/// Rate used for pairs missing from [`FALLBACK_RATES`].
pub const DEFAULT_FALLBACK_RATE: f64 = 1.0;

/// Approximate rates substituted when the provider cannot be reached.
pub const FALLBACK_RATES: &[(&str, f64)] = &[
    ("USDJPY", 150.0),
    ("JPYUSD", 0.0067),
    ("EURJPY", 160.0),
    ("JPYEUR", 0.00625),
    ("EURUSD", 1.08),
    ("USDEUR", 0.93),
    ("GBPJPY", 190.0),
    ("GBPUSD", 1.27),
];

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RateError {
    #[error("No exchange rate data found for {symbol}")]
    NoData { symbol: Symbol },

    #[error("invalid exchange rate {value} for {symbol}")]
    InvalidRate { symbol: Symbol, value: f64 },

    #[error("failed to fetch exchange rate {symbol}: {source}")]
    Source {
        symbol: Symbol,
        #[source]
        source: SourceError,
    },
}

pub fn fallback_rate(pair: &CurrencyPair) -> f64 {
    let code = pair.code();
    FALLBACK_RATES
        .iter()
        .find(|(key, _)| *key == code)
        .map_or(DEFAULT_FALLBACK_RATE, |(_, rate)| *rate)
}

/// Most recent provider close for the pair.
pub async fn lookup_rate(
    provider: &dyn MarketDataProvider,
    pair: &CurrencyPair,
) -> Result<f64, RateError> {
    let symbol = Symbol::normalize(&pair.provider_symbol());
    debug!(pair = %pair, symbol = %symbol, "requesting exchange rate");

    let history = provider
        .history(&symbol)
        .await
        .map_err(|source| RateError::Source {
            symbol: symbol.clone(),
            source,
        })?;
    let rate = history
        .last_close()
        .ok_or_else(|| RateError::NoData {
            symbol: symbol.clone(),
        })?;

    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(RateError::InvalidRate {
            symbol,
            value: rate,
        })
    }
}

/// Resolves the pair's rate. Never fails: provider errors yield the fallback
/// rate with the cause recorded in [`ExchangeRate::error`].
pub async fn fetch_rate(provider: &dyn MarketDataProvider, pair: &CurrencyPair) -> ExchangeRate {
    if pair.is_identity() {
        return ExchangeRate {
            from_currency: pair.from.clone(),
            to_currency: pair.to.clone(),
            rate: 1.0,
            source: RateSource::Direct,
            timestamp: UtcDateTime::now(),
            error: None,
        };
    }

    match lookup_rate(provider, pair).await {
        Ok(rate) => {
            info!(pair = %pair, rate, "exchange rate resolved");
            ExchangeRate {
                from_currency: pair.from.clone(),
                to_currency: pair.to.clone(),
                rate,
                source: RateSource::Provider(provider.id()),
                timestamp: UtcDateTime::now(),
                error: None,
            }
        }
        Err(error) => fallback(pair, &error),
    }
}

fn fallback(pair: &CurrencyPair, error: &RateError) -> ExchangeRate {
    let rate = fallback_rate(pair);
    warn!(pair = %pair, %error, rate, "using fallback exchange rate");

    ExchangeRate {
        from_currency: pair.from.clone(),
        to_currency: pair.to.clone(),
        rate,
        source: RateSource::Fallback,
        timestamp: UtcDateTime::now(),
        error: Some(error.to_string()),
    }
}
