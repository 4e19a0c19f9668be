//! Display name and currency resolution for a priced symbol.
//!
//! Metadata is best effort: a failed lookup degrades to defaults derived from
//! the symbol itself and never fails the quote.

use thiserror::Error;
use tracing::{debug, warn};

use crate::data_source::{InstrumentInfo, MarketDataProvider, SourceError};
use crate::{CurrencyCode, Symbol};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata lookup failed for {symbol}: {source}")]
    Source {
        symbol: Symbol,
        #[source]
        source: SourceError,
    },
    #[error("provider returned no metadata for {symbol}")]
    Empty { symbol: Symbol },
}

/// Resolved descriptive attributes for one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentMetadata {
    pub display_name: String,
    pub currency: CurrencyCode,
    pub long_name: String,
    pub short_name: String,
    pub exchange: String,
    pub quote_type: String,
}

impl InstrumentMetadata {
    /// Builds metadata from provider attributes.
    ///
    /// The display name prefers the short name, then the long name, then the
    /// symbol. Tokyo listings are always priced in JPY.
    pub fn from_info(symbol: &Symbol, info: InstrumentInfo) -> Self {
        let short_name = present(info.short_name);
        let long_name = present(info.long_name);
        let display_name = short_name
            .clone()
            .or_else(|| long_name.clone())
            .unwrap_or_else(|| symbol.to_string());

        let currency = if symbol.is_tokyo_listed() {
            CurrencyCode::jpy()
        } else {
            present(info.currency)
                .and_then(|raw| match CurrencyCode::parse(&raw) {
                    Ok(code) => Some(code),
                    Err(error) => {
                        debug!(symbol = %symbol, %error, "ignoring unusable currency attribute");
                        None
                    }
                })
                .unwrap_or_else(CurrencyCode::usd)
        };

        Self {
            display_name,
            currency,
            long_name: long_name.unwrap_or_default(),
            short_name: short_name.unwrap_or_default(),
            exchange: present(info.exchange).unwrap_or_default(),
            quote_type: present(info.quote_type).unwrap_or_default(),
        }
    }

    /// Defaults used when the provider could not be asked.
    pub fn fallback(symbol: &Symbol) -> Self {
        let currency = if symbol.is_tokyo_listed() {
            CurrencyCode::jpy()
        } else {
            CurrencyCode::usd()
        };

        Self {
            display_name: symbol.to_string(),
            currency,
            long_name: String::new(),
            short_name: String::new(),
            exchange: String::new(),
            quote_type: String::new(),
        }
    }
}

/// Looks up metadata, reporting why the lookup could not be used.
pub async fn lookup_metadata(
    provider: &dyn MarketDataProvider,
    symbol: &Symbol,
) -> Result<InstrumentMetadata, MetadataError> {
    let info = provider
        .info(symbol)
        .await
        .map_err(|source| MetadataError::Source {
            symbol: symbol.clone(),
            source,
        })?;

    if info == InstrumentInfo::default() {
        return Err(MetadataError::Empty {
            symbol: symbol.clone(),
        });
    }

    Ok(InstrumentMetadata::from_info(symbol, info))
}

/// Resolves metadata for a symbol. Never fails.
pub async fn resolve_metadata(
    provider: &dyn MarketDataProvider,
    symbol: &Symbol,
) -> InstrumentMetadata {
    match lookup_metadata(provider, symbol).await {
        Ok(metadata) => metadata,
        Err(error) => {
            warn!(symbol = %symbol, %error, "using default metadata");
            InstrumentMetadata::fallback(symbol)
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
