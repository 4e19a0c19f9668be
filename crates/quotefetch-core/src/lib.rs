//! # Quotefetch Core
//!
//! Domain types, the Yahoo Finance adapter and the fetch pipeline behind the
//! `quotefetch` binary.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo) |
//! | [`config`] | Transport configuration from the environment |
//! | [`data_source`] | Provider contract and response shapes |
//! | [`domain`] | Symbols, currencies, quote and rate records |
//! | [`envelope`] | The JSON result envelope |
//! | [`error`] | Core error types |
//! | [`exchange_rate`] | Exchange rate lookup with static fallback |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`metadata`] | Display name and currency resolution |
//! | [`quotes`] | Batch last-close quote fetching |
//! | [`request`] | Argument resolution into a [`FetchRequest`] |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quotefetch_core::{
//!     fetch_quotes, FetchConfig, FetchRequest, ResponseData, ResultEnvelope, YahooAdapter,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = YahooAdapter::new(&FetchConfig::from_env()?);
//!
//!     let FetchRequest::Quotes(symbols) = FetchRequest::resolve(Some("7203,AAPL"), None)? else {
//!         unreachable!();
//!     };
//!     let batch = fetch_quotes(&adapter, &symbols).await;
//!
//!     let envelope: ResultEnvelope<ResponseData> = ResultEnvelope::from_quotes(batch);
//!     println!("{}", envelope.to_json(true)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Provider failures never abort a fetch. They surface as data instead:
//!
//! - a symbol that cannot be priced becomes a [`QuoteErrorEntry`]
//! - a failed metadata lookup falls back to symbol-derived defaults
//! - a failed rate lookup yields a [`RateSource::Fallback`] rate with its cause
//!
//! Only argument validation ([`ValidationError`]) and serialization
//! ([`CoreError`]) are reported as `Err`.

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod exchange_rate;
pub mod http_client;
pub mod metadata;
pub mod quotes;
pub mod request;
pub mod source;

// Adapter implementations
pub use adapters::YahooAdapter;

// Configuration
pub use config::FetchConfig;

// Provider contract
pub use data_source::{
    InstrumentInfo, MarketDataProvider, PriceHistory, QuoteTable, SourceError, SourceErrorKind,
    SourceFuture,
};

// Domain models
pub use domain::{
    CurrencyCode, CurrencyPair, ExchangeRate, QuoteEntry, QuoteErrorEntry, QuoteRecord,
    RateSource, Symbol, UtcDateTime,
};

// Envelope types
pub use envelope::{ResponseData, ResultEnvelope};

// Error types
pub use error::{CoreError, ValidationError};

// Pipeline
pub use exchange_rate::{fallback_rate, fetch_rate, RateError};
pub use metadata::{resolve_metadata, InstrumentMetadata};
pub use quotes::{fetch_quotes, QuoteBatch, QuoteError};
pub use request::FetchRequest;

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Source identifiers
pub use source::ProviderId;
