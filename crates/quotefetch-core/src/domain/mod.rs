//! # Domain Models
//!
//! Canonical domain types shared by the fetch pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Provider-recognized ticker (`7203` becomes `7203.T`) |
//! | [`CurrencyCode`] | Three-letter currency code |
//! | [`CurrencyPair`] | Base/quote pair for exchange-rate mode |
//! | [`QuoteRecord`] | Normalized last-close quote with display metadata |
//! | [`QuoteEntry`] | Per-symbol quote or error entry |
//! | [`ExchangeRate`] | Rate lookup result with its [`RateSource`] |
//! | [`UtcDateTime`] | UTC timestamp |

mod currency;
mod models;
mod symbol;
mod timestamp;

pub use currency::{CurrencyCode, CurrencyPair};
pub use models::{ExchangeRate, QuoteEntry, QuoteErrorEntry, QuoteRecord, RateSource};
pub use symbol::{Symbol, TOKYO_SUFFIX};
pub use timestamp::UtcDateTime;
