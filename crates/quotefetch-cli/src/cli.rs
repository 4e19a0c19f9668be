//! CLI argument definitions for quotefetch.
//!
//! Exactly one mode flag is expected per invocation:
//!
//! | Option | Description |
//! |--------|-------------|
//! | `--symbols` | Comma-separated tickers; four-digit codes are Tokyo listings |
//! | `--exchange_rate` | Six-letter currency pair such as `USDJPY` |
//! | `--pretty` | Pretty-print the JSON envelope |
//! | `--timeout-ms` | Per-request timeout (overrides `QUOTEFETCH_TIMEOUT_MS`) |
//! | `--base-url` | Yahoo query host (overrides `QUOTEFETCH_BASE_URL`) |
//!
//! # Examples
//!
//! ```bash
//! quotefetch --symbols 7203,AAPL
//! quotefetch --exchange_rate USDJPY --pretty
//! ```

use clap::Parser;
use quotefetch_core::{FetchConfig, ValidationError};

/// Fetch last-close quotes or exchange rates from Yahoo Finance as JSON.
#[derive(Debug, Parser)]
#[command(name = "quotefetch", author, version, about)]
pub struct Cli {
    /// Comma-separated ticker symbols (e.g. 7203,AAPL,6758.T).
    #[arg(long, value_name = "TICKERS")]
    pub symbols: Option<String>,

    /// Currency pair: first three letters are the base, next three the quote.
    #[arg(long = "exchange_rate", value_name = "PAIR")]
    pub exchange_rate: Option<String>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Request timeout in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Yahoo query host, e.g. a local stub server.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

impl Cli {
    /// Environment configuration with flag overrides applied.
    pub fn fetch_config(&self) -> Result<FetchConfig, ValidationError> {
        let mut config = FetchConfig::from_env()?;
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url)?;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout_ms(timeout_ms)?;
        }
        Ok(config)
    }
}
