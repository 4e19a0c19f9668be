use std::backtrace::{Backtrace, BacktraceStatus};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Write as _};

use serde::{Deserialize, Serialize};

use crate::domain::{ExchangeRate, QuoteEntry, QuoteRecord};
use crate::quotes::QuoteBatch;
use crate::{CoreError, Symbol, UtcDateTime};

/// The single JSON document written for every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub timestamp: UtcDateTime,
}

impl<T> ResultEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            stack: None,
            timestamp: UtcDateTime::now(),
        }
    }

    pub fn failure(error: impl Display) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            stack: None,
            timestamp: UtcDateTime::now(),
        }
    }

    /// Failed outcome that still carries a usable (degraded) payload.
    pub fn degraded(data: T, error: impl Display) -> Self {
        Self {
            data: Some(data),
            ..Self::failure(error)
        }
    }

    /// Failure for an error nobody anticipated; `stack` holds the cause chain
    /// and, when `RUST_BACKTRACE` enables capture, a backtrace.
    pub fn unexpected(error: &(dyn Error + 'static)) -> Self {
        Self {
            stack: Some(render_trace(error, &Backtrace::capture())),
            ..Self::failure(error)
        }
    }
}

impl<T: Serialize> ResultEnvelope<T> {
    pub fn to_json(&self, pretty: bool) -> Result<String, CoreError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Payload variants an invocation can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Quote(QuoteRecord),
    ExchangeRate(ExchangeRate),
    Quotes(BTreeMap<Symbol, QuoteEntry>),
}

impl ResultEnvelope<ResponseData> {
    /// A request for exactly one symbol reports its record (or error)
    /// directly; any other request succeeds with the per-symbol map, even when
    /// repeats collapse it to one entry.
    pub fn from_quotes(batch: QuoteBatch) -> Self {
        if batch.requested != 1 {
            return Self::success(ResponseData::Quotes(batch.entries));
        }

        match batch.into_single() {
            Some(QuoteEntry::Quote(record)) => Self::success(ResponseData::Quote(record)),
            Some(QuoteEntry::Error(entry)) => Self::failure(entry.error),
            None => Self::failure("no quote produced"),
        }
    }

    pub fn from_exchange_rate(rate: ExchangeRate) -> Self {
        match rate.error.clone() {
            Some(error) => Self::degraded(ResponseData::ExchangeRate(rate), error),
            None => Self::success(ResponseData::ExchangeRate(rate)),
        }
    }
}

fn render_trace(error: &(dyn Error + 'static), backtrace: &Backtrace) -> String {
    let mut trace = format!("Error: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(trace, "\nCaused by: {cause}");
        source = cause.source();
    }
    if backtrace.status() == BacktraceStatus::Captured {
        let _ = write!(trace, "\n\nStack backtrace:\n{backtrace}");
    }
    trace
}
