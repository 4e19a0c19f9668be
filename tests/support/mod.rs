//! Shared doubles for behavior tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use quotefetch_core::{
    InstrumentInfo, MarketDataProvider, PriceHistory, ProviderId, QuoteTable, SourceError,
    SourceFuture, Symbol,
};
use tracing::subscriber::DefaultGuard;

/// In-memory provider answering from scripted tables and recording every call
/// as `"<capability>:<symbols>"`.
#[derive(Default)]
pub struct ScriptedProvider {
    bulk: BTreeMap<String, PriceHistory>,
    download_error: Option<SourceError>,
    histories: BTreeMap<String, Result<PriceHistory, SourceError>>,
    infos: BTreeMap<String, InstrumentInfo>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close returned for `symbol` by the bulk download.
    pub fn with_close(mut self, symbol: &str, close: f64) -> Self {
        self.bulk
            .insert(symbol.to_owned(), PriceHistory::new(vec![Some(close)]));
        self
    }

    /// Raw bulk series for `symbol`, gaps included.
    pub fn with_bulk_series(mut self, symbol: &str, closes: Vec<Option<f64>>) -> Self {
        self.bulk.insert(symbol.to_owned(), PriceHistory::new(closes));
        self
    }

    pub fn with_failing_download(mut self, error: SourceError) -> Self {
        self.download_error = Some(error);
        self
    }

    /// Response to a single-symbol history request.
    pub fn with_history(
        mut self,
        symbol: &str,
        history: Result<PriceHistory, SourceError>,
    ) -> Self {
        self.histories.insert(symbol.to_owned(), history);
        self
    }

    pub fn with_info(mut self, symbol: &str, info: InstrumentInfo) -> Self {
        self.infos.insert(symbol.to_owned(), info);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls_to(&self, capability: &str) -> usize {
        let prefix = format!("{capability}:");
        self.calls()
            .iter()
            .filter(|call| call.starts_with(&prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl MarketDataProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn download<'a>(&'a self, symbols: &'a [Symbol]) -> SourceFuture<'a, QuoteTable> {
        let joined = symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",");
        self.record(format!("download:{joined}"));

        let result = match (&self.download_error, symbols) {
            (Some(error), _) => Err(error.clone()),
            (None, [symbol]) => Ok(QuoteTable::Flat(
                self.bulk.get(symbol.as_str()).cloned().unwrap_or_default(),
            )),
            (None, _) => Ok(QuoteTable::Grouped(
                symbols
                    .iter()
                    .filter_map(|symbol| {
                        self.bulk
                            .get(symbol.as_str())
                            .map(|history| (symbol.clone(), history.clone()))
                    })
                    .collect(),
            )),
        };
        Box::pin(async move { result })
    }

    fn history<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, PriceHistory> {
        self.record(format!("history:{symbol}"));
        let result = self
            .histories
            .get(symbol.as_str())
            .cloned()
            .unwrap_or_else(|| Err(SourceError::not_found(format!("no chart for {symbol}"))));
        Box::pin(async move { result })
    }

    fn info<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, InstrumentInfo> {
        self.record(format!("info:{symbol}"));
        let result = self
            .infos
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| SourceError::unavailable(format!("no metadata for {symbol}")));
        Box::pin(async move { result })
    }
}

pub fn info(short_name: &str, long_name: &str, currency: &str) -> InstrumentInfo {
    let field = |value: &str| (!value.is_empty()).then(|| value.to_owned());
    InstrumentInfo {
        short_name: field(short_name),
        long_name: field(long_name),
        currency: field(currency),
        exchange: Some(String::from("NMS")),
        quote_type: Some(String::from("EQUITY")),
    }
}

/// Shared in-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's diagnostics into a buffer until the guard drops.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    (buffer, tracing::subscriber::set_default(subscriber))
}
