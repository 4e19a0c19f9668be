use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::data_source::{
    InstrumentInfo, MarketDataProvider, PriceHistory, QuoteTable, SourceError, SourceErrorKind,
    SourceFuture,
};
use crate::config::DEFAULT_BASE_URL;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{FetchConfig, ProviderId, Symbol};

const COOKIE_URL: &str = "https://fc.yahoo.com";
const REFERER: &str = "https://finance.yahoo.com/";
const LOOKBACK_RANGE: &str = "1d";
const LOOKBACK_INTERVAL: &str = "1d";
const INFO_FIELDS: &str = "shortName,longName,currency,exchange,quoteType";

// ============================================================================
// Yahoo crumb - required by the v7 quote endpoint
// ============================================================================

/// Caches the Yahoo crumb for the lifetime of one adapter.
///
/// The session cookie lives in the transport's cookie jar; only the crumb has
/// to travel in the query string.
#[derive(Debug, Default)]
struct YahooCrumb {
    value: Mutex<Option<String>>,
}

impl YahooCrumb {
    fn cached(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, crumb: String) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(crumb);
    }

    fn invalidate(&self) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Yahoo Finance provider backed by the chart, spark and quote endpoints.
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    /// Session-cookie endpoint; only used against the real Yahoo host.
    cookie_url: Option<String>,
    timeout_ms: u64,
    crumb: YahooCrumb,
}

impl YahooAdapter {
    pub fn new(config: &FetchConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new(config)), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: &FetchConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url.clone(),
            cookie_url: (config.base_url == DEFAULT_BASE_URL).then(|| COOKIE_URL.to_owned()),
            timeout_ms: config.timeout_ms,
            crumb: YahooCrumb::default(),
        }
    }

    fn request(&self, url: impl Into<String>) -> HttpRequest {
        HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_timeout_ms(self.timeout_ms)
    }

    /// Issues a GET and returns the body of a 2xx response.
    async fn get_body(&self, url: String, what: &str) -> Result<String, SourceError> {
        debug!(url = %url, "yahoo request");
        let response = self
            .http_client
            .execute(self.request(url))
            .await
            .map_err(|error| {
                SourceError::unavailable(format!("yahoo transport error ({what}): {error}"))
            })?;

        match response.status {
            _ if response.is_success() => Ok(response.body),
            401 | 403 => Err(SourceError::unauthorized(format!(
                "yahoo rejected the {what} request with status {}",
                response.status
            ))),
            404 => Err(SourceError::not_found(format!(
                "yahoo has no {what} data ({})",
                api_error_description(&response.body).unwrap_or_else(|| String::from("404"))
            ))),
            429 => Err(SourceError::rate_limited(format!(
                "yahoo rate limited the {what} request"
            ))),
            status => Err(SourceError::unavailable(format!(
                "yahoo returned status {status} for {what}"
            ))),
        }
    }

    async fn fetch_chart(&self, symbol: &Symbol) -> Result<PriceHistory, SourceError> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={LOOKBACK_RANGE}&interval={LOOKBACK_INTERVAL}",
            self.base_url,
            urlencoding::encode(symbol.as_str())
        );
        let body = self.get_body(url, "chart").await?;
        parse_chart(&body)
    }

    async fn fetch_spark(
        &self,
        symbols: &[Symbol],
    ) -> Result<BTreeMap<Symbol, PriceHistory>, SourceError> {
        let symbols_param = symbols
            .iter()
            .map(|symbol| urlencoding::encode(symbol.as_str()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/v7/finance/spark?symbols={symbols_param}&range={LOOKBACK_RANGE}&interval={LOOKBACK_INTERVAL}",
            self.base_url
        );
        let body = self.get_body(url, "spark").await?;
        parse_spark(&body, symbols)
    }

    async fn crumb(&self) -> Result<String, SourceError> {
        if let Some(crumb) = self.crumb.cached() {
            return Ok(crumb);
        }

        // Only sets the session cookie; failures surface at the crumb step.
        if let Some(cookie_url) = &self.cookie_url {
            if let Err(error) = self.http_client.execute(self.request(cookie_url.as_str())).await {
                debug!(error = %error, "yahoo cookie request failed");
            }
        }

        let url = format!("{}/v1/test/getcrumb", self.base_url);
        let body = self.get_body(url, "crumb").await?;
        let crumb = body.trim();
        if crumb.is_empty() || crumb.len() > 100 || crumb.contains(' ') || crumb.contains('<') {
            return Err(SourceError::unavailable("yahoo returned an unusable crumb"));
        }

        self.crumb.store(crumb.to_owned());
        Ok(crumb.to_owned())
    }

    async fn fetch_info(&self, symbol: &Symbol) -> Result<InstrumentInfo, SourceError> {
        match self.fetch_info_once(symbol).await {
            Err(error) if is_auth_rejection(&error) => {
                warn!(symbol = %symbol, error = %error, "yahoo rejected crumb; refreshing");
                self.crumb.invalidate();
                self.fetch_info_once(symbol).await
            }
            other => other,
        }
    }

    async fn fetch_info_once(&self, symbol: &Symbol) -> Result<InstrumentInfo, SourceError> {
        let crumb = self.crumb().await?;
        let url = format!(
            "{}/v7/finance/quote?symbols={}&fields={INFO_FIELDS}&crumb={}",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(&crumb)
        );
        let body = self.get_body(url, "quote").await?;
        parse_quote_info(&body, symbol)
    }
}

impl MarketDataProvider for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn download<'a>(&'a self, symbols: &'a [Symbol]) -> SourceFuture<'a, QuoteTable> {
        Box::pin(async move {
            match symbols {
                [] => Err(SourceError::invalid_request(
                    "yahoo download requires at least one symbol",
                )),
                [symbol] => self.fetch_chart(symbol).await.map(QuoteTable::Flat),
                _ => self.fetch_spark(symbols).await.map(QuoteTable::Grouped),
            }
        })
    }

    fn history<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, PriceHistory> {
        Box::pin(async move { self.fetch_chart(symbol).await })
    }

    fn info<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, InstrumentInfo> {
        Box::pin(async move { self.fetch_info(symbol).await })
    }
}

fn is_auth_rejection(error: &SourceError) -> bool {
    matches!(
        error.kind(),
        SourceErrorKind::Unauthorized | SourceErrorKind::RateLimited
    )
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooApiError {
    fn describe(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => String::from("unspecified error"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    indicators: Option<YahooIndicators>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooSparkResponse {
    spark: YahooSpark,
}

#[derive(Debug, Deserialize)]
struct YahooSpark {
    #[serde(default)]
    result: Option<Vec<YahooSparkResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooSparkResult {
    symbol: String,
    #[serde(default)]
    response: Vec<YahooChartResult>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResult {
    #[serde(default)]
    result: Vec<YahooQuoteInfo>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuoteInfo {
    symbol: String,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    quote_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooErrorBody {
    #[serde(default)]
    chart: Option<YahooChart>,
    #[serde(default)]
    finance: Option<YahooFinanceError>,
}

#[derive(Debug, Deserialize)]
struct YahooFinanceError {
    #[serde(default)]
    error: Option<YahooApiError>,
}

// ============================================================================
// Parsing
// ============================================================================

fn parse_chart(body: &str) -> Result<PriceHistory, SourceError> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = &response.chart.error {
        return Err(SourceError::not_found(format!(
            "yahoo chart API error: {}",
            error.describe()
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::not_found("no chart data in response"))?;

    Ok(history_from_result(result))
}

fn parse_spark(
    body: &str,
    requested: &[Symbol],
) -> Result<BTreeMap<Symbol, PriceHistory>, SourceError> {
    let response: YahooSparkResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo spark: {e}")))?;

    if let Some(error) = &response.spark.error {
        return Err(SourceError::unavailable(format!(
            "yahoo spark API error: {}",
            error.describe()
        )));
    }

    let mut grouped = BTreeMap::new();
    for result in response.spark.result.unwrap_or_default() {
        // Yahoo echoes symbols upper-cased; key groups by what was asked for.
        let Some(symbol) = requested
            .iter()
            .find(|symbol| symbol.as_str().eq_ignore_ascii_case(&result.symbol))
        else {
            debug!(symbol = %result.symbol, "ignoring unrequested spark group");
            continue;
        };

        if let Some(chart) = result.response.into_iter().next() {
            grouped.insert(symbol.clone(), history_from_result(chart));
        }
    }

    Ok(grouped)
}

fn parse_quote_info(body: &str, symbol: &Symbol) -> Result<InstrumentInfo, SourceError> {
    let response: YahooQuoteResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo quote: {e}")))?;

    if let Some(error) = &response.quote_response.error {
        return Err(SourceError::unavailable(format!(
            "yahoo quote API error: {}",
            error.describe()
        )));
    }

    let quote = response
        .quote_response
        .result
        .into_iter()
        .find(|quote| quote.symbol.eq_ignore_ascii_case(symbol.as_str()))
        .ok_or_else(|| SourceError::not_found(format!("no quote metadata for {symbol}")))?;

    Ok(InstrumentInfo {
        short_name: quote.short_name,
        long_name: quote.long_name,
        currency: quote.currency,
        exchange: quote.exchange,
        quote_type: quote.quote_type,
    })
}

fn history_from_result(result: YahooChartResult) -> PriceHistory {
    let closes = result
        .indicators
        .and_then(|indicators| indicators.quote.into_iter().next())
        .map(|block| block.close)
        .unwrap_or_default();

    PriceHistory::new(closes)
}

fn api_error_description(body: &str) -> Option<String> {
    let parsed: YahooErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .chart
        .and_then(|chart| chart.error)
        .or_else(|| parsed.finance.and_then(|finance| finance.error))
        .map(|error| error.describe())
}
