//! Behavior-driven tests for exchange rate lookup.

mod support;

use quotefetch_core::{
    fetch_rate, CurrencyPair, PriceHistory, RateSource, ResponseData, ResultEnvelope,
    SourceError,
};
use support::{capture_logs, ScriptedProvider};

fn pair(code: &str) -> CurrencyPair {
    CurrencyPair::parse(code).expect("valid pair")
}

#[tokio::test]
async fn when_currencies_match_system_returns_direct_rate_without_provider_call() {
    // Given: A provider that would fail every call
    let provider = ScriptedProvider::new();

    // When: The system resolves JPYJPY
    let rate = fetch_rate(&provider, &pair("JPYJPY")).await;

    // Then: Rate 1.0 comes from the identity rule
    assert_eq!(rate.rate, 1.0);
    assert_eq!(rate.source, RateSource::Direct);
    assert!(rate.error.is_none());
    assert!(provider.calls().is_empty());
    assert!(ResultEnvelope::from_exchange_rate(rate).success);
}

#[tokio::test]
async fn when_provider_has_a_close_system_reports_it() {
    // Given: Yahoo reports 151.25 for USDJPY=X
    let provider = ScriptedProvider::new()
        .with_history("USDJPY=X", Ok(PriceHistory::new(vec![Some(151.25)])));

    // When: The system resolves USDJPY
    let rate = fetch_rate(&provider, &pair("USDJPY")).await;

    // Then: The provider value is reported under its display name
    assert_eq!(rate.rate, 151.25);
    assert_eq!(rate.source, RateSource::Provider(quotefetch_core::ProviderId::Yahoo));
    assert_eq!(provider.calls(), vec!["history:USDJPY=X"]);

    let envelope = ResultEnvelope::from_exchange_rate(rate);
    let value = serde_json::to_value(&envelope).expect("serializable");
    assert_eq!(value["success"], true);
    assert_eq!(value["data"]["source"], "Yahoo Finance");
    assert_eq!(value["data"]["from_currency"], "USD");
}

#[tokio::test]
async fn when_provider_has_no_data_system_uses_the_table_rate() {
    // Given: Yahoo returns an empty series for USDJPY=X
    let provider = ScriptedProvider::new()
        .with_history("USDJPY=X", Ok(PriceHistory::new(vec![None])));

    // When: The system resolves USDJPY
    let rate = fetch_rate(&provider, &pair("USDJPY")).await;

    // Then: The fallback rate is reported as a failure
    assert_eq!(rate.rate, 150.0);
    assert_eq!(rate.source, RateSource::Fallback);

    let envelope = ResultEnvelope::from_exchange_rate(rate);
    assert!(!envelope.success);
    assert_eq!(
        envelope.error.as_deref(),
        Some("No exchange rate data found for USDJPY=X")
    );
    assert!(matches!(envelope.data, Some(ResponseData::ExchangeRate(_))));
}

#[tokio::test]
async fn when_pair_is_not_in_the_table_system_defaults_to_one() {
    // Given: The request itself fails for an unlisted pair
    let provider = ScriptedProvider::new()
        .with_history("GBPCHF=X", Err(SourceError::unavailable("timed out")));

    // When: The system resolves GBPCHF
    let rate = fetch_rate(&provider, &pair("GBPCHF")).await;

    // Then: The default fallback rate applies and the cause is kept
    assert_eq!(rate.rate, 1.0);
    assert_eq!(rate.source, RateSource::Fallback);
    assert!(rate.error.as_deref().is_some_and(|e| e.contains("timed out")));
    assert!(!ResultEnvelope::from_exchange_rate(rate).success);
}

#[tokio::test]
async fn when_provider_reports_zero_system_falls_back() {
    // Given: A nonsensical zero close
    let provider =
        ScriptedProvider::new().with_history("EURUSD=X", Ok(PriceHistory::new(vec![Some(0.0)])));

    // When: The system resolves EURUSD
    let rate = fetch_rate(&provider, &pair("EURUSD")).await;

    // Then: The table value replaces it
    assert_eq!(rate.rate, 1.08);
    assert!(rate
        .error
        .as_deref()
        .is_some_and(|e| e.starts_with("invalid exchange rate")));
}

#[tokio::test]
async fn when_fallback_is_used_system_logs_a_warning() {
    // Given: Log capture and a provider without data
    let (logs, _guard) = capture_logs();
    let provider = ScriptedProvider::new();

    // When: The system resolves JPYUSD
    let rate = fetch_rate(&provider, &pair("JPYUSD")).await;

    // Then: The fallback is visible in diagnostics, not on stdout
    assert_eq!(rate.rate, 0.0067);
    let output = logs.contents();
    assert!(output.contains("using fallback exchange rate"), "{output}");
    assert!(output.contains("JPY/USD"), "{output}");
}

#[tokio::test]
async fn when_pair_contains_a_space_system_still_queries_the_provider() {
    // Given: A pair whose base slice ends in a space
    let provider = ScriptedProvider::new();

    // When: The system resolves "US JPY"
    let rate = fetch_rate(&provider, &pair("US JPY")).await;

    // Then: The sliced codes are used as-is and the table default applies
    assert_eq!(provider.calls(), vec!["history:US JPY=X"]);
    assert_eq!(rate.from_currency.as_str(), "US ");
    assert_eq!(rate.rate, 1.0);
    assert_eq!(rate.source, RateSource::Fallback);
}
