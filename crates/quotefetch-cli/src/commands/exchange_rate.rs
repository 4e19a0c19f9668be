use quotefetch_core::{fetch_rate, CurrencyPair, MarketDataProvider, ResponseData, ResultEnvelope};
use tracing::info;

pub async fn run(
    provider: &dyn MarketDataProvider,
    pair: &CurrencyPair,
) -> ResultEnvelope<ResponseData> {
    let rate = fetch_rate(provider, pair).await;
    info!(pair = %pair, source = %rate.source, rate = rate.rate, "exchange rate complete");

    ResultEnvelope::from_exchange_rate(rate)
}
