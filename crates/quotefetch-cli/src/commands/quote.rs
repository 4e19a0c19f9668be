use quotefetch_core::{fetch_quotes, MarketDataProvider, ResponseData, ResultEnvelope, Symbol};
use tracing::info;

pub async fn run(
    provider: &dyn MarketDataProvider,
    symbols: &[Symbol],
) -> ResultEnvelope<ResponseData> {
    let batch = fetch_quotes(provider, symbols).await;
    info!(
        priced = batch.quotes().count(),
        failed = batch.failures().count(),
        "quote fetch complete"
    );

    ResultEnvelope::from_quotes(batch)
}
