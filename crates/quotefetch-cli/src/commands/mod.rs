mod exchange_rate;
mod quote;

use quotefetch_core::{
    FetchRequest, MarketDataProvider, ResponseData, ResultEnvelope, YahooAdapter,
};
use tracing::warn;

use crate::cli::Cli;

/// Resolves the arguments and runs the requested fetch against Yahoo.
///
/// Validation problems are reported inside the envelope, not as errors.
pub async fn run(cli: &Cli) -> ResultEnvelope<ResponseData> {
    let request = match FetchRequest::resolve(cli.symbols.as_deref(), cli.exchange_rate.as_deref())
    {
        Ok(request) => request,
        Err(error) => {
            warn!(%error, "rejected arguments");
            return ResultEnvelope::failure(error);
        }
    };

    let config = match cli.fetch_config() {
        Ok(config) => config,
        Err(error) => {
            warn!(%error, "rejected configuration");
            return ResultEnvelope::failure(error);
        }
    };

    let adapter = YahooAdapter::new(&config);
    dispatch(&adapter, &request).await
}

pub async fn dispatch(
    provider: &dyn MarketDataProvider,
    request: &FetchRequest,
) -> ResultEnvelope<ResponseData> {
    match request {
        FetchRequest::Quotes(symbols) => quote::run(provider, symbols).await,
        FetchRequest::ExchangeRate(pair) => exchange_rate::run(provider, pair).await,
    }
}
