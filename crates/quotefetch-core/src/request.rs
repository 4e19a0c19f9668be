use tracing::warn;

use crate::domain::CurrencyPair;
use crate::{Symbol, ValidationError};

/// What one invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Quotes(Vec<Symbol>),
    ExchangeRate(CurrencyPair),
}

impl FetchRequest {
    /// Resolves raw `--symbols` / `--exchange_rate` values. Empty values count
    /// as absent; when both are given the symbols win.
    pub fn resolve(
        symbols: Option<&str>,
        exchange_rate: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let symbols = symbols.filter(|value| !value.is_empty());
        let exchange_rate = exchange_rate.filter(|value| !value.is_empty());

        match (symbols, exchange_rate) {
            (Some(raw), Some(pair)) => {
                warn!(pair, "--symbols given; ignoring --exchange_rate");
                parse_symbols(raw).map(Self::Quotes)
            }
            (Some(raw), None) => parse_symbols(raw).map(Self::Quotes),
            (None, Some(raw)) => CurrencyPair::parse(raw).map(Self::ExchangeRate),
            (None, None) => Err(ValidationError::NoArguments),
        }
    }
}

/// Splits a comma-separated symbol list, trimming entries and skipping blanks.
pub fn parse_symbols(raw: &str) -> Result<Vec<Symbol>, ValidationError> {
    let symbols = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(Symbol::normalize)
        .collect::<Vec<_>>();

    if symbols.is_empty() {
        return Err(ValidationError::EmptySymbolList {
            value: raw.to_owned(),
        });
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_trimmed_and_normalized() {
        let request = FetchRequest::resolve(Some(" 7203, AAPL ,,6758.T"), None).expect("valid");

        assert_eq!(
            request,
            FetchRequest::Quotes(vec![
                Symbol::normalize("7203.T"),
                Symbol::normalize("AAPL"),
                Symbol::normalize("6758.T"),
            ])
        );
    }

    #[test]
    fn blank_symbol_list_is_rejected() {
        assert!(matches!(
            FetchRequest::resolve(Some(" , "), None),
            Err(ValidationError::EmptySymbolList { .. })
        ));
    }

    #[test]
    fn exchange_rate_mode_parses_pair() {
        let request = FetchRequest::resolve(None, Some("usdjpy")).expect("valid");
        let FetchRequest::ExchangeRate(pair) = request else {
            panic!("expected exchange rate request");
        };
        assert_eq!(pair.code(), "USDJPY");
    }

    #[test]
    fn missing_mode_is_rejected() {
        let missing = FetchRequest::resolve(None, Some("")).expect_err("must fail");
        assert_eq!(
            missing.to_string(),
            "No arguments provided. Please specify --symbols or --exchange_rate."
        );
    }

    #[test]
    fn symbols_take_precedence_over_exchange_rate() {
        assert_eq!(
            FetchRequest::resolve(Some("AAPL"), Some("USDJPY")),
            Ok(FetchRequest::Quotes(vec![Symbol::normalize("AAPL")]))
        );
        // The ignored pair is not validated.
        assert!(matches!(
            FetchRequest::resolve(Some("7203"), Some("X")),
            Ok(FetchRequest::Quotes(_))
        ));
    }

    #[test]
    fn short_pair_is_rejected() {
        assert_eq!(
            FetchRequest::resolve(None, Some("USD")),
            Err(ValidationError::InvalidExchangeRatePair {
                value: String::from("USD")
            })
        );
    }
}
