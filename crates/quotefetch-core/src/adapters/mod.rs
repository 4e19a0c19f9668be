//! Provider adapters implementing [`crate::MarketDataProvider`].

mod yahoo;

pub use yahoo::YahooAdapter;
