//! Market-data gateway implementations

pub mod coingecko;

pub use coingecko::CoinGeckoGateway;
