//! Crypto-to-crypto currency converter
//!
//! Self-contained: spot prices come straight from `/simple/price` and do not
//! depend on the dashboard's currency or listing.

use crate::{
    error::ConversionError,
    gateway::MarketDataGateway,
    loadable::Loadable,
    types::Currency,
};
use std::collections::HashMap;
use std::sync::Arc;

/// An asset offered by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertibleAsset {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

/// Assets offered by default
pub const POPULAR_ASSETS: &[ConvertibleAsset] = &[
    ConvertibleAsset {
        id: "bitcoin",
        name: "Bitcoin",
        symbol: "BTC",
    },
    ConvertibleAsset {
        id: "ethereum",
        name: "Ethereum",
        symbol: "ETH",
    },
    ConvertibleAsset {
        id: "binancecoin",
        name: "BNB",
        symbol: "BNB",
    },
    ConvertibleAsset {
        id: "cardano",
        name: "Cardano",
        symbol: "ADA",
    },
    ConvertibleAsset {
        id: "solana",
        name: "Solana",
        symbol: "SOL",
    },
    ConvertibleAsset {
        id: "polkadot",
        name: "Polkadot",
        symbol: "DOT",
    },
    ConvertibleAsset {
        id: "dogecoin",
        name: "Dogecoin",
        symbol: "DOGE",
    },
    ConvertibleAsset {
        id: "avalanche-2",
        name: "Avalanche",
        symbol: "AVAX",
    },
    ConvertibleAsset {
        id: "chainlink",
        name: "Chainlink",
        symbol: "LINK",
    },
    ConvertibleAsset {
        id: "litecoin",
        name: "Litecoin",
        symbol: "LTC",
    },
];

/// `amount * from_rate / to_rate`, where both rates are prices in a common
/// quote currency.
pub fn convert_amount(amount: f64, from_rate: f64, to_rate: f64) -> Result<f64, ConversionError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ConversionError::InvalidAmount(amount.to_string()));
    }
    for (asset, rate) in [("source", from_rate), ("target", to_rate)] {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConversionError::NonPositiveRate {
                asset: asset.to_string(),
                rate,
            });
        }
    }
    Ok(amount * from_rate / to_rate)
}

/// Converter state: two selections, an amount and the USD spot prices
pub struct CurrencyConverter {
    gateway: Arc<dyn MarketDataGateway>,
    assets: Vec<ConvertibleAsset>,
    from: &'static str,
    to: &'static str,
    amount: Option<f64>,
    result: Option<f64>,
    rates: Loadable<HashMap<String, f64>>,
}

impl CurrencyConverter {
    /// Bitcoin to Ethereum over the popular assets
    pub fn new(gateway: Arc<dyn MarketDataGateway>) -> Self {
        Self {
            gateway,
            assets: POPULAR_ASSETS.to_vec(),
            from: "bitcoin",
            to: "ethereum",
            amount: None,
            result: None,
            rates: Loadable::Idle,
        }
    }

    pub fn assets(&self) -> &[ConvertibleAsset] {
        &self.assets
    }

    pub fn from_asset(&self) -> &'static str {
        self.from
    }

    pub fn to_asset(&self) -> &'static str {
        self.to
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    /// Last converted amount
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn rates(&self) -> &Loadable<HashMap<String, f64>> {
        &self.rates
    }

    fn find(&self, id: &str) -> Option<&ConvertibleAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Selects the source asset; unknown ids are ignored
    pub fn select_from(&mut self, id: &str) -> bool {
        match self.find(id).map(|a| a.id) {
            Some(id) => {
                self.from = id;
                self.result = None;
                true
            }
            None => false,
        }
    }

    /// Selects the target asset; unknown ids are ignored
    pub fn select_to(&mut self, id: &str) -> bool {
        match self.find(id).map(|a| a.id) {
            Some(id) => {
                self.to = id;
                self.result = None;
                true
            }
            None => false,
        }
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = Some(amount);
        self.result = None;
    }

    /// Parses typed input; a blank field clears the amount
    pub fn set_amount_text(&mut self, text: &str) -> Result<(), ConversionError> {
        let text = text.trim();
        if text.is_empty() {
            self.amount = None;
            self.result = None;
            return Ok(());
        }
        let amount = text
            .parse::<f64>()
            .map_err(|_| ConversionError::InvalidAmount(text.to_string()))?;
        self.set_amount(amount);
        Ok(())
    }

    /// Fetches USD spot prices for every offered asset
    pub async fn refresh_rates(&mut self) {
        self.rates.reload();
        let ids: Vec<String> = self.assets.iter().map(|a| a.id.to_string()).collect();

        let result = self
            .gateway
            .simple_price(&ids, &[Currency::Usd])
            .await
            .map(|prices| {
                ids.iter()
                    .filter_map(|id| prices.price(id, Currency::Usd).map(|p| (id.clone(), p)))
                    .collect::<HashMap<_, _>>()
            });

        match &result {
            Ok(rates) => tracing::debug!(count = rates.len(), "Exchange rates fetched"),
            Err(e) => tracing::warn!(error = %e, "Failed to fetch exchange rates"),
        }

        self.rates = Loadable::settle(result, HashMap::new);
    }

    /// USD price of one unit of `id`
    pub fn rate(&self, id: &str) -> Result<f64, ConversionError> {
        let rate = self
            .rates
            .data()
            .and_then(|r| r.get(id))
            .copied()
            .ok_or_else(|| ConversionError::missing_rate(id))?;
        if rate <= 0.0 || !rate.is_finite() {
            return Err(ConversionError::NonPositiveRate {
                asset: id.to_string(),
                rate,
            });
        }
        Ok(rate)
    }

    /// Converts the current amount and remembers the result
    pub fn convert(&mut self) -> Result<f64, ConversionError> {
        let amount = self
            .amount
            .ok_or_else(|| ConversionError::InvalidAmount("no amount entered".to_string()))?;
        let result = convert_amount(amount, self.rate(self.from)?, self.rate(self.to)?)?;
        self.result = Some(result);
        Ok(result)
    }

    /// How many `to` units one `from` unit buys
    pub fn unit_rate(&self) -> Result<f64, ConversionError> {
        convert_amount(1.0, self.rate(self.from)?, self.rate(self.to)?)
    }

    /// Exchanges the selections and seeds the amount with the last result
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        self.amount = Some(self.result.take().unwrap_or(0.0));
    }

    /// Result line, e.g. `15.234000 ETH`
    pub fn result_label(&self) -> String {
        let symbol = self.find(self.to).map_or("", |a| a.symbol);
        format!("{:.6} {}", self.result.unwrap_or(0.0), symbol)
    }
}
