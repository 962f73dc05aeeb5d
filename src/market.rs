//! Market data fetch wrappers
//!
//! Stateless wrappers around a third-party market-data HTTP API for the
//! dashboard's ticker strips, plus a fixed suggestion table for symbol
//! lookup. Symbols that fail to resolve are skipped, never fatal.

use crate::error::AgentError;
use crate::Result;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Indian indices
pub const INDIAN_INDICES: &[(&str, &str)] = &[
    ("NIFTY 50", "^NSEI"),
    ("Sensex", "^BSESN"),
    ("Bank Nifty", "^NSEBANK"),
];

/// Global indices
pub const GLOBAL_INDICES: &[(&str, &str)] = &[
    ("S&P 500", "^GSPC"),
    ("Nasdaq", "^IXIC"),
    ("Dow Jones", "^DJI"),
];

/// Commodities
pub const COMMODITIES: &[(&str, &str)] = &[
    ("Gold", "GC=F"),
    ("Silver", "SI=F"),
    ("Crude Oil", "CL=F"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
    pub timestamp: DateTime<Utc>,
}

pub struct MarketDataClient {
    client: Client,
    base_url: String,
}

impl MarketDataClient {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the current quote for one symbol.
    pub async fn get_quote(&self, symbol: &str) -> Result<Quote> {
        let url = format!("{}/quote", self.base_url);

        let response = self
            .client
            .get(url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| {
                AgentError::MarketDataError(format!("quote request failed for {}: {}", symbol, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::MarketDataError(format!(
                "quote endpoint returned {} for {}",
                status, symbol
            )));
        }

        let quote = response.json::<Quote>().await.map_err(|e| {
            AgentError::MarketDataError(format!("invalid quote payload for {}: {}", symbol, e))
        })?;

        debug!(symbol = %symbol, price = quote.price, "fetched quote");

        Ok(quote)
    }

    /// Fetch quotes for a named symbol table. Failed symbols are skipped.
    pub async fn get_group(&self, table: &[(&str, &str)]) -> Vec<(String, Quote)> {
        let mut quotes = Vec::with_capacity(table.len());

        for (name, symbol) in table {
            match self.get_quote(symbol).await {
                Ok(quote) => quotes.push((name.to_string(), quote)),
                Err(e) => warn!(symbol = %symbol, "skipping symbol: {}", e),
            }
        }

        quotes
    }
}

//
// ================= Suggestion search =================
//

const INDIAN_STOCKS: &[(&str, &str)] = &[
    ("TCS", "Tata Consultancy Services"),
    ("INFY", "Infosys Limited"),
    ("WIPRO", "Wipro Limited"),
    ("RELIANCE", "Reliance Industries"),
    ("HDFC", "HDFC Bank"),
    ("ICICIBANK", "ICICI Bank"),
    ("SBIN", "State Bank of India"),
    ("BAJAJ-AUTO", "Bajaj Auto"),
    ("MARUTI", "Maruti Suzuki"),
    ("ITC", "ITC Limited"),
    ("LT", "Larsen & Toubro"),
    ("ONGC", "Oil and Natural Gas Corporation"),
];

const US_STOCKS: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("TSLA", "Tesla Inc."),
    ("META", "Meta Platforms"),
    ("NVDA", "NVIDIA Corporation"),
    ("JPM", "JPMorgan Chase"),
    ("V", "Visa Inc."),
    ("NFLX", "Netflix Inc."),
    ("INTC", "Intel Corporation"),
    ("BA", "Boeing Co."),
];

/// Case-insensitive substring search over the fixed ticker/name table.
/// Returns at most 10 (ticker, name) pairs.
pub fn search_stock_suggestions(query: &str) -> Vec<(&'static str, &'static str)> {
    if query.is_empty() {
        return Vec::new();
    }

    let query_lower = query.to_lowercase();

    INDIAN_STOCKS
        .iter()
        .chain(US_STOCKS.iter())
        .filter(|(ticker, name)| {
            ticker.to_lowercase().contains(&query_lower)
                || name.to_lowercase().contains(&query_lower)
        })
        .take(10)
        .copied()
        .collect()
}
