use serde_json::Value;

use crate::{
    market::{fetch_stock_data, MarketDataSource},
    models::StockReport,
};

/// Accepts `"LYB"`, `{"symbol": "LYB"}` or `{"ticker": "LYB"}`.
pub fn parse_symbol(payload: &Value) -> Option<String> {
    let raw = match payload {
        Value::String(symbol) => Some(symbol.as_str()),
        Value::Object(map) => map
            .get("symbol")
            .or_else(|| map.get("ticker"))
            .and_then(Value::as_str),
        _ => None,
    };
    raw.map(str::trim)
        .filter(|symbol| !symbol.is_empty())
        .map(str::to_string)
}

pub async fn handle_market_event(payload: &Value, source: &dyn MarketDataSource) -> StockReport {
    match parse_symbol(payload) {
        Some(symbol) => {
            log::info!("Fetching stock data for {}", symbol);
            fetch_stock_data(source, &symbol).await
        }
        None => {
            log::warn!("⚠️  No ticker symbol in event: {}", payload);
            StockReport::Error {
                error: "missing ticker symbol".to_string(),
            }
        }
    }
}
