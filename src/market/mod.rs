pub mod normalize;
pub mod yahoo;

use crate::{
    error::Result,
    logger::error_chain,
    models::{FinancialData, StockReport},
};
use async_trait::async_trait;

pub use normalize::{encode_cell, table_to_records, to_json_serializable};
pub use yahoo::YahooFinanceClient;

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn earnings_history(&self, symbol: &str) -> Result<FinancialData>;
    async fn eps_trend(&self, symbol: &str) -> Result<FinancialData>;
}

/// Fetches earnings history and EPS trend for `symbol`.
///
/// Never fails: any fetch or encoding error is logged and reported as
/// `{"error": ...}` without saying which metric caused it.
pub async fn fetch_stock_data(source: &dyn MarketDataSource, symbol: &str) -> StockReport {
    match collect_stock_data(source, symbol).await {
        Ok(report) => report,
        Err(e) => {
            log::error!("Error fetching stock data for {}: {}", symbol, error_chain(&e));
            StockReport::Error {
                error: e.to_string(),
            }
        }
    }
}

async fn collect_stock_data(source: &dyn MarketDataSource, symbol: &str) -> Result<StockReport> {
    let earnings = to_json_serializable(source.earnings_history(symbol).await?)?;
    let eps = to_json_serializable(source.eps_trend(symbol).await?)?;
    Ok(StockReport::Data { earnings, eps })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FunctionError;
    use crate::models::{Cell, Table};
    use serde_json::json;

    struct FixedSource {
        earnings: fn() -> Result<FinancialData>,
        eps: fn() -> Result<FinancialData>,
    }

    #[async_trait]
    impl MarketDataSource for FixedSource {
        async fn earnings_history(&self, _symbol: &str) -> Result<FinancialData> {
            (self.earnings)()
        }

        async fn eps_trend(&self, _symbol: &str) -> Result<FinancialData> {
            (self.eps)()
        }
    }

    fn empty_earnings() -> Result<FinancialData> {
        Ok(FinancialData::Table(Table::new("quarter", vec!["epsActual".into()])))
    }

    fn empty_eps() -> Result<FinancialData> {
        Ok(FinancialData::Table(Table::new("period", vec!["current".into()])))
    }

    fn provider_down() -> Result<FinancialData> {
        Err(FunctionError::MarketData("Too Many Requests".into()))
    }

    fn bad_cell() -> Result<FinancialData> {
        let mut table = Table::new("period", vec!["growth".into()]);
        table.push_row("0q".into(), vec![Cell::Unsupported("dict".into())]);
        Ok(FinancialData::Table(table))
    }

    #[tokio::test]
    async fn test_empty_tables() {
        let source = FixedSource {
            earnings: empty_earnings,
            eps: empty_eps,
        };
        let report = fetch_stock_data(&source, "LYB").await;
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            json!({"EARNINGS": [], "EPS": []})
        );
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_error_mapping() {
        let source = FixedSource {
            earnings: empty_earnings,
            eps: provider_down,
        };
        let report = fetch_stock_data(&source, "LYB").await;
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            json!({"error": "Market data error: Too Many Requests"})
        );
    }

    #[tokio::test]
    async fn test_type_error_becomes_error_mapping() {
        let source = FixedSource {
            earnings: bad_cell,
            eps: empty_eps,
        };
        let report = fetch_stock_data(&source, "LYB").await;
        assert_eq!(
            report,
            StockReport::Error {
                error: "Object of type dict is not JSON serializable".into()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_module_passes_through_as_null() {
        fn missing() -> Result<FinancialData> {
            Ok(FinancialData::Value(serde_json::Value::Null))
        }
        let source = FixedSource {
            earnings: missing,
            eps: empty_eps,
        };
        let report = fetch_stock_data(&source, "LYB").await;
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            json!({"EARNINGS": null, "EPS": []})
        );
    }
}
