use crate::{
    config::MarketDataConfig,
    error::{FunctionError, Result},
    market::MarketDataSource,
    models::{Cell, FinancialData, Table},
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;

pub const EARNINGS_HISTORY_MODULE: &str = "earningsHistory";
pub const EARNINGS_TREND_MODULE: &str = "earningsTrend";

pub const EARNINGS_HISTORY_COLUMNS: [&str; 4] =
    ["epsActual", "epsEstimate", "epsDifference", "surprisePercent"];
pub const EPS_TREND_COLUMNS: [&str; 5] = ["current", "7daysAgo", "30daysAgo", "60daysAgo", "90daysAgo"];

/// Yahoo Finance `quoteSummary` client.
///
/// Every query carries a crumb that Yahoo ties to a session cookie. The
/// cookie and crumb are fetched on first use, cached for the lifetime of the
/// client, and renewed once when the provider answers 401.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
    cookie_url: String,
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceClient {
    pub fn new(config: MarketDataConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie_url: config.cookie_url,
            crumb: Mutex::new(config.crumb),
        })
    }

    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }
        let crumb = self.open_session().await?;
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn forget_crumb(&self) {
        *self.crumb.lock().await = None;
    }

    /// Picks up the session cookie, then asks for a crumb bound to it.
    async fn open_session(&self) -> Result<String> {
        log::info!("Opening market data session via {}", self.cookie_url);

        // The cookie endpoint answers 404 but still sets the cookie.
        if let Err(e) = self.client.get(&self.cookie_url).send().await {
            log::warn!("Session cookie request failed: {}", e);
        }

        let response = self
            .client
            .get(format!("{}/v1/test/getcrumb", self.base_url))
            .send()
            .await?;
        let status = response.status();
        let crumb = response.text().await?.trim().to_string();

        if !status.is_success() || crumb.is_empty() {
            return Err(FunctionError::MarketData(format!(
                "HTTP {} fetching crumb",
                status
            )));
        }
        log::debug!("Obtained market data crumb");
        Ok(crumb)
    }

    async fn query(&self, symbol: &str, module: &str, crumb: &str) -> Result<(StatusCode, Value)> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);

        log::info!("Fetching {} for {}", module, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("modules", module), ("crumb", crumb)])
            .send()
            .await?;
        let status = response.status();

        // Yahoo puts a structured error in the body even on 4xx.
        match response.json().await {
            Ok(body) => Ok((status, body)),
            Err(_) if !status.is_success() => Ok((status, Value::Null)),
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch_module(&self, symbol: &str, module: &str) -> Result<Option<Value>> {
        let crumb = self.crumb().await?;
        let (mut status, mut body) = self.query(symbol, module, &crumb).await?;

        if status == StatusCode::UNAUTHORIZED {
            log::warn!(
                "Crumb rejected for {} ({}), renewing session",
                symbol,
                provider_error(&body).unwrap_or_else(|| status.to_string())
            );
            self.forget_crumb().await;
            let crumb = self.crumb().await?;
            (status, body) = self.query(symbol, module, &crumb).await?;
        }

        if !status.is_success() && provider_error(&body).is_none() {
            return Err(FunctionError::MarketData(format!(
                "HTTP {} fetching {} for {}",
                status, module, symbol
            )));
        }
        extract_module(&body, module)
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    async fn earnings_history(&self, symbol: &str) -> Result<FinancialData> {
        let module = self.fetch_module(symbol, EARNINGS_HISTORY_MODULE).await?;
        Ok(match module {
            Some(module) => FinancialData::Table(parse_earnings_history(&module)),
            None => FinancialData::Value(Value::Null),
        })
    }

    async fn eps_trend(&self, symbol: &str) -> Result<FinancialData> {
        let module = self.fetch_module(symbol, EARNINGS_TREND_MODULE).await?;
        Ok(match module {
            Some(module) => FinancialData::Table(parse_eps_trend(&module)),
            None => FinancialData::Value(Value::Null),
        })
    }
}

/// The provider's own error text. Auth and rate-limit failures arrive under
/// `finance`, lookup failures under `quoteSummary`.
fn provider_error(body: &Value) -> Option<String> {
    ["finance", "quoteSummary"].iter().find_map(|section| {
        let error = body.get(*section)?.get("error").filter(|e| !e.is_null())?;
        Some(
            error
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
        )
    })
}

/// Pulls one module out of a `quoteSummary` body, surfacing provider errors.
pub fn extract_module(body: &Value, module: &str) -> Result<Option<Value>> {
    if let Some(message) = provider_error(body) {
        return Err(FunctionError::MarketData(message));
    }

    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| FunctionError::MarketData("missing quoteSummary in response".into()))?;

    Ok(summary
        .get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .and_then(|result| result.get(module))
        .cloned())
}

/// One row per reported quarter, indexed by the quarter end.
pub fn parse_earnings_history(module: &Value) -> Table {
    let mut table = Table::new(
        "quarter",
        EARNINGS_HISTORY_COLUMNS.iter().map(|c| c.to_string()).collect(),
    );

    for entry in entries(module, "history") {
        let quarter = entry.get("quarter").map_or(Cell::Null, timestamp_cell);
        let row = EARNINGS_HISTORY_COLUMNS
            .iter()
            .map(|column| entry.get(*column).map_or(Cell::Null, cell_from_value))
            .collect();
        table.push_row(quarter, row);
    }
    table
}

/// One row per estimate period (`0q`, `+1q`, `0y`, `+1y`).
pub fn parse_eps_trend(module: &Value) -> Table {
    let mut table = Table::new(
        "period",
        EPS_TREND_COLUMNS.iter().map(|c| c.to_string()).collect(),
    );

    for entry in entries(module, "trend") {
        let period = entry.get("period").map_or(Cell::Null, cell_from_value);
        let trend = entry.get("epsTrend");
        let row = EPS_TREND_COLUMNS
            .iter()
            .map(|column| {
                trend
                    .and_then(|t| t.get(*column))
                    .map_or(Cell::Null, cell_from_value)
            })
            .collect();
        table.push_row(period, row);
    }
    table
}

fn entries<'a>(module: &'a Value, field: &str) -> impl Iterator<Item = &'a Value> {
    module
        .get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn timestamp_cell(value: &Value) -> Cell {
    let raw = value.get("raw").unwrap_or(value);
    match raw.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()) {
        Some(ts) => Cell::Timestamp(ts),
        None => cell_from_value(value),
    }
}

/// Yahoo wraps numbers as `{"raw": .., "fmt": ..}`; empty objects mean missing.
pub fn cell_from_value(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => n.as_f64().map_or(Cell::Null, Cell::Float),
        },
        Value::String(s) => Cell::Text(s.clone()),
        Value::Object(map) => match map.get("raw") {
            Some(raw) => cell_from_value(raw),
            None if map.is_empty() => Cell::Null,
            None => Cell::Unsupported("dict".to_string()),
        },
        Value::Array(_) => Cell::Unsupported("list".to_string()),
    }
}
