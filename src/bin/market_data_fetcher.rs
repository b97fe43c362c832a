use lambda_runtime::{service_fn, Error, LambdaEvent};
use rgenpage::{
    handlers::handle_market_event,
    logger::{self, LoggerConfig},
    MarketDataConfig, StockReport, YahooFinanceClient,
};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_with_config(LoggerConfig::from_env().with_prefix("market_data_fetcher"))
        .map_err(Error::from)?;

    let config = MarketDataConfig::from_env();
    log::info!("🚀 Starting market_data_fetcher against {}", config.base_url);
    let client = YahooFinanceClient::new(config)?;
    let source = &client;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        logger::set_request_id(Some(event.context.request_id.clone()));
        let report: StockReport = handle_market_event(&event.payload, source).await;
        logger::set_request_id(None);
        Ok::<StockReport, Error>(report)
    }))
    .await
}
