use chrono::Utc;
use rgenpage::{
    handlers::{handle_image_event, handle_sale_page_event, Services},
    logger::{self, LoggerConfig},
    ActionParameter, AgentActionEvent, FunctionConfig, ImageClient, MarketDataConfig,
    S3ObjectStore, YahooFinanceClient,
};
use serde_json::json;
use std::env;

const USAGE: &str = "usage: rgenpage image <prompt> | page <prompt> <text> | market [SYMBOL]";

fn parameter(name: &str, value: String) -> ActionParameter {
    ActionParameter {
        name: Some(name.to_string()),
        kind: Some("string".to_string()),
        value: Some(value),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    logger::init_with_config(LoggerConfig::development())?;

    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "market".to_string());

    match command.as_str() {
        "market" => {
            let symbol = args.next().unwrap_or_else(|| "LYB".to_string());
            let client = YahooFinanceClient::new(MarketDataConfig::from_env())?;
            let report = rgenpage::fetch_stock_data(&client, &symbol).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "image" | "page" => {
            let config = FunctionConfig::from_env();
            logger::log_function_start("rgenpage", &config);

            log::info!("🔄 Creating Bedrock and S3 clients...");
            let images = ImageClient::from_config(&config.bedrock).await;
            let store = S3ObjectStore::from_config(&config.s3).await;
            let services = Services::new(&images, &store, &config);

            let prompt = args.next().ok_or(USAGE)?;
            if command == "image" {
                let response = handle_image_event(json!({ "prompt": prompt }), services, Utc::now()).await;
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                let text = args.next().unwrap_or_default();
                let event = AgentActionEvent {
                    message_version: Some("1.0".to_string()),
                    action_group: Some("local".to_string()),
                    function: Some("generate_sale_page".to_string()),
                    parameters: vec![parameter("prompt", prompt), parameter("text", text)],
                    ..Default::default()
                };
                let response = handle_sale_page_event(&event, services, Utc::now()).await?;
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}
