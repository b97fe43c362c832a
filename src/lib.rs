//! Serverless functions around AWS Bedrock image generation and S3.
//!
//! - `image_generator`: prompt in, presigned PNG link out.
//! - `sale_page_generator`: Bedrock Agents action that renders a sale page
//!   around a generated image and returns a presigned link to the page.
//! - `market_data_fetcher`: earnings history and EPS trend for a ticker as JSON.

pub mod bedrock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logger;
pub mod market;
pub mod models;
pub mod page;
pub mod storage;

pub use bedrock::{ImageClient, ImageGenerator};
pub use config::{AwsConfig, FunctionConfig, ImageSettings, MarketDataConfig};
pub use error::{FunctionError, Result};
pub use handlers::Services;
pub use market::{fetch_stock_data, MarketDataSource, YahooFinanceClient};
pub use models::*;
pub use page::render_sale_page;
pub use storage::{ObjectStore, PresignedUrl, S3ObjectStore};
