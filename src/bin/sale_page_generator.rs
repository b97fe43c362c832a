use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use rgenpage::{
    handlers::{handle_sale_page_event, Services},
    logger::{self, error_chain, LoggerConfig},
    AgentActionEvent, AgentActionResponse, FunctionConfig, ImageClient, S3ObjectStore,
};
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    services: Services<'_>,
) -> Result<AgentActionResponse, Error> {
    logger::set_request_id(Some(event.context.request_id.clone()));

    let result = match serde_json::from_value::<AgentActionEvent>(event.payload) {
        Ok(action) => handle_sale_page_event(&action, services, Utc::now())
            .await
            .map_err(|e| {
                log::error!("Sale page generation failed: {}", error_chain(&e));
                Error::from(e)
            }),
        Err(e) => Err(Error::from(format!("invalid agent event: {}", e))),
    };

    logger::set_request_id(None);
    result
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_with_config(LoggerConfig::from_env().with_prefix("sale_page_generator"))
        .map_err(Error::from)?;

    let config = FunctionConfig::from_env();
    logger::log_function_start("sale_page_generator", &config);

    let images = ImageClient::from_config(&config.bedrock).await;
    let store = S3ObjectStore::from_config(&config.s3).await;
    let services = Services::new(&images, &store, &config);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, services).await
    }))
    .await
}
