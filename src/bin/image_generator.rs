use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use rgenpage::{
    handlers::{handle_image_event, Services},
    logger::{self, LoggerConfig},
    FunctionConfig, HttpResponse, ImageClient, S3ObjectStore,
};
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    services: Services<'_>,
) -> Result<HttpResponse, Error> {
    logger::set_request_id(Some(event.context.request_id.clone()));
    let response = handle_image_event(event.payload, services, Utc::now()).await;
    logger::set_request_id(None);
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_with_config(LoggerConfig::from_env().with_prefix("image_generator"))
        .map_err(Error::from)?;

    let config = FunctionConfig::from_env();
    logger::log_function_start("image_generator", &config);

    let images = ImageClient::from_config(&config.bedrock).await;
    let store = S3ObjectStore::from_config(&config.s3).await;
    let services = Services::new(&images, &store, &config);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, services).await
    }))
    .await
}
