use aws_sdk_dynamodb::Client as DynamoClient;
use catalog_shared::{config::GatewayConfig, store::DynamoStore, AppState};
use lambda_http::{run, service_fn, tracing, Error, Request};
use std::sync::Arc;

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = GatewayConfig::from_env();

    // Initialize the DynamoDB client once at startup
    let aws_config = aws_config::load_from_env().await;
    let dynamo_client = match config.dynamodb_endpoint.as_deref() {
        Some(endpoint) => {
            tracing::info!("Using DynamoDB endpoint override {}", endpoint);
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&aws_config)
                .endpoint_url(endpoint)
                .build();
            DynamoClient::from_conf(dynamo_config)
        }
        None => DynamoClient::new(&aws_config),
    };

    let state = AppState::new(Arc::new(DynamoStore::new(dynamo_client)), &config);

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}
