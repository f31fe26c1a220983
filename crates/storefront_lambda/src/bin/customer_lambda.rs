use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use storefront_lambda::adapters::aws::load_sdk_config;
use storefront_lambda::adapters::dynamodb::DynamoCustomerStore;
use storefront_lambda::handlers::customer::{handle_customer_event, CustomerHandlerConfig};
use storefront_lambda::handlers::response::{ApiGatewayResponse, HandlerError};
use storefront_lambda::logging::log_error;
use storefront_lambda::runtime::config::FunctionConfig;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let config = match FunctionConfig::from_env() {
        Ok(value) => value,
        Err(error) => {
            log_error(
                "customer_lambda",
                "config_invalid",
                json!({ "error": error.message() }),
            );
            return Ok(HandlerError::misconfiguration(error.message()).into_response());
        }
    };

    let aws_config = load_sdk_config(config.region.as_deref()).await;
    let store = DynamoCustomerStore::new(aws_sdk_dynamodb::Client::new(&aws_config));

    Ok(handle_customer_event(
        event.payload,
        &CustomerHandlerConfig::from(&config),
        &store,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
