use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use storefront_lambda::adapters::aws::load_sdk_config;
use storefront_lambda::adapters::sqs::SqsOrderQueue;
use storefront_lambda::handlers::place_order::handle_place_order_event;
use storefront_lambda::handlers::response::{ApiGatewayResponse, HandlerError};
use storefront_lambda::logging::log_error;
use storefront_lambda::runtime::config::FunctionConfig;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let config = match FunctionConfig::from_env() {
        Ok(value) => value,
        Err(error) => {
            log_error(
                "place_order_lambda",
                "config_invalid",
                json!({ "error": error.message() }),
            );
            return Ok(HandlerError::misconfiguration(error.message()).into_response());
        }
    };

    let aws_config = load_sdk_config(config.region.as_deref()).await;
    // An unset URL is answered by the handler before the queue is used.
    let queue = SqsOrderQueue::new(
        aws_sdk_sqs::Client::new(&aws_config),
        config.queue_url.clone().unwrap_or_default(),
    );

    Ok(handle_place_order_event(
        event.payload,
        config.queue_url.as_deref(),
        &queue,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
