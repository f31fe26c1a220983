use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use storefront_lambda::adapters::aws::load_sdk_config;
use storefront_lambda::adapters::sqs::SqsOrderQueue;
use storefront_lambda::handlers::event::is_sqs_event;
use storefront_lambda::handlers::process_order::{
    handle_order_records, handle_process_order, ProcessOrderConfig,
};
use storefront_lambda::handlers::response::HandlerError;
use storefront_lambda::logging::log_error;
use storefront_lambda::runtime::config::FunctionConfig;

async fn handle_request(event: LambdaEvent<Value>) -> Result<Value, Error> {
    if is_sqs_event(&event.payload) {
        let response = handle_order_records(&event.payload)
            .map_err(|error| Error::from(error.to_string()))?;
        return serde_json::to_value(response)
            .map_err(|error| Error::from(format!("failed to serialize batch response: {error}")));
    }

    let config = match FunctionConfig::from_env() {
        Ok(value) => value,
        Err(error) => {
            log_error(
                "process_order_lambda",
                "config_invalid",
                json!({ "error": error.message() }),
            );
            return to_value(HandlerError::misconfiguration(error.message()).into_response());
        }
    };

    let aws_config = load_sdk_config(config.region.as_deref()).await;
    let queue = SqsOrderQueue::new(
        aws_sdk_sqs::Client::new(&aws_config),
        config.queue_url.clone().unwrap_or_default(),
    )
    .with_receive_wait_secs(config.receive_wait_secs);

    to_value(handle_process_order(
        config.queue_url.as_deref(),
        &ProcessOrderConfig::from(&config),
        &queue,
    ))
}

fn to_value(response: impl serde::Serialize) -> Result<Value, Error> {
    serde_json::to_value(response)
        .map_err(|error| Error::from(format!("failed to serialize api response: {error}")))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}

