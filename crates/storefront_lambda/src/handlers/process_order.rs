use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::order_queue::OrderQueue;
use crate::handlers::event::decode_sqs_records;
use crate::handlers::response::{
    require_queue_url, success_response, ApiGatewayResponse, ErrorKind, HandlerError,
};
use crate::logging::{log_error, log_info};
use crate::runtime::config::{FunctionConfig, DEFAULT_VISIBILITY_TIMEOUT_SECS};
use crate::runtime::contract::{
    decode_order_message, order_fingerprint, Order, OrderProcessedResponse,
    ORDER_PROCESSED_MESSAGE,
};

const COMPONENT: &str = "process_order_handler";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOrderConfig {
    pub visibility_timeout_secs: i32,
    /// Delete the message once the order has been processed. When off, the
    /// message reappears after the visibility timeout.
    pub acknowledge_processed: bool,
}

impl Default for ProcessOrderConfig {
    fn default() -> Self {
        Self {
            visibility_timeout_secs: DEFAULT_VISIBILITY_TIMEOUT_SECS,
            acknowledge_processed: true,
        }
    }
}

impl From<&FunctionConfig> for ProcessOrderConfig {
    fn from(config: &FunctionConfig) -> Self {
        Self {
            visibility_timeout_secs: config.visibility_timeout_secs,
            acknowledge_processed: config.acknowledge_processed,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SqsBatchResponse {
    #[serde(rename = "batchItemFailures")]
    pub batch_item_failures: Vec<BatchItemFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchItemFailure {
    #[serde(rename = "itemIdentifier")]
    pub item_identifier: String,
}

/// Polls for a single order and processes it.
///
/// An empty queue and a failed receive both answer 500 but carry different
/// error labels. A message whose body is not an order is left on the queue.
pub fn handle_process_order(
    queue_url: Option<&str>,
    config: &ProcessOrderConfig,
    queue: &dyn OrderQueue,
) -> ApiGatewayResponse {
    match poll_and_process(queue_url, config, queue) {
        Ok(response) => success_response(200, response),
        Err(error) => {
            log_error(COMPONENT, "poll_failed", error.log_details());
            error.into_response()
        }
    }
}

fn poll_and_process(
    queue_url: Option<&str>,
    config: &ProcessOrderConfig,
    queue: &dyn OrderQueue,
) -> Result<OrderProcessedResponse, HandlerError> {
    require_queue_url(queue_url)?;

    let message = queue
        .receive_message(config.visibility_timeout_secs)
        .map_err(|error| HandlerError::internal("Failed to get message from queue", error))?
        .ok_or_else(|| {
            HandlerError::internal("No message available", "queue returned no messages")
        })?;

    let order = decode_order_message(&message.body).map_err(|error| {
        HandlerError::new(
            ErrorKind::InvalidInput,
            "Invalid order message",
            format!(
                "message {} left for redelivery: {}",
                message.message_id,
                error.message()
            ),
        )
    })?;

    process_order(&order, &message.message_id, &message.body);

    if config.acknowledge_processed {
        queue
            .delete_message(&message.receipt_handle)
            .map_err(|error| HandlerError::internal("Failed to acknowledge message", error))?;
    }

    Ok(OrderProcessedResponse {
        message: ORDER_PROCESSED_MESSAGE.to_string(),
        order_id: order.order_id,
        message_id: message.message_id,
        acknowledged: config.acknowledge_processed,
    })
}

/// Processes a queue-triggered batch. Records that do not decode are
/// reported back so only they are redelivered.
pub fn handle_order_records(event: &Value) -> Result<SqsBatchResponse, HandlerError> {
    let records = decode_sqs_records(event).map_err(HandlerError::invalid_input)?;

    let mut response = SqsBatchResponse::default();
    for record in records {
        match decode_order_message(&record.body) {
            Ok(order) => process_order(&order, &record.message_id, &record.body),
            Err(error) => {
                log_error(
                    COMPONENT,
                    "record_rejected",
                    json!({
                        "message_id": record.message_id,
                        "error": error.message(),
                    }),
                );
                response.batch_item_failures.push(BatchItemFailure {
                    item_identifier: record.message_id,
                });
            }
        }
    }

    Ok(response)
}

fn process_order(order: &Order, message_id: &str, message_body: &str) {
    log_info(
        COMPONENT,
        "order_processed",
        json!({
            "order_id": order.order_id,
            "customer_id": order.customer_id,
            "amount": format!("{:.2}", order.amount),
            "message_id": message_id,
            "order_fingerprint": order_fingerprint(message_body),
        }),
    );
}
