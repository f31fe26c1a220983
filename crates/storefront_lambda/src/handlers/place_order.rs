use serde_json::{json, Value};

use crate::adapters::order_queue::OrderQueue;
use crate::handlers::event::normalize_apigw_event;
use crate::handlers::response::{
    require_queue_url, success_response, ApiGatewayResponse, HandlerError,
};
use crate::logging::{log_error, log_info};
use crate::runtime::contract::{
    decode_order, order_fingerprint, order_message_body, OrderPlacedResponse,
    ORDER_PLACED_MESSAGE,
};

const COMPONENT: &str = "place_order_handler";

/// Validates an inbound order and enqueues it as exactly one message.
/// Nothing is retried; the caller resubmits on failure.
pub fn handle_place_order_event(
    event: Value,
    queue_url: Option<&str>,
    queue: &dyn OrderQueue,
) -> ApiGatewayResponse {
    match place_order(&event, queue_url, queue) {
        Ok(response) => success_response(200, response),
        Err(error) => {
            log_error(COMPONENT, "order_rejected", error.log_details());
            error.into_response()
        }
    }
}

fn place_order(
    event: &Value,
    queue_url: Option<&str>,
    queue: &dyn OrderQueue,
) -> Result<OrderPlacedResponse, HandlerError> {
    let payload = normalize_apigw_event(event).map_err(HandlerError::invalid_input)?;
    let order = decode_order(payload).map_err(|error| HandlerError::invalid_input(error.message()))?;

    let queue_url = require_queue_url(queue_url)?;

    let body = order_message_body(&order).map_err(|error| {
        HandlerError::internal("Failed to marshal order", error.to_string())
    })?;
    let fingerprint = order_fingerprint(&body);

    let message_id = queue
        .send_message(&body)
        .map_err(|error| HandlerError::internal("Failed to send message to queue", error))?;

    log_info(
        COMPONENT,
        "order_enqueued",
        json!({
            "queue_url": queue_url,
            "order_id": order.order_id,
            "customer_id": order.customer_id,
            "message_id": message_id,
            "order_fingerprint": fingerprint,
        }),
    );

    Ok(OrderPlacedResponse {
        message: ORDER_PLACED_MESSAGE.to_string(),
        order_id: order.order_id,
        message_id,
        order_fingerprint: fingerprint,
    })
}
