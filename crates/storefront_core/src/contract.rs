use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub const CUSTOMER_WRITE_MESSAGE: &str = "Customer created or updated successfully";
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully";
pub const ORDER_PROCESSED_MESSAGE: &str = "Order processed successfully";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CustomerInfo {
    pub id: String,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub amount: f64,
}

/// Failure body shared by every function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub error: String,
    pub status: u16,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerWriteResponse {
    pub message: String,
    pub data: CustomerInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderPlacedResponse {
    pub message: String,
    pub order_id: String,
    pub message_id: String,
    pub order_fingerprint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderProcessedResponse {
    pub message: String,
    pub order_id: String,
    pub message_id: String,
    pub acknowledged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Other(String),
}

impl RequestMethod {
    pub fn parse(raw: &str) -> Self {
        let verb = raw.trim().to_ascii_uppercase();
        match verb.as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            _ => Self::Other(verb),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Extracts the lookup key for a read. A missing or blank id is rejected
/// rather than replaced with a default.
pub fn parse_customer_id(value: Option<&Value>) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::new("customer id is required")),
        Some(Value::String(id)) if id.trim().is_empty() => {
            Err(ValidationError::new("customer id is required"))
        }
        Some(Value::String(id)) => Ok(id.clone()),
        Some(_) => Err(ValidationError::new(
            "failed to parse input: customer id must be a string",
        )),
    }
}

pub fn decode_customer(data: Value) -> Result<CustomerInfo, ValidationError> {
    let info: CustomerInfo = serde_json::from_value(data)
        .map_err(|error| ValidationError::new(format!("failed to parse input: {error}")))?;
    validate_customer(&info)?;
    Ok(info)
}

pub fn validate_customer(info: &CustomerInfo) -> Result<(), ValidationError> {
    if info.id.trim().is_empty() {
        return Err(ValidationError::new("customer ID is required"));
    }
    Ok(())
}

/// Decodes an intake payload, accepting both a bare order and one wrapped
/// under `data`.
pub fn decode_order(payload: Value) -> Result<Order, ValidationError> {
    let order: Order = serde_json::from_value(unwrap_order_payload(payload))
        .map_err(|error| ValidationError::new(format!("Invalid input: {error}")))?;
    validate_order(&order)?;
    Ok(order)
}

/// Decodes a queued message body. Producers may put either order shape on
/// the wire, so this unwraps `data` the same way intake does.
pub fn decode_order_message(body: &str) -> Result<Order, ValidationError> {
    let invalid = |error: serde_json::Error| {
        ValidationError::new(format!("Invalid order message: {error}"))
    };
    let payload: Value = serde_json::from_str(body).map_err(invalid)?;
    let order: Order = serde_json::from_value(unwrap_order_payload(payload)).map_err(invalid)?;
    validate_order(&order)?;
    Ok(order)
}

/// An object without an `order_id` key carries the order under `data`.
fn unwrap_order_payload(payload: Value) -> Value {
    match payload {
        Value::Object(mut object) if !object.contains_key("order_id") => {
            match object.remove("data") {
                Some(inner) => inner,
                None => Value::Object(object),
            }
        }
        other => other,
    }
}

pub fn validate_order(order: &Order) -> Result<(), ValidationError> {
    if order.order_id.trim().is_empty() {
        return Err(ValidationError::new("order_id cannot be empty"));
    }
    if order.customer_id.trim().is_empty() {
        return Err(ValidationError::new("customer_id cannot be empty"));
    }
    Ok(())
}

pub fn order_message_body(order: &Order) -> serde_json::Result<String> {
    serde_json::to_string(order)
}

pub fn order_fingerprint(message_body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(message_body.as_bytes());
    format!("{:x}", hasher.finalize())
}
