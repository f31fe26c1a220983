//! Shapes of the events the function host delivers: direct JSON invocations,
//! API-gateway proxy requests (REST and HTTP flavours) and queue batches.

use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRecord {
    pub message_id: String,
    pub body: String,
}

/// Returns the request body: the proxy `body` field when present, otherwise
/// the event itself.
pub fn normalize_apigw_event(event: &Value) -> Result<Value, String> {
    let Some(object) = event.as_object() else {
        return Err("Request payload must be a JSON object".to_string());
    };

    let Some(body) = object.get("body") else {
        return Ok(event.clone());
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))
        }
        _ => Err("Request body must be a JSON object".to_string()),
    }
}

pub fn http_method(event: &Value) -> Option<&str> {
    event
        .get("httpMethod")
        .and_then(Value::as_str)
        .or_else(|| {
            event
                .pointer("/requestContext/http/method")
                .and_then(Value::as_str)
        })
}

/// Looks a request parameter up in the query string, then the path.
pub fn request_parameter<'a>(event: &'a Value, name: &str) -> Option<&'a Value> {
    ["queryStringParameters", "pathParameters"]
        .iter()
        .find_map(|section| event.get(*section).and_then(|params| params.get(name)))
}

pub fn is_sqs_event(event: &Value) -> bool {
    event
        .get("Records")
        .and_then(Value::as_array)
        .map(|records| {
            !records.is_empty()
                && records.iter().all(|record| {
                    record
                        .get("eventSource")
                        .and_then(Value::as_str)
                        .map(|source| source == "aws:sqs")
                        .unwrap_or(false)
                })
        })
        .unwrap_or(false)
}

pub fn decode_sqs_records(event: &Value) -> Result<Vec<QueueRecord>, String> {
    let records = event
        .get("Records")
        .and_then(Value::as_array)
        .ok_or_else(|| "SQS event must include Records array".to_string())?;

    let mut decoded = Vec::with_capacity(records.len());
    for record in records {
        let message_id = record
            .get("messageId")
            .and_then(Value::as_str)
            .ok_or_else(|| "SQS record messageId must be a string".to_string())?;
        // A non-string body is left empty so it fails decoding per record.
        let body = record
            .get("body")
            .and_then(Value::as_str)
            .unwrap_or_default();
        decoded.push(QueueRecord {
            message_id: message_id.to_string(),
            body: body.to_string(),
        });
    }

    Ok(decoded)
}
