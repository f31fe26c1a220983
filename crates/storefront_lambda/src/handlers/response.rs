use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::runtime::contract::ErrorEnvelope;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn json_body(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    MethodNotAllowed,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Internal => 500,
        }
    }
}

/// A terminal failure for one invocation, rendered as an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    kind: ErrorKind,
    error: String,
    details: String,
}

impl HandlerError {
    pub fn new(kind: ErrorKind, error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            kind,
            error: error.into(),
            details: details.into(),
        }
    }

    pub fn invalid_input(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, "Invalid input", details)
    }

    pub fn method_not_allowed(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::MethodNotAllowed, "Method not allowed", details)
    }

    pub fn not_found(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, error, details)
    }

    pub fn internal(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, error, details)
    }

    pub fn misconfiguration(details: impl Into<String>) -> Self {
        Self::internal("misconfiguration", details)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.error.clone(),
            status: self.status_code(),
            details: self.details.clone(),
        }
    }

    pub fn log_details(&self) -> Value {
        json!({
            "status": self.status_code(),
            "error": self.error,
            "details": self.details,
        })
    }

    pub fn into_response(self) -> ApiGatewayResponse {
        let body = serde_json::to_string(&self.envelope())
            .unwrap_or_else(|_| self.log_details().to_string());
        ApiGatewayResponse {
            status_code: self.status_code(),
            headers: json_headers(),
            body,
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.details)
    }
}

impl std::error::Error for HandlerError {}

pub fn require_queue_url(queue_url: Option<&str>) -> Result<&str, HandlerError> {
    match queue_url {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(HandlerError::misconfiguration("QUEUE_URL must be configured")),
    }
}

pub fn success_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(&payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: json_headers(),
            body,
        },
        Err(error) => HandlerError::internal(
            "Internal error",
            format!("failed to serialize response: {error}"),
        )
        .into_response(),
    }
}

fn json_headers() -> Value {
    json!({"Content-Type": "application/json"})
}
