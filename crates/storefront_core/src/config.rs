//! Environment configuration shared by the function binaries.
//!
//! Values are read at invocation time. Blank variables count as unset.

use crate::contract::ValidationError;

pub const SERVICE_REGION_ENV: &str = "SERVICE_REGION";
pub const NOSQL_TABLE_NAME_ENV: &str = "NOSQL_TABLE_NAME";
pub const QUEUE_URL_ENV: &str = "QUEUE_URL";
pub const VISIBILITY_TIMEOUT_ENV: &str = "ORDER_VISIBILITY_TIMEOUT_SECS";
pub const ACKNOWLEDGE_ENV: &str = "ACKNOWLEDGE_PROCESSED_ORDERS";
pub const RECEIVE_WAIT_ENV: &str = "ORDER_RECEIVE_WAIT_SECS";

pub const DEFAULT_TABLE_NAME: &str = "customer_info";
pub const DEFAULT_VISIBILITY_TIMEOUT_SECS: i32 = 30;
/// Upper bound accepted by the queue service (12 hours).
pub const MAX_VISIBILITY_TIMEOUT_SECS: i32 = 43_200;
/// Long-poll wait for a receive. Keep it below the function timeout.
pub const DEFAULT_RECEIVE_WAIT_SECS: i32 = 10;
pub const MAX_RECEIVE_WAIT_SECS: i32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionConfig {
    pub region: Option<String>,
    pub table_name: String,
    pub queue_url: Option<String>,
    pub visibility_timeout_secs: i32,
    pub receive_wait_secs: i32,
    pub acknowledge_processed: bool,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            region: None,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            queue_url: None,
            visibility_timeout_secs: DEFAULT_VISIBILITY_TIMEOUT_SECS,
            receive_wait_secs: DEFAULT_RECEIVE_WAIT_SECS,
            acknowledge_processed: true,
        }
    }
}

impl FunctionConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();

        let visibility_timeout_secs = match read(VISIBILITY_TIMEOUT_ENV) {
            Some(raw) => parse_bounded_secs(VISIBILITY_TIMEOUT_ENV, &raw, MAX_VISIBILITY_TIMEOUT_SECS)?,
            None => defaults.visibility_timeout_secs,
        };

        let receive_wait_secs = match read(RECEIVE_WAIT_ENV) {
            Some(raw) => parse_bounded_secs(RECEIVE_WAIT_ENV, &raw, MAX_RECEIVE_WAIT_SECS)?,
            None => defaults.receive_wait_secs,
        };

        let acknowledge_processed = match read(ACKNOWLEDGE_ENV) {
            Some(raw) => parse_flag(ACKNOWLEDGE_ENV, &raw)?,
            None => defaults.acknowledge_processed,
        };

        Ok(Self {
            region: read(SERVICE_REGION_ENV),
            table_name: read(NOSQL_TABLE_NAME_ENV).unwrap_or(defaults.table_name),
            queue_url: read(QUEUE_URL_ENV),
            visibility_timeout_secs,
            receive_wait_secs,
            acknowledge_processed,
        })
    }
}

fn parse_bounded_secs(name: &str, raw: &str, max: i32) -> Result<i32, ValidationError> {
    let value: i32 = raw
        .parse()
        .map_err(|_| ValidationError::new(format!("{name} must be an integer, got '{raw}'")))?;
    if !(0..=max).contains(&value) {
        return Err(ValidationError::new(format!(
            "{name} must be between 0 and {max}"
        )));
    }
    Ok(value)
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, ValidationError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ValidationError::new(format!(
            "{name} must be a boolean, got '{raw}'"
        ))),
    }
}
