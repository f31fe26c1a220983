use serde_json::{json, Map, Value};

use crate::adapters::customer_store::CustomerStore;
use crate::handlers::event::{http_method, normalize_apigw_event, request_parameter};
use crate::handlers::response::{success_response, ApiGatewayResponse, HandlerError};
use crate::logging::{log_error, log_info};
use crate::runtime::config::FunctionConfig;
use crate::runtime::contract::{
    decode_customer, parse_customer_id, CustomerWriteResponse, RequestMethod,
    CUSTOMER_WRITE_MESSAGE,
};

const COMPONENT: &str = "customer_handler";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerHandlerConfig {
    pub table_name: String,
}

impl From<&FunctionConfig> for CustomerHandlerConfig {
    fn from(config: &FunctionConfig) -> Self {
        Self {
            table_name: config.table_name.clone(),
        }
    }
}

/// Reads (GET) or upserts (POST) one customer row. Every other verb is
/// answered with 405 before the store is touched.
pub fn handle_customer_event(
    event: Value,
    config: &CustomerHandlerConfig,
    store: &dyn CustomerStore,
) -> ApiGatewayResponse {
    match dispatch_customer_event(&event, config, store) {
        Ok(response) => response,
        Err(error) => {
            log_error(COMPONENT, "request_failed", error.log_details());
            error.into_response()
        }
    }
}

fn dispatch_customer_event(
    event: &Value,
    config: &CustomerHandlerConfig,
    store: &dyn CustomerStore,
) -> Result<ApiGatewayResponse, HandlerError> {
    let context_method = http_method(event).map(RequestMethod::parse);
    if let Some(RequestMethod::Other(verb)) = &context_method {
        return Err(unsupported_method(verb));
    }

    let body = normalize_apigw_event(event).map_err(HandlerError::invalid_input)?;
    let method = match context_method {
        Some(method) => method,
        None => body
            .get("method")
            .and_then(Value::as_str)
            .map(RequestMethod::parse)
            .ok_or_else(|| HandlerError::invalid_input("request method is required"))?,
    };

    let data = request_data(body);
    match method {
        RequestMethod::Get => get_customer(event, &data, config, store),
        RequestMethod::Post => put_customer(data, config, store),
        RequestMethod::Other(verb) => Err(unsupported_method(&verb)),
    }
}

fn unsupported_method(verb: &str) -> HandlerError {
    HandlerError::method_not_allowed(format!("unsupported HTTP method: {verb}"))
}

/// The `data` member of a wrapped request, or the bare body otherwise.
fn request_data(body: Value) -> Value {
    match body {
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Null) => Value::Object(Map::new()),
            Some(data) => data,
            None => {
                object.remove("method");
                Value::Object(object)
            }
        },
        other => other,
    }
}

fn get_customer(
    event: &Value,
    data: &Value,
    config: &CustomerHandlerConfig,
    store: &dyn CustomerStore,
) -> Result<ApiGatewayResponse, HandlerError> {
    let id_value = data
        .get("id")
        .filter(|value| !value.is_null())
        .or_else(|| request_parameter(event, "id"));
    let customer_id =
        parse_customer_id(id_value).map_err(|error| HandlerError::invalid_input(error.message()))?;

    let info = store
        .get_customer(&config.table_name, &customer_id)
        .map_err(|error| HandlerError::internal("Internal error", error))?
        .ok_or_else(|| {
            HandlerError::not_found(
                "Customer not found",
                format!("customer not found for id: {customer_id}"),
            )
        })?;

    log_info(
        COMPONENT,
        "customer_fetched",
        json!({
            "table": config.table_name,
            "customer_id": customer_id,
        }),
    );
    Ok(success_response(200, info))
}

fn put_customer(
    data: Value,
    config: &CustomerHandlerConfig,
    store: &dyn CustomerStore,
) -> Result<ApiGatewayResponse, HandlerError> {
    let info = decode_customer(data).map_err(|error| HandlerError::invalid_input(error.message()))?;

    store
        .put_customer(&config.table_name, &info)
        .map_err(|error| HandlerError::internal("Internal error", error))?;

    log_info(
        COMPONENT,
        "customer_upserted",
        json!({
            "table": config.table_name,
            "customer_id": info.id,
        }),
    );
    Ok(success_response(
        200,
        CustomerWriteResponse {
            message: CUSTOMER_WRITE_MESSAGE.to_string(),
            data: info,
        },
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::runtime::contract::{CustomerInfo, ErrorEnvelope};

    use super::*;

    struct RecordingStore {
        rows: Mutex<HashMap<(String, String), CustomerInfo>>,
        calls: Mutex<usize>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().expect("poisoned mutex")
        }

        fn record_call(&self) {
            *self.calls.lock().expect("poisoned mutex") += 1;
        }
    }

    impl CustomerStore for RecordingStore {
        fn get_customer(
            &self,
            table_name: &str,
            customer_id: &str,
        ) -> Result<Option<CustomerInfo>, String> {
            self.record_call();
            Ok(self
                .rows
                .lock()
                .expect("poisoned mutex")
                .get(&(table_name.to_string(), customer_id.to_string()))
                .cloned())
        }

        fn put_customer(&self, table_name: &str, info: &CustomerInfo) -> Result<(), String> {
            self.record_call();
            self.rows
                .lock()
                .expect("poisoned mutex")
                .insert((table_name.to_string(), info.id.clone()), info.clone());
            Ok(())
        }
    }

    struct FailingStore;

    impl CustomerStore for FailingStore {
        fn get_customer(
            &self,
            _table_name: &str,
            _customer_id: &str,
        ) -> Result<Option<CustomerInfo>, String> {
            Err("failed to get row: throttled".to_string())
        }

        fn put_customer(&self, _table_name: &str, _info: &CustomerInfo) -> Result<(), String> {
            Err("failed to put row: throttled".to_string())
        }
    }

    fn sample_config() -> CustomerHandlerConfig {
        CustomerHandlerConfig {
            table_name: "customer_info".to_string(),
        }
    }

    fn envelope(response: &ApiGatewayResponse) -> ErrorEnvelope {
        serde_json::from_str(&response.body).expect("body should be an error envelope")
    }

    #[test]
    fn unknown_customer_is_not_found() {
        let store = RecordingStore::new();
        let response = handle_customer_event(
            json!({"method": "GET", "data": {"id": "never-written"}}),
            &sample_config(),
            &store,
        );

        assert_eq!(response.status_code, 404);
        let envelope = envelope(&response);
        assert_eq!(envelope.error, "Customer not found");
        assert_eq!(envelope.status, 404);
        assert_eq!(envelope.details, "customer not found for id: never-written");
    }

    #[test]
    fn written_customer_reads_back_unchanged() {
        let store = RecordingStore::new();
        let written = json!({"id":"c1","name":"Ann","address":"X","email":"a@b.com","phone":"555"});

        let post = handle_customer_event(
            json!({"method": "POST", "data": written.clone()}),
            &sample_config(),
            &store,
        );
        assert_eq!(post.status_code, 200);
        let post_body = post.json_body().expect("post body should be json");
        assert_eq!(post_body["message"], CUSTOMER_WRITE_MESSAGE);
        assert_eq!(post_body["data"], written);

        let get = handle_customer_event(
            json!({"method": "GET", "data": {"id": "c1"}}),
            &sample_config(),
            &store,
        );
        assert_eq!(get.status_code, 200);
        assert_eq!(get.json_body().expect("get body should be json"), written);
    }

    #[test]
    fn empty_id_write_is_rejected_before_store_call() {
        let store = RecordingStore::new();
        let response = handle_customer_event(
            json!({"method": "POST", "data": {"id": "", "name": "Ann"}}),
            &sample_config(),
            &store,
        );

        assert_eq!(response.status_code, 400);
        assert_eq!(envelope(&response).details, "customer ID is required");
        assert_eq!(store.calls(), 0);
    }

    #[test]
    fn unsupported_verb_is_rejected_before_store_call() {
        let store = RecordingStore::new();
        let from_context = handle_customer_event(
            json!({"httpMethod": "DELETE", "body": "{\"id\":\"c1\"}"}),
            &sample_config(),
            &store,
        );
        let from_body = handle_customer_event(
            json!({"method": "PUT", "data": {"id": "c1"}}),
            &sample_config(),
            &store,
        );

        assert_eq!(from_context.status_code, 405);
        assert_eq!(from_body.status_code, 405);
        assert_eq!(
            envelope(&from_context).details,
            "unsupported HTTP method: DELETE"
        );
        assert_eq!(store.calls(), 0);
    }

    #[test]
    fn read_without_id_is_rejected_instead_of_defaulted() {
        let store = RecordingStore::new();
        let response = handle_customer_event(
            json!({"method": "GET", "data": {}}),
            &sample_config(),
            &store,
        );

        assert_eq!(response.status_code, 400);
        assert_eq!(envelope(&response).details, "customer id is required");
        assert_eq!(store.calls(), 0);
    }

    #[test]
    fn missing_method_is_invalid_input() {
        let store = RecordingStore::new();
        let response =
            handle_customer_event(json!({"id": "c1"}), &sample_config(), &store);

        assert_eq!(response.status_code, 400);
        assert_eq!(envelope(&response).details, "request method is required");
    }

    #[test]
    fn http_api_get_reads_id_from_query_string() {
        let store = RecordingStore::new();
        let post = handle_customer_event(
            json!({
                "requestContext": {"http": {"method": "POST"}},
                "body": "{\"id\":\"c7\",\"name\":\"Bo\"}"
            }),
            &sample_config(),
            &store,
        );
        assert_eq!(post.status_code, 200);

        let get = handle_customer_event(
            json!({
                "requestContext": {"http": {"method": "GET"}},
                "queryStringParameters": {"id": "c7"}
            }),
            &sample_config(),
            &store,
        );
        assert_eq!(get.status_code, 200);
        let body = get.json_body().expect("body should be json");
        assert_eq!(body["name"], "Bo");
        assert_eq!(body["email"], "");
    }

    #[test]
    fn bare_write_ignores_method_field() {
        let store = RecordingStore::new();
        let response = handle_customer_event(
            json!({"method": "post", "id": "c2", "name": "Cy"}),
            &sample_config(),
            &store,
        );

        assert_eq!(response.status_code, 200);
        let body = response.json_body().expect("body should be json");
        assert_eq!(body["data"]["id"], "c2");
        assert!(body["data"].get("method").is_none());
    }

    #[test]
    fn repeated_upsert_keeps_last_write() {
        let store = RecordingStore::new();
        for name in ["First", "Second"] {
            let response = handle_customer_event(
                json!({"method": "POST", "data": {"id": "c3", "name": name}}),
                &sample_config(),
                &store,
            );
            assert_eq!(response.status_code, 200);
        }

        let get = handle_customer_event(
            json!({"method": "GET", "data": {"id": "c3"}}),
            &sample_config(),
            &store,
        );
        assert_eq!(get.json_body().expect("body should be json")["name"], "Second");
    }

    #[test]
    fn store_failures_become_internal_errors() {
        let get = handle_customer_event(
            json!({"method": "GET", "data": {"id": "c1"}}),
            &sample_config(),
            &FailingStore,
        );
        let post = handle_customer_event(
            json!({"method": "POST", "data": {"id": "c1"}}),
            &sample_config(),
            &FailingStore,
        );

        assert_eq!(get.status_code, 500);
        assert_eq!(envelope(&get).error, "Internal error");
        assert_eq!(envelope(&get).details, "failed to get row: throttled");
        assert_eq!(post.status_code, 500);
        assert_eq!(envelope(&post).details, "failed to put row: throttled");
    }

    #[test]
    fn malformed_proxy_body_is_invalid_input() {
        let store = RecordingStore::new();
        let response = handle_customer_event(
            json!({"httpMethod": "POST", "body": "{not json"}),
            &sample_config(),
            &store,
        );

        assert_eq!(response.status_code, 400);
        assert!(envelope(&response).details.starts_with("Malformed JSON body"));
        assert_eq!(store.calls(), 0);
    }
}
