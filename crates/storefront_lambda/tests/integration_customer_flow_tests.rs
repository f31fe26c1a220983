use serde_json::json;
use storefront_lambda::handlers::customer::{handle_customer_event, CustomerHandlerConfig};
use storefront_lambda::runtime::config::{FunctionConfig, NOSQL_TABLE_NAME_ENV};
use storefront_lambda::runtime::contract::{CustomerInfo, ErrorEnvelope};
use storefront_lambda::test_helpers::InMemoryCustomerStore;

fn default_config() -> CustomerHandlerConfig {
    CustomerHandlerConfig::from(&FunctionConfig::default())
}

#[test]
fn read_of_never_written_id_is_not_found() {
    let store = InMemoryCustomerStore::new();
    let response = handle_customer_event(
        json!({"httpMethod": "GET", "queryStringParameters": {"id": "ghost"}}),
        &default_config(),
        &store,
    );

    assert_eq!(response.status_code, 404);
    let envelope: ErrorEnvelope =
        serde_json::from_str(&response.body).expect("body should be an envelope");
    assert_eq!(envelope.status, 404);
}

#[test]
fn write_then_read_returns_the_same_five_fields() {
    let store = InMemoryCustomerStore::new();
    let config = default_config();
    let customer = json!({"id":"c1","name":"Ann","address":"X","email":"a@b.com","phone":"555"});

    let write = handle_customer_event(
        json!({"method": "POST", "data": customer.clone()}),
        &config,
        &store,
    );
    assert_eq!(write.status_code, 200);

    let read = handle_customer_event(
        json!({"method": "GET", "data": {"id": "c1"}}),
        &config,
        &store,
    );
    assert_eq!(read.status_code, 200);
    let body = read.json_body().expect("body should be json");
    assert_eq!(body, customer);
    assert_eq!(body.as_object().map(|object| object.len()), Some(5));

    let row = store
        .row("customer_info", "c1")
        .expect("row should be stored in the default table");
    assert_eq!(row.get("customerId").map(String::as_str), Some("c1"));
}

#[test]
fn writing_twice_yields_the_same_read() {
    let store = InMemoryCustomerStore::new();
    let config = default_config();
    let request = json!({"method": "POST", "data": {"id": "c2", "name": "Bo", "email": "b@c.d"}});

    handle_customer_event(request.clone(), &config, &store);
    let first = handle_customer_event(
        json!({"method": "GET", "data": {"id": "c2"}}),
        &config,
        &store,
    );
    handle_customer_event(request, &config, &store);
    let second = handle_customer_event(
        json!({"method": "GET", "data": {"id": "c2"}}),
        &config,
        &store,
    );

    assert_eq!(first.body, second.body);
    let info: CustomerInfo = serde_json::from_str(&second.body).expect("body should parse");
    assert_eq!(info.address, "");
}

#[test]
fn empty_id_write_never_reaches_the_store() {
    let store = InMemoryCustomerStore::new();
    let response = handle_customer_event(
        json!({"httpMethod": "POST", "body": "{\"id\":\"\",\"name\":\"Ann\"}"}),
        &default_config(),
        &store,
    );

    assert_eq!(response.status_code, 400);
    assert_eq!(store.calls(), 0);
}

#[test]
fn unsupported_verb_never_reaches_the_store() {
    let store = InMemoryCustomerStore::new();
    for verb in ["PUT", "DELETE", "PATCH"] {
        let response = handle_customer_event(
            json!({"requestContext": {"http": {"method": verb}}, "body": "{\"id\":\"c1\"}"}),
            &default_config(),
            &store,
        );
        assert_eq!(response.status_code, 405);
    }
    assert_eq!(store.calls(), 0);
}

#[test]
fn configured_table_name_is_used() {
    let config = FunctionConfig::from_lookup(|name| {
        (name == NOSQL_TABLE_NAME_ENV).then(|| "customers_eu".to_string())
    })
    .expect("config should load");
    let store = InMemoryCustomerStore::new();

    let response = handle_customer_event(
        json!({"method": "POST", "data": {"id": "c5"}}),
        &CustomerHandlerConfig::from(&config),
        &store,
    );

    assert_eq!(response.status_code, 200);
    assert!(store.row("customers_eu", "c5").is_some());
    assert!(store.row("customer_info", "c5").is_none());
}
