use std::collections::HashMap;

use aws_sdk_dynamodb::operation::get_item::builders::GetItemInputBuilder;
use aws_sdk_dynamodb::operation::get_item::GetItemInput;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::adapters::customer_store::CustomerStore;
use crate::runtime::contract::CustomerInfo;
use crate::runtime::row::{customer_from_row, customer_key, customer_row, Row};

pub struct DynamoCustomerStore {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoCustomerStore {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }
}

impl CustomerStore for DynamoCustomerStore {
    fn get_customer(
        &self,
        table_name: &str,
        customer_id: &str,
    ) -> Result<Option<CustomerInfo>, String> {
        let client = self.client.clone();
        let request = customer_lookup(table_name, customer_id);

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .get_item()
                    .set_table_name(request.get_table_name().clone())
                    .set_key(request.get_key().clone())
                    .set_consistent_read(*request.get_consistent_read())
                    .send()
                    .await
                    .map_err(|error| format!("failed to get row: {error}"))
            })
        })?;

        let Some(item) = output.item() else {
            return Ok(None);
        };

        customer_from_row(&row_from_item(item))
            .map(Some)
            .map_err(|error| format!("failed to decode row: {error}"))
    }

    fn put_customer(&self, table_name: &str, info: &CustomerInfo) -> Result<(), String> {
        let client = self.client.clone();
        let table = table_name.to_string();
        let item = item_from_row(customer_row(info));

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(table)
                    .set_item(Some(item))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to put row: {error}"))
            })
        })
    }
}

/// Reads are strongly consistent so a read right after an upsert sees it.
fn customer_lookup(table_name: &str, customer_id: &str) -> GetItemInputBuilder {
    let (key_name, key_value) = customer_key(customer_id);
    GetItemInput::builder()
        .table_name(table_name)
        .key(key_name, AttributeValue::S(key_value))
        .consistent_read(true)
}

/// Keeps only string attributes; the customer layout has no other kind.
fn row_from_item(item: &HashMap<String, AttributeValue>) -> Row {
    item.iter()
        .filter_map(|(name, value)| {
            value
                .as_s()
                .ok()
                .map(|text| (name.clone(), text.clone()))
        })
        .collect()
}

fn item_from_row(row: Row) -> HashMap<String, AttributeValue> {
    row.into_iter()
        .map(|(name, value)| (name, AttributeValue::S(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_round_trips_through_row() {
        let info = CustomerInfo {
            id: "c1".to_string(),
            name: "Ann".to_string(),
            address: "X".to_string(),
            email: "a@b.com".to_string(),
            phone: "555".to_string(),
        };
        let item = item_from_row(customer_row(&info));
        assert_eq!(
            item.get("customerId"),
            Some(&AttributeValue::S("c1".to_string()))
        );

        let decoded = customer_from_row(&row_from_item(&item)).expect("row should decode");
        assert_eq!(decoded, info);
    }

    #[test]
    fn lookup_is_a_consistent_read_by_customer_key() {
        let request = customer_lookup("customer_info", "c1");

        assert_eq!(request.get_table_name().as_deref(), Some("customer_info"));
        assert_eq!(*request.get_consistent_read(), Some(true));
        let key = request.get_key().as_ref().expect("key should be set");
        assert_eq!(key.len(), 1);
        assert_eq!(
            key.get("customerId"),
            Some(&AttributeValue::S("c1".to_string()))
        );
    }

    #[test]
    fn non_string_attributes_are_ignored() {
        let item = HashMap::from([
            ("customerId".to_string(), AttributeValue::S("c2".to_string())),
            ("loyalty_points".to_string(), AttributeValue::N("12".to_string())),
        ]);
        let row = row_from_item(&item);
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("customerId").map(String::as_str), Some("c2"));
    }
}
