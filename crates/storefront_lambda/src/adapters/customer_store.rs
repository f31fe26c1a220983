use crate::runtime::contract::CustomerInfo;

pub trait CustomerStore {
    /// `Ok(None)` when no row exists for the key.
    fn get_customer(&self, table_name: &str, customer_id: &str)
        -> Result<Option<CustomerInfo>, String>;

    fn put_customer(&self, table_name: &str, info: &CustomerInfo) -> Result<(), String>;
}
