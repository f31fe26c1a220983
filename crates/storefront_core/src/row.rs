//! Flat key-value layout of a customer row.
//!
//! The primary key attribute duplicates `id` so rows written by older
//! functions, which only carried `customerId`, still decode.

use std::collections::BTreeMap;

use crate::contract::{CustomerInfo, ValidationError};

pub const CUSTOMER_KEY_ATTRIBUTE: &str = "customerId";

pub type Row = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerAttribute {
    Id,
    Name,
    Address,
    Email,
    Phone,
}

impl CustomerAttribute {
    pub const ALL: [Self; 5] = [Self::Id, Self::Name, Self::Address, Self::Email, Self::Phone];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Address => "address",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    fn value(self, info: &CustomerInfo) -> &str {
        match self {
            Self::Id => &info.id,
            Self::Name => &info.name,
            Self::Address => &info.address,
            Self::Email => &info.email,
            Self::Phone => &info.phone,
        }
    }
}

pub fn customer_key(customer_id: &str) -> (String, String) {
    (CUSTOMER_KEY_ATTRIBUTE.to_string(), customer_id.to_string())
}

pub fn customer_row(info: &CustomerInfo) -> Row {
    let mut row = Row::new();
    let (key_name, key_value) = customer_key(&info.id);
    row.insert(key_name, key_value);
    for attribute in CustomerAttribute::ALL {
        row.insert(
            attribute.as_str().to_string(),
            attribute.value(info).to_string(),
        );
    }
    row
}

pub fn customer_from_row(row: &Row) -> Result<CustomerInfo, ValidationError> {
    let field = |attribute: CustomerAttribute| {
        row.get(attribute.as_str()).cloned().unwrap_or_default()
    };

    let id = row
        .get(CustomerAttribute::Id.as_str())
        .filter(|value| !value.is_empty())
        .or_else(|| row.get(CUSTOMER_KEY_ATTRIBUTE))
        .cloned()
        .ok_or_else(|| ValidationError::new("row has neither id nor customerId attribute"))?;

    Ok(CustomerInfo {
        id,
        name: field(CustomerAttribute::Name),
        address: field(CustomerAttribute::Address),
        email: field(CustomerAttribute::Email),
        phone: field(CustomerAttribute::Phone),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_customer() -> CustomerInfo {
        CustomerInfo {
            id: "c1".to_string(),
            name: "Ann".to_string(),
            address: "X".to_string(),
            email: "a@b.com".to_string(),
            phone: "555".to_string(),
        }
    }

    #[test]
    fn row_duplicates_id_under_key_attribute() {
        let row = customer_row(&sample_customer());
        assert_eq!(row.get("customerId").map(String::as_str), Some("c1"));
        assert_eq!(row.get("id").map(String::as_str), Some("c1"));
        assert_eq!(row.len(), 6);
    }

    #[test]
    fn row_decodes_to_written_customer() {
        let customer = sample_customer();
        let decoded = customer_from_row(&customer_row(&customer)).expect("row should decode");
        assert_eq!(decoded, customer);
    }

    #[test]
    fn key_only_row_falls_back_to_key_attribute() {
        let row = Row::from([("customerId".to_string(), "legacy-7".to_string())]);
        let decoded = customer_from_row(&row).expect("row should decode");
        assert_eq!(decoded.id, "legacy-7");
        assert_eq!(decoded.name, "");
    }

    #[test]
    fn row_without_identity_is_rejected() {
        let row = Row::from([("name".to_string(), "Ann".to_string())]);
        let error = customer_from_row(&row).expect_err("row should fail");
        assert_eq!(error.message(), "row has neither id nor customerId attribute");
    }
}
