pub mod aws;
pub mod customer_store;
pub mod dynamodb;
pub mod order_queue;
pub mod sqs;
