pub mod customer;
pub mod event;
pub mod place_order;
pub mod process_order;
pub mod response;
