pub use storefront_core::{config, contract, row};
