//! AWS-oriented adapters and handlers for the storefront functions.
//!
//! This crate owns runtime integration details (Lambda handlers, queue and
//! table adapters) and exposes a single runtime module boundary for the
//! contract, row and configuration primitives.

pub mod adapters;
pub mod handlers;
pub mod logging;
pub mod runtime;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
