//! Provider-free storefront primitives.
//!
//! This crate owns the customer and order contracts, the customer row layout
//! and environment configuration. It intentionally excludes AWS SDK and Lambda
//! runtime concerns so the same rules apply to every function binary.

pub mod config;
pub mod contract;
pub mod row;
