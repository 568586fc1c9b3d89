//! Vatlayer tax engine library
//!
//! Resolves per-country VAT rates from a rate provider and splits prices into
//! net and gross amounts for products, checkouts and orders.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::providers;
pub use modules::taxes;
