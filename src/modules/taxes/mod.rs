pub mod models;
pub mod services;

pub use models::{TaxRate, TaxRateTable, DEFAULT_TAX_RATE_NAME};
pub use services::{
    resolve_rate, CheckoutInput, TaxCache, TaxCalculator, TaxableLine, TaxationService,
};
