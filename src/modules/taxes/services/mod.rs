pub mod rate_resolver;
pub mod tax_cache;
pub mod tax_calculator;
pub mod taxation_service;

pub use rate_resolver::resolve_rate;
pub use tax_cache::TaxCache;
pub use tax_calculator::TaxCalculator;
pub use taxation_service::{CheckoutInput, TaxableLine, TaxationService};
