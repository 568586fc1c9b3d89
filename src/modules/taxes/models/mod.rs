mod tax;

pub use tax::{TaxRate, TaxRateTable, DEFAULT_TAX_RATE_NAME};
