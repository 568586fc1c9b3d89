pub mod country;
pub mod currency;
pub mod error;
pub mod money;

pub use country::CountryCode;
pub use currency::Currency;
pub use error::{AppError, AppResult, Result};
pub use money::{Money, MoneyRange, Price, TaxedMoney, TaxedMoneyRange, TaxedPrice};
