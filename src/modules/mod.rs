pub mod providers;
pub mod taxes;
