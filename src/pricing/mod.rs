//! Time-of-use tariff and cost accounting

pub mod costs;
pub mod tariff;

pub use costs::*;
pub use tariff::*;
