//! Exchange rates and cross-rate resolution

pub mod rates;

pub use rates::*;
