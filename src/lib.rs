//! # Transaction Loader
//!
//! Loads tab-delimited transaction exports into an in-memory table keyed by a
//! business key, normalizing amounts into one reference currency on the way.
//!
//! ## Features
//!
//! - **Exact decimals**: amounts are parsed and averaged with `BigDecimal`, never floats
//! - **Currency normalization**: configured currencies are converted through a USD pivot
//! - **Duplicate merging**: lines sharing a business key are folded into a running mean
//! - **Fail-soft processing**: bad lines and missing rates become diagnostics, not errors
//!
//! ## Quick Start
//!
//! ```rust
//! use transaction_loader::{DataLoader, Loader, RecordMap};
//! use bigdecimal::BigDecimal;
//! use std::str::FromStr;
//!
//! let mut loader = DataLoader::default();
//! loader.register_exchange_rate("CHF/USD", BigDecimal::from_str("0.9").unwrap());
//! loader.register_exchange_rate("EUR/USD", BigDecimal::from_str("1.1").unwrap());
//!
//! let lines = [
//!     "Company Code\tA\tB\tC\tD\tCUR\tAMT",
//!     "C1\tx\ty\tz\tw\tCHF\t110.00",
//! ];
//! let records = loader.load(RecordMap::new(), Some(&lines[..])).unwrap();
//! assert_eq!(records["C1/x/y/z/w"].amount(), &BigDecimal::from(90));
//! ```

pub mod fx;
pub mod loader;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use fx::*;
pub use loader::*;
pub use traits::*;
pub use types::*;
