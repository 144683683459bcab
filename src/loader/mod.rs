//! Loader module containing line parsing, configuration and aggregation

pub mod config;
pub mod core;
pub mod parser;

pub use config::*;
pub use core::*;
