//! Traits at the loader's collaborator boundaries

use bigdecimal::BigDecimal;
use std::collections::HashMap;
use std::io;
use std::path::Path;

use crate::fx::RateTable;
use crate::types::*;

/// Mapping from business key to record, the sole output of a load
pub type RecordMap = HashMap<String, TransactionRecord>;

/// Loads raw lines into a keyed record mapping
///
/// Implementations never fail a whole batch: bad lines are skipped and
/// recorded, and the returned mapping is the only signal of a degraded run.
pub trait Loader {
    /// Populate `map` from `lines`.
    ///
    /// Returns `None` when `lines` is `None` ("nothing to process"), and an
    /// empty mapping when the input was present but held no usable data.
    fn load<S: AsRef<str>>(&mut self, map: RecordMap, lines: Option<&[S]>)
        -> Option<RecordMap>;

    /// Read a text file into lines for a later [`Loader::load`] call
    fn read_lines(path: impl AsRef<Path>) -> io::Result<Vec<String>>
    where
        Self: Sized,
    {
        let content = std::fs::read_to_string(path)?;
        Ok(content.lines().map(str::to_string).collect())
    }
}

/// Resolves a cross rate between two currencies quoted against a common pivot
///
/// Fails with [`ExchangeRateError`] when either rate is absent or unusable.
pub trait RateResolver: Send + Sync {
    /// Rate that turns one unit of the source currency into the reference currency
    fn cross_rate(
        &self,
        rates: &RateTable,
        source_pair: &str,
        reference_pair: &str,
    ) -> RateResult<BigDecimal>;
}
