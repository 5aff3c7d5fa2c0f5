//! The `OutputWriter` trait implemented by output backends.

use sr_sim::{ResultKey, ResultValue};

use crate::{GenerationRow, OutputResult};

pub trait OutputWriter {
    /// Write the requested results of one run: series become columns,
    /// scalars become `key,value` rows.
    fn write_series(&mut self, results: &[(ResultKey, ResultValue)]) -> OutputResult<()>;

    /// Write one search progress row.
    fn write_generation(&mut self, row: &GenerationRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
