//! `sr-output`: output writers for the solar race simulator.
//!
//! | File               | Written by                                    |
//! |--------------------|-----------------------------------------------|
//! | `run_series.csv`   | [`OutputWriter::write_series`] (series keys)  |
//! | `run_summary.csv`  | [`OutputWriter::write_series`] (scalar keys)  |
//! | `generations.csv`  | [`SearchOutputObserver`] during a search      |
//! | `speeds_*.csv`     | [`write_speeds_csv`]                          |
//!
//! # Usage
//!
//! ```rust,ignore
//! use sr_output::{CsvWriter, SearchOutputObserver};
//!
//! let mut obs = SearchOutputObserver::new(CsvWriter::new(Path::new("./output"))?);
//! let outcome = ga.maximize(&bounds, &objective, &mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod speeds;
pub mod writer;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SearchOutputObserver;
pub use row::GenerationRow;
pub use speeds::write_speeds_csv;
pub use writer::OutputWriter;
