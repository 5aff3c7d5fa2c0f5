//! CSV output backend.
//!
//! Creates up to three files in the configured output directory:
//! - `generations.csv` (always, header written on open)
//! - `run_series.csv` (per-tick columns, on [`write_series`][OutputWriter::write_series])
//! - `run_summary.csv` (scalar results, on `write_series`)

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;
use sr_sim::{ResultKey, ResultValue};
use tracing::debug;

use crate::writer::OutputWriter;
use crate::{GenerationRow, OutputError, OutputResult};

pub const SERIES_FILE: &str = "run_series.csv";
pub const SUMMARY_FILE: &str = "run_summary.csv";
pub const GENERATIONS_FILE: &str = "generations.csv";

/// Writes run results and search progress to CSV files.
pub struct CsvWriter {
    dir:         PathBuf,
    generations: Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open `generations.csv` in `dir` and write its header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut generations = Writer::from_path(dir.join(GENERATIONS_FILE))?;
        generations.write_record([
            "generation",
            "best",
            "best_feasible",
            "best_so_far",
            "mean_feasible",
            "feasible",
            "population",
        ])?;

        Ok(Self {
            dir: dir.to_path_buf(),
            generations,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_series(&mut self, results: &[(ResultKey, ResultValue)]) -> OutputResult<()> {
        let series: Vec<(ResultKey, &[f64])> = results
            .iter()
            .filter_map(|(k, v)| v.as_series().map(|s| (*k, s)))
            .collect();
        let scalars: Vec<(ResultKey, f64)> =
            results.iter().filter_map(|(k, v)| v.as_scalar().map(|s| (*k, s))).collect();

        if !series.is_empty() {
            let rows = series[0].1.len();
            if let Some((key, s)) = series.iter().find(|(_, s)| s.len() != rows) {
                return Err(OutputError::Ragged { key: key.to_string(), len: s.len(), expected: rows });
            }

            let mut out = Writer::from_path(self.dir.join(SERIES_FILE))?;
            let mut header = vec!["tick"];
            header.extend(series.iter().map(|(k, _)| k.as_str()));
            out.write_record(&header)?;
            for i in 0..rows {
                let mut record = Vec::with_capacity(series.len() + 1);
                record.push(i.to_string());
                record.extend(series.iter().map(|(_, s)| s[i].to_string()));
                out.write_record(&record)?;
            }
            out.flush()?;
            debug!(columns = series.len(), rows, "wrote {SERIES_FILE}");
        }

        if !scalars.is_empty() {
            let mut out = Writer::from_path(self.dir.join(SUMMARY_FILE))?;
            out.write_record(["key", "value"])?;
            for (key, value) in &scalars {
                out.write_record([key.as_str().to_string(), value.to_string()])?;
            }
            out.flush()?;
        }
        Ok(())
    }

    fn write_generation(&mut self, row: &GenerationRow) -> OutputResult<()> {
        self.generations.write_record(&[
            row.generation.to_string(),
            row.best.to_string(),
            (row.best_feasible as u8).to_string(),
            row.best_so_far.to_string(),
            row.mean_feasible.map(|m| m.to_string()).unwrap_or_default(),
            row.feasible.to_string(),
            row.population.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.generations.flush()?;
        Ok(())
    }
}
