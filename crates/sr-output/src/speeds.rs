//! Cached speed-schedule writer.

use std::path::Path;

use crate::OutputResult;

/// Write `speeds` in the one-column `speed_kmh` format read by
/// [`sr_sim::load_speeds_csv`].
pub fn write_speeds_csv(path: &Path, speeds: &[f64]) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = csv::Writer::from_path(path)?;
    out.write_record(["speed_kmh"])?;
    for v in speeds {
        out.write_record([v.to_string()])?;
    }
    out.flush()?;
    Ok(())
}
