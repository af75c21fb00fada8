//! Serialization of stimulus records and event times to text files
//!
//! `stimtimes.txt` holds one line per stimulus:
//!
//! ```text
//! <stim id> <onset> [<frame 1> <frame 2> ...]
//! ```
//!
//! with every time printed to 5 decimal places, followed by one blank line.

use crate::error::{Result, StimError};
use crate::StimRecord;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Serialize stimulus records in `stimtimes.txt` format
pub fn stimtimes(wtr: &mut impl Write, records: &[StimRecord]) -> std::io::Result<()> {
    for r in records.iter() {
        write!(wtr, "{} {:.5}", r.stim_id, r.onset)?;
        if let Some(frames) = &r.frames {
            for t in frames.iter() {
                write!(wtr, " {:.5}", t)?;
            }
        }
        writeln!(wtr)?;
    }
    writeln!(wtr)?;
    Ok(())
}

/// Serialize times one per line, 5 decimal places
pub fn times(wtr: &mut impl Write, times: &[f64]) -> std::io::Result<()> {
    for t in times.iter() {
        writeln!(wtr, "{:.5}", t)?;
    }
    Ok(())
}

/// Write stimulus records to a new file at `path`.
///
/// Fails with `AlreadyExists` before writing anything if `path` is present.
pub fn stimtimes_file(path: &Path, records: &[StimRecord]) -> Result<()> {
    let mut b: Vec<u8> = Vec::new();
    stimtimes(&mut b, records).map_err(|e| StimError::io(path, e))?;
    create_new(path, &b)?;
    info!(path = %path.display(), records = records.len(), "wrote stimulus records");
    Ok(())
}

/// Write times, one per line, to a new file at `path`
pub fn times_file(path: &Path, ts: &[f64]) -> Result<()> {
    let mut b: Vec<u8> = Vec::new();
    times(&mut b, ts).map_err(|e| StimError::io(path, e))?;
    create_new(path, &b)?;
    info!(path = %path.display(), times = ts.len(), "wrote event times");
    Ok(())
}

/// Create an empty marker file at `path`
pub fn marker_file(path: &Path) -> Result<()> {
    create_new(path, &[])
}

/// Write `contents` to a file that must not exist yet. A failed write removes
/// the partial file so nothing is left behind.
fn create_new(path: &Path, contents: &[u8]) -> Result<()> {
    if path.exists() {
        return Err(StimError::AlreadyExists { path: path.to_path_buf() });
    }
    let mut f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| StimError::io(path, e))?;
    if let Err(e) = f.write_all(contents).and_then(|_| f.flush()) {
        drop(f);
        let _ = fs::remove_file(path);
        return Err(StimError::io(path, e));
    }
    Ok(())
}
