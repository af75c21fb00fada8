//! Deserialization of stimulus records, event times and raw samples

use crate::error::{Result, StimError};
use crate::StimRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::vec::Vec;

/// Deserialize stimulus records in `stimtimes.txt` format.
///
/// Blank lines are skipped. Every other line must hold at least a stimulus id
/// and an onset; remaining numbers are frame times. `path` only labels errors.
pub fn stimtimes(rdr: impl BufRead, path: &Path) -> Result<Vec<StimRecord>> {
    let mut records: Vec<StimRecord> = Vec::new();
    for (n, line) in rdr.lines().enumerate() {
        let line = line.map_err(|e| StimError::io(path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lineno = n + 1;
        let values = numbers(line, path, lineno)?;
        if values.len() < 2 {
            return Err(StimError::format(path, lineno, "expected a stimulus id and an onset time"));
        }
        if !values[0].is_finite() {
            return Err(StimError::format(path, lineno, "stimulus id is not finite"));
        }
        records.push(StimRecord {
            stim_id: values[0].trunc() as i64,
            onset: values[1],
            frames: Some(values[2..].to_vec()),
        });
    }
    Ok(records)
}

/// Read stimulus records from the file at `path`
pub fn stimtimes_file(path: &Path) -> Result<Vec<StimRecord>> {
    stimtimes(open(path)?, path)
}

/// Deserialize times written one per line
pub fn times(rdr: impl BufRead, path: &Path) -> Result<Vec<f64>> {
    let mut ts: Vec<f64> = Vec::new();
    for (n, line) in rdr.lines().enumerate() {
        let line = line.map_err(|e| StimError::io(path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let t = line
            .parse::<f64>()
            .map_err(|_| StimError::format(path, n + 1, format!("cannot parse '{}' as a time", line)))?;
        ts.push(t);
    }
    Ok(ts)
}

/// Read times written one per line from the file at `path`
pub fn times_file(path: &Path) -> Result<Vec<f64>> {
    times(open(path)?, path)
}

/// Deserialize whitespace-separated integers, as used by display order files
pub fn integers(rdr: impl BufRead, path: &Path) -> Result<Vec<i64>> {
    let mut xs: Vec<i64> = Vec::new();
    for (n, line) in rdr.lines().enumerate() {
        let line = line.map_err(|e| StimError::io(path, e))?;
        for tok in line.split_whitespace() {
            let x = tok.parse::<i64>().map_err(|_| {
                StimError::format(path, n + 1, format!("cannot parse '{}' as an integer", tok))
            })?;
            xs.push(x);
        }
    }
    Ok(xs)
}

/// Deserialize raw samples from tab-separated values (time, word).
pub fn samples_tsv(rdr: &mut csv::Reader<impl Read>, path: &Path) -> Result<(Vec<f64>, Vec<u16>)> {
    let mut time: Vec<f64> = Vec::new();
    let mut words: Vec<u16> = Vec::new();
    for (n, result) in rdr.records().enumerate() {
        let lineno = n + 1;
        let record = result.map_err(|e| StimError::format(path, lineno, e.to_string()))?;
        match (record.get(0), record.get(1)) {
            (Some(t), Some(w)) => {
                let t = t.trim().parse::<f64>().map_err(|_| {
                    StimError::format(path, lineno, format!("cannot parse '{}' as a time", t))
                })?;
                let w = w.trim().parse::<u16>().map_err(|_| {
                    StimError::format(path, lineno, format!("cannot parse '{}' as a 16-bit word", w))
                })?;
                time.push(t);
                words.push(w);
            }
            _ => return Err(StimError::format(path, lineno, "expected a time and a raw word")),
        }
    }
    Ok((time, words))
}

fn numbers(line: &str, path: &Path, lineno: usize) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| {
                StimError::format(path, lineno, format!("cannot parse '{}' as a number", tok))
            })
        })
        .collect()
}

pub(crate) fn open(path: &Path) -> Result<BufReader<File>> {
    if !path.is_file() {
        return Err(StimError::NotFound { path: path.to_path_buf() });
    }
    let f = File::open(path).map_err(|e| StimError::io(path, e))?;
    Ok(BufReader::new(f))
}
