//! Reader for event data exported from Plexon as tab-delimited text
//!
//! The first row names the fields; each column below it is a series of event
//! times. Columns may have different lengths, so empty cells are skipped.

use crate::error::{Result, StimError};
use crate::segment::{self, Tail};
use crate::{de, StimRecord};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Conventional name of the exported event file in a recording directory
pub const STIMTIMES_PLEXON: &str = "stimtimes_plexon.txt";

pub const STIMULUS_TRIGGER: &str = "StimulusTrigger";
pub const FRAME_TRIGGER: &str = "FrameTrigger";
pub const STROBED: &str = "Strobed";

/// Stimulus onsets and frames recovered from a Plexon export
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PlexonStimTimes {
    /// Strobed stimulus ids, when the export carries them
    pub stim_ids: Option<Vec<i64>>,
    pub onsets: Vec<f64>,
    pub frames: Vec<Vec<f64>>,
}

impl PlexonStimTimes {
    /// Stimulus records, available only when every onset has a strobed id
    pub fn records(&self) -> Option<Vec<StimRecord>> {
        let ids = self.stim_ids.as_ref()?;
        if ids.len() != self.onsets.len() {
            return None;
        }
        Some(
            ids.iter()
                .zip(self.onsets.iter())
                .zip(self.frames.iter())
                .map(|((&id, &onset), frames)| StimRecord::new(id, onset, frames.clone()))
                .collect(),
        )
    }
}

/// Deserialize named event columns from a tab-delimited export
pub fn events(rdr: &mut csv::Reader<impl Read>, path: &Path) -> Result<BTreeMap<String, Vec<f64>>> {
    let names: Vec<String> = rdr
        .headers()
        .map_err(|e| StimError::format(path, 1, e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut columns: BTreeMap<String, Vec<f64>> =
        names.iter().map(|n| (n.clone(), Vec::new())).collect();

    for (n, result) in rdr.records().enumerate() {
        // Header is line 1
        let lineno = n + 2;
        let record = result.map_err(|e| StimError::format(path, lineno, e.to_string()))?;
        for (name, cell) in names.iter().zip(record.iter()) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            let v = cell.parse::<f64>().map_err(|_| {
                StimError::format(path, lineno, format!("cannot parse '{}' in column {}", cell, name))
            })?;
            if let Some(col) = columns.get_mut(name) {
                col.push(v);
            }
        }
    }
    Ok(columns)
}

/// Read named event columns from the export at `path`
pub fn events_file(path: &Path) -> Result<BTreeMap<String, Vec<f64>>> {
    let brdr = de::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(b'\t')
        .from_reader(brdr);
    events(&mut rdr, path)
}

/// Read `stimtimes_plexon.txt` in `dir` and bucket its frame triggers.
///
/// The last stimulus receives every frame not claimed by an earlier one.
pub fn stimtimes(dir: &Path) -> Result<PlexonStimTimes> {
    let mut columns = events_file(&dir.join(STIMTIMES_PLEXON))?;
    let onsets = columns.remove(STIMULUS_TRIGGER).unwrap_or_default();
    let frame_triggers = columns.remove(FRAME_TRIGGER).unwrap_or_default();
    let stim_ids = columns
        .remove(STROBED)
        .map(|s| s.iter().map(|v| v.trunc() as i64).collect::<Vec<i64>>());
    if let Some(ids) = &stim_ids {
        if ids.len() != onsets.len() {
            warn!(ids = ids.len(), onsets = onsets.len(), "strobed ids do not match stimulus triggers");
        }
    }
    let frames = segment::frame_buckets_with(&onsets, &frame_triggers, Tail::Remaining);
    Ok(PlexonStimTimes { stim_ids, onsets, frames })
}
