//! Write the decoded interconnect events of one recording directory

use crate::chan::Channel;
use crate::decode::DecodedEventSet;
use crate::error::{Result, StimError};
use crate::segment;
use crate::{ser, StimRecord};
use crate::{DECODING_FINISHED, STIMONTIMES, STIMTIMES, TWOPHOTON_TIMES, VERTICAL_BLANKING};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Every file `write_textfiles` may produce, marker last
pub const OUTPUTS: [&str; 5] = [
    STIMTIMES,
    STIMONTIMES,
    VERTICAL_BLANKING,
    TWOPHOTON_TIMES,
    DECODING_FINISHED,
];

/// Pair stimulus codes with trigger onsets and their frame buckets
pub fn stim_records(events: &DecodedEventSet) -> Vec<StimRecord> {
    let codes = match &events.stim_codes {
        Some(c) => c,
        None => return Vec::new(),
    };
    let onsets = events.times(Channel::StimTrigger);
    if codes.len() != onsets.len() {
        warn!(
            codes = codes.len(),
            onsets = onsets.len(),
            "stimulus codes and trigger onsets differ in length"
        );
    }
    let buckets = segment::frame_buckets(onsets, events.times(Channel::FrameTriggerRaw));
    codes
        .iter()
        .zip(onsets.iter())
        .zip(buckets)
        .map(|((&code, &onset), frames)| StimRecord::new(code as i64, onset, frames))
        .collect()
}

/// Write `stimtimes.txt`, `stimontimes.txt`, the vertical refresh and
/// two-photon frame time files, and finally the completion marker into `dir`.
///
/// With `clean`, earlier copies of these files are removed first. Otherwise
/// any existing target aborts the write before a byte is written.
pub fn write_textfiles(dir: &Path, events: &DecodedEventSet, clean: bool) -> Result<()> {
    if clean {
        for name in OUTPUTS.iter() {
            let path = dir.join(name);
            if path.is_file() {
                fs::remove_file(&path).map_err(|e| StimError::io(&path, e))?;
                info!(path = %path.display(), "removed previous output");
            }
        }
    } else if let Some(name) = OUTPUTS.iter().find(|name| dir.join(name).exists()) {
        return Err(StimError::AlreadyExists { path: dir.join(name) });
    }

    if events.stim_codes.is_some() && events.contains(Channel::StimTrigger) {
        let records = stim_records(events);
        ser::stimtimes_file(&dir.join(STIMTIMES), &records)?;
        let onsets: Vec<StimRecord> = records
            .iter()
            .map(|r| StimRecord::onset_only(r.stim_id, r.onset))
            .collect();
        ser::stimtimes_file(&dir.join(STIMONTIMES), &onsets)?;
    }
    if events.contains(Channel::TwoPhotonFrameTrigger) {
        ser::times_file(
            &dir.join(TWOPHOTON_TIMES),
            events.times(Channel::TwoPhotonFrameTrigger),
        )?;
    }
    if events.contains(Channel::StimulusMonitorVerticalRefresh) {
        ser::times_file(
            &dir.join(VERTICAL_BLANKING),
            events.times(Channel::StimulusMonitorVerticalRefresh),
        )?;
    }
    ser::marker_file(&dir.join(DECODING_FINISHED))?;
    info!(dir = %dir.display(), "decoding finished");
    Ok(())
}
