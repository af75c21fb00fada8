//! Repair of stimulus records whose 8-bit stimulus codes overflowed
//!
//! Long recordings can present more than 255 stimuli, which the 8-bit code
//! field cannot tell apart, and the hardware may emit a spurious extra entry
//! right after a code at the 255 boundary. The repair walks the recorded
//! entries alongside the display order from the presentation script:
//!
//! - an entry with fewer than `goodframes` frame times is dropped and the
//!   same display position is retried against the next entry;
//! - otherwise the entry is re-emitted with the display order id, its onset,
//!   and its first `goodframes` frame times;
//! - with `skip_line_after_overflow`, the entry following an emitted boundary
//!   stimulus (id >= 255) is consumed without being emitted.

use crate::error::{Result, StimError};
use crate::order::DisplayOrderSource;
use crate::{de, ser, StimRecord, STIMTIMES_REPAIRED};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Display ids at or above this value may be followed by a duplicate entry
pub const OVERFLOW_CODE: i64 = 255;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct RepairOptions {
    /// Number of frames in a proper stimulus; shorter entries are malformed
    pub goodframes: usize,
    /// Consume one extra entry after each emitted boundary stimulus
    pub skip_line_after_overflow: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        RepairOptions { goodframes: 10, skip_line_after_overflow: false }
    }
}

/// One transition of the repair state machine
#[derive(Clone, PartialEq, Debug)]
pub enum Step {
    /// Recorded `entry` was emitted for display order `position`
    Emit { position: usize, entry: usize, record: StimRecord },
    /// Recorded `entry` had too few frames and was left out
    Drop { entry: usize, frames: usize },
    /// Recorded `entry` was consumed as a duplicate after a boundary stimulus
    SkipDuplicate { entry: usize },
}

/// Cursor pair over the display order and the recorded entries, plus the
/// pending duplicate skip.
#[derive(Clone, Debug)]
pub struct OverflowRepair<'a> {
    order: &'a [i64],
    recorded: &'a [StimRecord],
    opts: RepairOptions,
    position: usize,
    entry: usize,
    awaiting_skip: bool,
    mismatches: usize,
}

impl<'a> OverflowRepair<'a> {
    pub fn new(order: &'a [i64], recorded: &'a [StimRecord], opts: RepairOptions) -> Self {
        OverflowRepair {
            order,
            recorded,
            opts,
            position: 0,
            entry: 0,
            awaiting_skip: false,
            mismatches: 0,
        }
    }

    /// Next display order position to satisfy
    pub fn position(&self) -> usize {
        self.position
    }

    /// Next recorded entry to examine
    pub fn entry(&self) -> usize {
        self.entry
    }

    pub fn awaiting_skip(&self) -> bool {
        self.awaiting_skip
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.order.len()
    }

    /// Advance by one transition. Returns `None` once every display order
    /// entry has been matched.
    pub fn step(&mut self) -> Result<Option<Step>> {
        if self.is_done() {
            return Ok(None);
        }
        if self.entry >= self.recorded.len() {
            return Err(StimError::IncompleteRecording {
                path: None,
                satisfied: self.position,
                expected: self.order.len(),
                entries: self.recorded.len(),
            });
        }

        let entry = self.entry;
        self.entry += 1;

        if self.awaiting_skip {
            self.awaiting_skip = false;
            debug!(line = entry + 1, "skipping entry after overflow");
            return Ok(Some(Step::SkipDuplicate { entry }));
        }

        let rec = &self.recorded[entry];
        let want = self.order[self.position];
        debug!(
            position = self.position + 1,
            line = entry + 1,
            should_be = want,
            is = rec.stim_id,
            onset = rec.onset,
            "comparing entry"
        );
        if rec.stim_id != want {
            self.mismatches += 1;
        }

        let nframes = rec.frame_count();
        if nframes < self.opts.goodframes {
            warn!(
                line = entry + 1,
                frames = nframes,
                goodframes = self.opts.goodframes,
                "dropping entry with too few frames"
            );
            return Ok(Some(Step::Drop { entry, frames: nframes }));
        }

        let frames: Vec<f64> = rec
            .frames
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .take(self.opts.goodframes)
            .copied()
            .collect();
        let position = self.position;
        self.position += 1;
        if self.opts.skip_line_after_overflow && want >= OVERFLOW_CODE {
            self.awaiting_skip = true;
        }
        Ok(Some(Step::Emit {
            position,
            entry,
            record: StimRecord::new(want, rec.onset, frames),
        }))
    }

    /// Run to completion, collecting the emitted records
    pub fn run(mut self) -> Result<Vec<StimRecord>> {
        info!("total stims to display: {}", self.order.len());
        let mut out = Vec::with_capacity(self.order.len());
        while let Some(step) = self.step()? {
            if let Step::Emit { record, .. } = step {
                out.push(record);
            }
        }
        if self.mismatches > 0 {
            info!(mismatches = self.mismatches, "recorded ids differed from the display order");
        }
        Ok(out)
    }
}

/// Repair `recorded` against the display order `order`
pub fn repair_overflow(
    recorded: &[StimRecord],
    order: &[i64],
    opts: RepairOptions,
) -> Result<Vec<StimRecord>> {
    OverflowRepair::new(order, recorded, opts).run()
}

/// Repair `stimtimes_file` in `dir` and write `stimtimes_repaired.txt` next to it.
///
/// The recorded file is never touched. Nothing is written unless the whole
/// display order is satisfied.
pub fn repair_dir<S>(
    dir: &Path,
    source: &S,
    stimtimes_file: &str,
    opts: RepairOptions,
) -> Result<PathBuf>
where
    S: DisplayOrderSource + ?Sized,
{
    let input = dir.join(stimtimes_file);
    let output = dir.join(STIMTIMES_REPAIRED);
    if output.exists() {
        return Err(StimError::AlreadyExists { path: output });
    }
    let order = source.display_order()?;
    let recorded = de::stimtimes_file(&input)?;
    let repaired = repair_overflow(&recorded, &order, opts).map_err(|e| match e {
        StimError::IncompleteRecording { path: None, satisfied, expected, entries } => {
            StimError::IncompleteRecording { path: Some(input.clone()), satisfied, expected, entries }
        }
        e => e,
    })?;
    ser::stimtimes_file(&output, &repaired)?;
    Ok(output)
}
