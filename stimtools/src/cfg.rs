//! Configuration tools: declaring how a recording is decoded and repaired

use crate::chan::{ChannelMap, Polarity};
use crate::error::{Result, StimError};
use crate::order::DISPLAY_ORDER;
use crate::repair::RepairOptions;
use crate::STIMTIMES;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Decode run specification, stored as JSON.
///
/// All fields are optional: specify only what differs from the defaults.
///
/// ## Polarity
///
/// `polarity` is either absent (default polarities) or a list of exactly nine
/// entries, each `1`, `-1`, or `null` to keep the default for that slot:
///
/// | slot | channels                                   | default |
/// |------|--------------------------------------------|---------|
/// | 0    | `StimTrigger`, `StimTriggerSamples`        | -1      |
/// | 1    | `StimTriggerOff`                           | 1       |
/// | 2    | `FrameTriggerRaw`                          | -1      |
/// | 3    | `StimulusMonitorVerticalRefresh`           | 1       |
/// | 4    | `TwoPhotonFrameTrigger`                    | 1       |
/// | 5-8  | unused                                     | 1       |
///
/// ## Repair
///
/// `repair` holds the settings for rebuilding `stimtimes.txt` against the
/// display order when stimulus codes overflowed.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct DecodeRun {
    #[serde(default)]
    pub description: String,
    #[serde(default = "emptyvec", skip_serializing_if = "Vec::is_empty")]
    pub polarity: Vec<Option<Polarity>>,
    /// Remove earlier decoder outputs before writing
    pub clean: Option<bool>,
    pub repair: Option<RepairSettings>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RepairSettings {
    pub goodframes: Option<usize>,
    pub skip_line_after_overflow: Option<bool>,
    pub stimtimes_file: Option<String>,
    pub display_order_file: Option<PathBuf>,
}

fn emptyvec<T>() -> Vec<T> {
    Vec::new()
}

/// Creates an empty DecodeRun: default polarities, no cleaning, default repair.
impl Default for DecodeRun {
    fn default() -> Self {
        DecodeRun {
            description: String::new(),
            polarity: Vec::new(),
            clean: None,
            repair: None,
        }
    }
}

impl DecodeRun {
    /// Load and validate a run specification from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(StimError::NotFound { path: path.to_path_buf() });
        }
        let f = File::open(path).map_err(|e| StimError::io(path, e))?;
        let run: DecodeRun = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            StimError::InvalidConfiguration(format!("{}: {}", path.display(), e))
        })?;
        run.channel_map()?;
        Ok(run)
    }

    /// Channel map with this run's polarity overrides applied
    pub fn channel_map(&self) -> Result<ChannelMap> {
        let builder = ChannelMap::builder();
        if self.polarity.is_empty() {
            return Ok(builder.build());
        }
        Ok(builder.overrides(&self.polarity)?.build())
    }

    pub fn clean(&self) -> bool {
        self.clean.unwrap_or(false)
    }

    pub fn repair_options(&self) -> RepairOptions {
        let mut opts = RepairOptions::default();
        if let Some(r) = &self.repair {
            if let Some(g) = r.goodframes {
                opts.goodframes = g;
            }
            if let Some(s) = r.skip_line_after_overflow {
                opts.skip_line_after_overflow = s;
            }
        }
        opts
    }

    /// Name of the recorded file to repair, relative to the directory
    pub fn stimtimes_file(&self) -> String {
        self.repair
            .as_ref()
            .and_then(|r| r.stimtimes_file.clone())
            .unwrap_or_else(|| STIMTIMES.to_string())
    }

    /// Display order file; relative paths resolve against `dir`
    pub fn display_order_file(&self, dir: &Path) -> PathBuf {
        match self.repair.as_ref().and_then(|r| r.display_order_file.as_ref()) {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => dir.join(p),
            None => dir.join(DISPLAY_ORDER),
        }
    }
}
