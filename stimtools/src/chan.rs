//! Channel map: which bit of the raw interconnect word carries which signal
//!
//! The default table follows the interconnect wiring:
//!
//! | channel                          | bit | output       | polarity |
//! |----------------------------------|-----|--------------|----------|
//! | `StimTrigger`                    | 0   | time         | -1       |
//! | `StimTriggerSamples`             | 0   | sample index | -1       |
//! | `StimTriggerOff`                 | 0   | time         | +1       |
//! | `FrameTriggerRaw`                | 1   | time         | -1       |
//! | `StimulusMonitorVerticalRefresh` | 2   | time         | +1       |
//! | `TwoPhotonFrameTrigger`          | 4   | time         | +1       |
//!
//! A `ChannelMap` is built once per decode and never changes afterwards.

use crate::bit;
use crate::error::{Result, StimError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of entries in a polarity override vector
pub const POLARITY_SLOTS: usize = 9;

/// Width of the raw interconnect word
pub const WORD_BITS: u8 = 16;

const DEFAULT_POLARITY: [Polarity; POLARITY_SLOTS] = [
    Polarity::Inverted,
    Polarity::Normal,
    Polarity::Inverted,
    Polarity::Normal,
    Polarity::Normal,
    Polarity::Normal,
    Polarity::Normal,
    Polarity::Normal,
    Polarity::Normal,
];

/// Named logical signals on the interconnect
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum Channel {
    StimTrigger,
    StimTriggerSamples,
    StimTriggerOff,
    FrameTriggerRaw,
    StimulusMonitorVerticalRefresh,
    TwoPhotonFrameTrigger,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::StimTrigger,
        Channel::StimTriggerSamples,
        Channel::StimTriggerOff,
        Channel::FrameTriggerRaw,
        Channel::StimulusMonitorVerticalRefresh,
        Channel::TwoPhotonFrameTrigger,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Channel::StimTrigger => "StimTrigger",
            Channel::StimTriggerSamples => "StimTriggerSamples",
            Channel::StimTriggerOff => "StimTriggerOff",
            Channel::FrameTriggerRaw => "FrameTriggerRaw",
            Channel::StimulusMonitorVerticalRefresh => "StimulusMonitorVerticalRefresh",
            Channel::TwoPhotonFrameTrigger => "TwoPhotonFrameTrigger",
        }
    }

    /// Default bit position in the raw word
    fn default_bit(self) -> u8 {
        match self {
            Channel::StimTrigger | Channel::StimTriggerSamples | Channel::StimTriggerOff => 0,
            Channel::FrameTriggerRaw => 1,
            Channel::StimulusMonitorVerticalRefresh => 2,
            Channel::TwoPhotonFrameTrigger => 4,
        }
    }

    /// Slot of the polarity override vector that controls this channel.
    /// The trigger time and trigger sample channels share slot 0.
    pub fn polarity_slot(self) -> usize {
        match self {
            Channel::StimTrigger | Channel::StimTriggerSamples => 0,
            Channel::StimTriggerOff => 1,
            Channel::FrameTriggerRaw => 2,
            Channel::StimulusMonitorVerticalRefresh => 3,
            Channel::TwoPhotonFrameTrigger => 4,
        }
    }

    fn default_form(self) -> OutputForm {
        match self {
            Channel::StimTriggerSamples => OutputForm::SampleIndex,
            _ => OutputForm::Time,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign applied to a bit before edge detection. `Inverted` turns falling
/// edges of the raw bit into rising edges.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Polarity {
    Normal,
    Inverted,
}

impl Polarity {
    pub fn is_inverted(self) -> bool {
        self == Polarity::Inverted
    }
}

impl TryFrom<i8> for Polarity {
    type Error = StimError;

    fn try_from(v: i8) -> Result<Self> {
        match v {
            1 => Ok(Polarity::Normal),
            -1 => Ok(Polarity::Inverted),
            _ => Err(StimError::InvalidConfiguration(format!(
                "polarity must be 1 or -1, got {}",
                v
            ))),
        }
    }
}

impl From<Polarity> for i8 {
    fn from(p: Polarity) -> i8 {
        match p {
            Polarity::Normal => 1,
            Polarity::Inverted => -1,
        }
    }
}

/// Whether a channel reports crossing times or raw sample indices
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum OutputForm {
    Time,
    SampleIndex,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct ChannelSpec {
    pub channel: Channel,
    /// 0-indexed bit of the raw word
    pub bit: u8,
    pub polarity: Polarity,
    pub form: OutputForm,
}

impl ChannelSpec {
    pub fn new(channel: Channel, bit: u8, polarity: Polarity, form: OutputForm) -> Result<Self> {
        if bit >= WORD_BITS {
            return Err(StimError::InvalidConfiguration(format!(
                "{}: bit {} is outside a {}-bit word",
                channel, bit, WORD_BITS
            )));
        }
        Ok(ChannelSpec { channel, bit, polarity, form })
    }
}

/// Immutable table of channel specifications
#[derive(Clone, PartialEq, Debug)]
pub struct ChannelMap {
    specs: Vec<ChannelSpec>,
}

impl ChannelMap {
    pub fn builder() -> ChannelMapBuilder {
        ChannelMapBuilder::default()
    }

    /// Build a map from explicit specifications. Each channel may appear once.
    pub fn from_specs(specs: Vec<ChannelSpec>) -> Result<Self> {
        for (i, s) in specs.iter().enumerate() {
            if s.bit >= WORD_BITS {
                return Err(StimError::InvalidConfiguration(format!(
                    "{}: bit {} is outside a {}-bit word",
                    s.channel, s.bit, WORD_BITS
                )));
            }
            if specs[..i].iter().any(|o| o.channel == s.channel) {
                return Err(StimError::InvalidConfiguration(format!(
                    "{} is mapped more than once",
                    s.channel
                )));
            }
        }
        Ok(ChannelMap { specs })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelSpec> {
        self.specs.iter()
    }

    pub fn get(&self, channel: Channel) -> Option<&ChannelSpec> {
        self.specs.iter().find(|s| s.channel == channel)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Mask of every bit read by some channel
    pub fn bit_mask(&self) -> u16 {
        let bits: Vec<u8> = self.specs.iter().map(|s| s.bit).collect();
        bit::bits_to_mask(&bits)
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        ChannelMap::builder().build()
    }
}

/// Collects polarity choices, then produces a `ChannelMap`
#[derive(Clone, Debug)]
pub struct ChannelMapBuilder {
    polarity: [Polarity; POLARITY_SLOTS],
}

impl Default for ChannelMapBuilder {
    fn default() -> Self {
        ChannelMapBuilder { polarity: DEFAULT_POLARITY }
    }
}

impl ChannelMapBuilder {
    /// Set the polarity of one override slot
    pub fn polarity(mut self, slot: usize, p: Polarity) -> Result<Self> {
        match self.polarity.get_mut(slot) {
            Some(x) => {
                *x = p;
                Ok(self)
            }
            None => Err(StimError::InvalidConfiguration(format!(
                "polarity slot {} out of range (0..{})",
                slot, POLARITY_SLOTS
            ))),
        }
    }

    /// Apply a polarity override vector. It must have exactly
    /// `POLARITY_SLOTS` entries; `None` entries keep the default.
    pub fn overrides(mut self, overrides: &[Option<Polarity>]) -> Result<Self> {
        if overrides.len() != POLARITY_SLOTS {
            return Err(StimError::InvalidConfiguration(format!(
                "polarity override must have {} elements, got {}",
                POLARITY_SLOTS,
                overrides.len()
            )));
        }
        for (slot, p) in overrides.iter().enumerate() {
            if let Some(p) = p {
                self.polarity[slot] = *p;
            }
        }
        Ok(self)
    }

    pub fn build(self) -> ChannelMap {
        let specs = Channel::ALL
            .iter()
            .map(|&channel| ChannelSpec {
                channel,
                bit: channel.default_bit(),
                polarity: self.polarity[channel.polarity_slot()],
                form: channel.default_form(),
            })
            .collect();
        ChannelMap { specs }
    }
}

/// Parse a comma-separated polarity override list such as `-1,,1,nan,,,,,`.
/// Empty entries and `nan` are unset.
pub fn parse_overrides(s: &str) -> Result<Vec<Option<Polarity>>> {
    s.split(',')
        .map(|x| {
            let x = x.trim();
            if x.is_empty() || x.eq_ignore_ascii_case("nan") {
                return Ok(None);
            }
            let v: i8 = x.parse().map_err(|_| {
                StimError::InvalidConfiguration(format!("cannot parse polarity '{}'", x))
            })?;
            Polarity::try_from(v).map(Some)
        })
        .collect()
}
