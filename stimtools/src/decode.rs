//! Decode a raw multiplexed interconnect channel into named edge sequences

use crate::bit::{self, BitOps};
use crate::chan::{Channel, ChannelMap, OutputForm, WORD_BITS};
use crate::error::{Result, StimError};
use std::collections::BTreeMap;
use tracing::debug;

/// Edge sequence of one channel, in the channel's output form
#[derive(Clone, PartialEq, Debug)]
pub enum Events {
    Times(Vec<f64>),
    Samples(Vec<usize>),
}

impl Events {
    pub fn len(&self) -> usize {
        match self {
            Events::Times(t) => t.len(),
            Events::Samples(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of decoding one recording
#[derive(Clone, PartialEq, Debug, Default)]
pub struct DecodedEventSet {
    pub events: BTreeMap<Channel, Events>,
    /// Stimulus code at each `StimTriggerSamples` index; `None` when the map
    /// has no trigger sample channel
    pub stim_codes: Option<Vec<u8>>,
}

impl DecodedEventSet {
    /// Crossing times of a time-form channel; empty if the channel is absent
    pub fn times(&self, channel: Channel) -> &[f64] {
        match self.events.get(&channel) {
            Some(Events::Times(t)) => t,
            _ => &[],
        }
    }

    /// Sample indices of a sample-form channel; empty if the channel is absent
    pub fn samples(&self, channel: Channel) -> &[usize] {
        match self.events.get(&channel) {
            Some(Events::Samples(s)) => s,
            _ => &[],
        }
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.events.contains_key(&channel)
    }
}

/// Decode `words` sampled at `time` against `map`.
///
/// Each channel's bit is extracted, inverted when the polarity is negative,
/// and reduced to the first sample after every 0 -> 1 transition.
pub fn decode<W: BitOps>(time: &[f64], words: &[W], map: &ChannelMap) -> Result<DecodedEventSet> {
    if time.len() != words.len() {
        return Err(StimError::LengthMismatch { times: time.len(), words: words.len() });
    }

    // Several channels share a bit; extract each used bit once
    let mut signals: [Option<Vec<bool>>; WORD_BITS as usize] = Default::default();
    for b in bit::mask_to_bits(map.bit_mask()) {
        signals[b as usize] = Some(bit::bit_signal(words, b, false));
    }

    let mut out = DecodedEventSet::default();
    for spec in map.iter() {
        let crossings = match &signals[spec.bit as usize] {
            Some(raw) if spec.polarity.is_inverted() => {
                let inv: Vec<bool> = raw.iter().map(|&x| !x).collect();
                bit::rising_edges(&inv)
            }
            Some(raw) => bit::rising_edges(raw),
            None => Vec::new(),
        };
        debug!(channel = %spec.channel, edges = crossings.len(), "decoded channel");
        let events = match spec.form {
            OutputForm::Time => Events::Times(crossings.iter().map(|&i| time[i]).collect()),
            OutputForm::SampleIndex => Events::Samples(crossings),
        };
        out.events.insert(spec.channel, events);
    }

    if out.contains(Channel::StimTriggerSamples) {
        out.stim_codes = Some(stim_codes(words, out.samples(Channel::StimTriggerSamples)));
    }
    Ok(out)
}

/// Stimulus code (bits 8-15) of the raw word at each trigger sample
pub fn stim_codes<W: BitOps>(words: &[W], samples: &[usize]) -> Vec<u8> {
    samples
        .iter()
        .filter_map(|&i| words.get(i))
        .map(|w| w.stim_code())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chan::{Polarity, POLARITY_SLOTS};

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 * 0.001).collect()
    }

    #[test]
    fn all_zero_signal_has_no_edges() {
        let words = vec![0u16; 64];
        let time = ramp(64);
        for p0 in [Polarity::Normal, Polarity::Inverted] {
            for p2 in [Polarity::Normal, Polarity::Inverted] {
                let map = ChannelMap::builder()
                    .polarity(0, p0)
                    .and_then(|b| b.polarity(2, p2))
                    .unwrap()
                    .build();
                let out = decode(&time, &words, &map).unwrap();
                assert!(out.events.values().all(Events::is_empty));
                assert_eq!(Some(vec![]), out.stim_codes);
            }
        }
    }

    #[test]
    fn inverted_trigger_fires_on_falling_edge() {
        let time = ramp(6);
        let words = [0u16, 0, 1, 1, 1, 0];
        let out = decode(&time, &words, &ChannelMap::default()).unwrap();
        assert_eq!(&[5], out.samples(Channel::StimTriggerSamples));
        assert_eq!(&[time[5]], out.times(Channel::StimTrigger));
        // StimTriggerOff has positive polarity and sees the rising edge
        assert_eq!(&[time[2]], out.times(Channel::StimTriggerOff));
    }

    #[test]
    fn positive_override_fires_on_rising_edge() {
        let time = ramp(6);
        let words = [0u16, 0, 1, 1, 1, 0];
        let mut ov = vec![None; POLARITY_SLOTS];
        ov[0] = Some(Polarity::Normal);
        let map = ChannelMap::builder().overrides(&ov).unwrap().build();
        let out = decode(&time, &words, &map).unwrap();
        assert_eq!(&[2], out.samples(Channel::StimTriggerSamples));
        assert_eq!(&[time[2]], out.times(Channel::StimTrigger));
    }

    #[test]
    fn stim_code_at_trigger() {
        let time = ramp(4);
        let words = [1u16, 1, 1280, 1280];
        let out = decode(&time, &words, &ChannelMap::default()).unwrap();
        assert_eq!(&[2], out.samples(Channel::StimTriggerSamples));
        assert_eq!(Some(vec![5]), out.stim_codes);
        assert_eq!(vec![5], stim_codes(&[0u16, 1281], &[1]));
        assert!(stim_codes(&[0u16, 1281], &[]).is_empty());
    }

    #[test]
    fn length_mismatch() {
        let r = decode(&[0.0, 1.0], &[0u16], &ChannelMap::default());
        assert!(matches!(r, Err(StimError::LengthMismatch { times: 2, words: 1 })));
    }

    #[test]
    fn unrelated_bits_are_ignored() {
        let time = ramp(4);
        // Toggle bit 3, which no default channel reads
        let words = [0u16, 8, 0, 8];
        let out = decode(&time, &words, &ChannelMap::default()).unwrap();
        assert!(out.times(Channel::StimulusMonitorVerticalRefresh).is_empty());
        assert!(out.times(Channel::TwoPhotonFrameTrigger).is_empty());
        // Inverted channels see a constant-high signal
        assert!(out.times(Channel::FrameTriggerRaw).is_empty());
    }
}
