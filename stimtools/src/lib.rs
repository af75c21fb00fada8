pub mod bit;
pub mod cfg;
pub mod chan;
pub mod de;
pub mod decode;
pub mod error;
pub mod interconnect;
pub mod order;
pub mod plexon;
pub mod repair;
pub mod segment;
pub mod ser;

pub use error::StimError;

/// One stimulus presentation as persisted in `stimtimes.txt`
#[derive(Clone, PartialEq, Debug)]
pub struct StimRecord {
    /// Stimulus identity (the decoded code, or the display order entry after repair)
    pub stim_id: i64,
    /// Onset time in seconds
    pub onset: f64,
    /// Display frame refresh times during this presentation. `None` means the
    /// record carries no frame field at all (as in `stimontimes.txt`), which is
    /// distinct from a presentation that had zero frames.
    pub frames: Option<Vec<f64>>,
}

impl StimRecord {
    pub fn new(stim_id: i64, onset: f64, frames: Vec<f64>) -> Self {
        StimRecord { stim_id, onset, frames: Some(frames) }
    }

    pub fn onset_only(stim_id: i64, onset: f64) -> Self {
        StimRecord { stim_id, onset, frames: None }
    }

    /// Number of frame times, counting an absent frame field as zero
    pub fn frame_count(&self) -> usize {
        self.frames.as_ref().map_or(0, Vec::len)
    }
}

/// Stimulus records with frame times
pub const STIMTIMES: &str = "stimtimes.txt";
/// Stimulus records without frame times
pub const STIMONTIMES: &str = "stimontimes.txt";
/// Output of the overflow repair
pub const STIMTIMES_REPAIRED: &str = "stimtimes_repaired.txt";
/// Stimulus monitor vertical refresh times, one per line
pub const VERTICAL_BLANKING: &str = "verticalblanking.txt";
/// Two-photon frame trigger times, one per line
pub const TWOPHOTON_TIMES: &str = "twophotontimes.txt";
/// Zero-byte marker written once decoding of a directory has completed
pub const DECODING_FINISHED: &str = "Intan_decoding_finished.txt";
