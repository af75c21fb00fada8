//! Sources of the intended stimulus display order

use crate::de;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Default name of a display order file inside a recording directory
pub const DISPLAY_ORDER: &str = "displayorder.txt";

/// Provides the stimulus ids in the order the presentation script showed them
pub trait DisplayOrderSource {
    fn display_order(&self) -> Result<Vec<i64>>;
}

impl DisplayOrderSource for Vec<i64> {
    fn display_order(&self) -> Result<Vec<i64>> {
        Ok(self.clone())
    }
}

impl DisplayOrderSource for [i64] {
    fn display_order(&self) -> Result<Vec<i64>> {
        Ok(self.to_vec())
    }
}

/// Display order stored as whitespace-separated integers in a text file
#[derive(Clone, Debug)]
pub struct DisplayOrderFile {
    pub path: PathBuf,
}

impl DisplayOrderFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DisplayOrderFile { path: path.into() }
    }

    /// `displayorder.txt` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        DisplayOrderFile::new(dir.join(DISPLAY_ORDER))
    }
}

impl DisplayOrderSource for DisplayOrderFile {
    fn display_order(&self) -> Result<Vec<i64>> {
        de::integers(de::open(&self.path)?, &self.path)
    }
}
