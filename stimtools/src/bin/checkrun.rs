//! `checkrun myrun.json`
//!
//! Parse and validate `myrun.json`. No output and an exit code of 0 indicates success.

use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;
use stimtools::cfg::DecodeRun;

fn main() -> Result<()> {
    let args = env::args().collect::<Vec<_>>();
    let path = match args.get(1) {
        Some(p) => PathBuf::from(p),
        None => bail!("usage: checkrun RUN.json"),
    };
    let _run = DecodeRun::load(&path)?;

    Ok(())
}
