//! `stimrepair DIR`
//!
//! Rebuild `DIR/stimtimes.txt` against the stimulus display order and write
//! the result to `DIR/stimtimes_repaired.txt`. The recorded file is left as is.

use argh::FromArgs;
use anyhow::{bail, Result};
use std::io::{stdout, Write};
use std::path::PathBuf;

use stimtools::cfg::DecodeRun;
use stimtools::order::DisplayOrderFile;
use stimtools::repair;

const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");

#[derive(Debug, FromArgs, Clone)]
/// Repair stimtimes.txt when more than 255 stimuli overflowed the
/// 8-bit stimulus code.
pub struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,
    /// decode run specification (JSON) holding repair settings
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,
    /// recorded file to repair, relative to the directory
    #[argh(option, short = 's')]
    pub stimtimes: Option<String>,
    /// display order file (whitespace-separated stimulus ids)
    #[argh(option, short = 'o')]
    pub order: Option<PathBuf>,
    /// number of frames in a proper stimulus
    #[argh(option, short = 'g')]
    pub goodframes: Option<usize>,
    /// drop the extra entry recorded after each stimulus id >= 255
    #[argh(switch)]
    pub skip_after_overflow: bool,
    /// recording directory
    #[argh(positional)]
    pub dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args: CliArgs = argh::from_env();
    if args.version {
        let stdout = stdout();
        let mut stdout = stdout.lock();
        writeln!(
            stdout,
            concat!(
                env!("CARGO_BIN_NAME"),
                " ",
                "{}",
            ),
            GIT_VERSION,
        )?;
        return Ok(())
    }

    tracing_subscriber::fmt::init();

    let dir = match args.dir {
        Some(d) => d,
        None => bail!("no recording directory given"),
    };
    let run = match &args.config {
        Some(p) => DecodeRun::load(p)?,
        None => DecodeRun::default(),
    };

    let mut opts = run.repair_options();
    if let Some(g) = args.goodframes {
        opts.goodframes = g;
    }
    if args.skip_after_overflow {
        opts.skip_line_after_overflow = true;
    }
    let stimtimes = args.stimtimes.unwrap_or_else(|| run.stimtimes_file());
    let order = match args.order {
        Some(p) => DisplayOrderFile::new(p),
        None => DisplayOrderFile::new(run.display_order_file(&dir)),
    };

    let out = repair::repair_dir(&dir, &order, &stimtimes, opts)?;
    println!("{}", out.display());
    Ok(())
}
