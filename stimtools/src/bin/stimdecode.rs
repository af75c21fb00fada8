use argh::FromArgs;
use anyhow::{bail, Context, Result};
use either::{Left, Right};
use std::fs;
use std::io::{stdin, stdout, BufReader, Write};
use std::path::{Path, PathBuf};

use stimtools::cfg::DecodeRun;
use stimtools::chan::{self, ChannelMap};
use stimtools::{de, decode, interconnect};

const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");

#[derive(Debug, FromArgs, Clone)]
/// Decode a digitized stimulus interconnect channel stored as
/// tab-separated (time, raw word) rows and write stimtimes.txt,
/// stimontimes.txt, verticalblanking.txt, twophotontimes.txt and
/// the decoding-finished marker into the output directory.
pub struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,
    /// directory to write into (current directory by default)
    #[argh(option, short = 'd')]
    pub dir: Option<PathBuf>,
    /// decode run specification (JSON)
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,
    /// comma-separated list of 9 polarity overrides (1, -1, or empty)
    #[argh(option, short = 'p')]
    pub polarity: Option<String>,
    /// remove earlier decoder outputs in the directory first
    #[argh(switch)]
    pub clean: bool,
    /// with no input or when input is '-', read from standard input
    #[argh(positional)]
    pub input: Option<String>,
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

    let run = match &args.config {
        Some(p) => DecodeRun::load(p)?,
        None => DecodeRun::default(),
    };
    let map = match &args.polarity {
        Some(s) => ChannelMap::builder().overrides(&chan::parse_overrides(s)?)?.build(),
        None => run.channel_map()?,
    };
    let dir = match args.dir {
        Some(d) => d,
        None => std::env::current_dir()?,
    };
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let input = match args.input.as_deref() {
        None | Some("-") => Left(()),
        Some(i) => match fs::metadata(i) {
            Ok(m) if m.is_file() => Right(PathBuf::from(i)),
            Ok(_) => bail!("{} is not a file", i),
            Err(e) => bail!(e),
        },
    };

    let (time, words) = match input {
        Left(()) => {
            let stdin = stdin();
            let stdin = stdin.lock();
            let mut rdr = tsv_reader(BufReader::new(stdin));
            de::samples_tsv(&mut rdr, Path::new("<stdin>"))?
        },
        Right(path) => {
            let f = fs::File::open(&path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            let mut rdr = tsv_reader(BufReader::new(f));
            de::samples_tsv(&mut rdr, &path)?
        },
    };

    let events = decode::decode(&time, &words, &map)?;
    interconnect::write_textfiles(&dir, &events, args.clean || run.clean())?;
    Ok(())
}

fn tsv_reader<R: std::io::Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_reader(rdr)
}
