use clap::Parser;
use sattrack_lib::{
    frames,
    propagator::PreparedElements,
    store::OrbitalElementSet,
    units::{Time, Timestamp},
};
use std::fs::{self, File};
use std::io::{self, prelude::*};
use std::path::PathBuf;
use tletypes::prelude::*;

/// Print look angles to one satellite over time
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Observer latitude [deg]
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Observer longitude [deg]
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Satellite name, as it appears in the catalog
    #[arg(short = 's', long)]
    satellite: String,

    /// First instant, RFC 3339. Defaults to now.
    #[arg(short = 't', long)]
    start: Option<Timestamp>,

    /// Seconds between samples
    #[arg(long, default_value_t = 60.0)]
    step: f64,

    /// Number of samples
    #[arg(short = 'n', long, default_value_t = 90)]
    count: usize,

    /// Use absolute UTC timestamps instead of seconds since the first sample
    #[arg(short = 'a', long)]
    abs_time: bool,

    /// Output file path to write, stdout when omitted
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Element file to read, either a JSON catalog or three-line element text
    input: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();

    let observer = ObserverLocation::new(opts.lat, opts.lon);
    if !observer.is_valid() {
        return Err(format!("Observer location {observer} is out of range").into());
    }

    let content = fs::read_to_string(&opts.input)?;
    let catalog = tleproto::parse_catalog(&content)?;
    let lines = catalog
        .get(&opts.satellite)
        .and_then(|entry| entry.normalize())
        .ok_or_else(|| format!("No element lines for '{}'", opts.satellite))?;
    let prepared = PreparedElements::parse(&OrbitalElementSet::new(opts.satellite.as_str(), lines))?;

    let mut output: Box<dyn Write> = match &opts.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    let t0 = opts.start.unwrap_or_else(Timestamp::now);
    let step = Time::from_secs(opts.step);
    let mut t = t0;
    for _ in 0..opts.count {
        let state = prepared.propagate(t)?;
        let look = frames::to_look_angles(&observer, &state, t);
        if opts.abs_time {
            write!(&mut output, "{t}")?;
        } else {
            write!(&mut output, "{}", (t - t0).as_secs())?;
        }
        writeln!(
            &mut output,
            " {:.3} {:.3} {:.3}",
            look.azimuth, look.elevation, look.range
        )?;
        t += step;
    }

    Ok(())
}
