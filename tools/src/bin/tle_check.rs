use clap::Parser;
use sattrack_lib::{frames, propagator::PreparedElements, store::OrbitalElementSet, units::Timestamp};
use std::fs;
use std::path::PathBuf;
use tleproto::ELEMENT_LINE_LEN;

/// Check which entries of an element catalog propagate
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Instant to propagate to, RFC 3339. Defaults to now.
    #[arg(short = 't', long)]
    at: Option<Timestamp>,

    /// Only print entries that fail
    #[arg(short = 'f', long)]
    failures_only: bool,

    /// Element file to read, either a JSON catalog or three-line element text
    input: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();
    let t = opts.at.unwrap_or_else(Timestamp::now);

    let content = fs::read_to_string(&opts.input)?;
    let catalog = tleproto::parse_catalog(&content)?;

    let mut failures = 0;
    for (name, entry) in catalog.iter() {
        let Some(lines) = entry.normalize() else {
            failures += 1;
            println!("{name}: no element lines");
            continue;
        };

        if lines.line1.len() != ELEMENT_LINE_LEN || lines.line2.len() != ELEMENT_LINE_LEN {
            failures += 1;
            println!(
                "{name}: element lines are {} and {} characters long, expected {ELEMENT_LINE_LEN}",
                lines.line1.len(),
                lines.line2.len()
            );
            continue;
        }

        let set = OrbitalElementSet::new(name.as_str(), lines);
        match PreparedElements::parse(&set).and_then(|p| Ok((p.epoch(), p.propagate(t)?))) {
            Ok((epoch, state)) => {
                if !opts.failures_only {
                    let age_days = (t - epoch).as_secs() / 86_400.0;
                    println!(
                        "{name}: ok, {} (elements {age_days:.1} days old)",
                        frames::to_geodetic(&state, t)
                    );
                }
            }
            Err(e) => {
                failures += 1;
                println!("{name}: {e}");
            }
        }
    }

    println!(
        "{} of {} entries propagate at {t}",
        catalog.len() - failures,
        catalog.len()
    );

    Ok(())
}
