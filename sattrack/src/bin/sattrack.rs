use clap::Parser;
use std::{path::PathBuf, rc::Rc, time::Duration};
use tletypes::prelude::*;
use tokio::{sync::watch, task::LocalSet};
use tracing::info;
use url::Url;

use sattrack_lib::{
    built_info,
    config::{Config, Source, SourceLocation},
    scheduler::{RefreshScheduler, SystemClock},
    source::{AnyElementSource, FileElementSource, HttpElementSource},
    system::{Tracker, TrackerState},
    units::Timestamp,
};

#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Tracker configuration toml file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Observer latitude [deg], overrides the config file
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Observer longitude [deg], overrides the config file
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Element file, either a JSON catalog or three-line element text
    #[arg(long = "tle", group = "source")]
    tle_path: Option<PathBuf>,

    /// URL serving a JSON element catalog
    #[arg(long, group = "source")]
    url: Option<Url>,

    /// Retrieve once, publish a single state and exit
    #[arg(long)]
    once: bool,

    /// Print published states as JSON lines instead of a table
    #[arg(long)]
    json: bool,
}

const INTERRUPT_POLL_PERIOD: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let intr = interruptor::Interruptor::new();
    let intr_clone = intr.clone();
    ctrlc::set_handler(move || {
        if intr_clone.is_set() {
            let exit_code = if cfg!(target_family = "unix") {
                // 128 (fatal error signal "n") + 2 (control-c is fatal error signal 2)
                130
            } else {
                // Windows code 3221225786
                // -1073741510 == C000013A
                -1073741510
            };
            std::process::exit(exit_code);
        } else {
            intr_clone.set();
        }
    })?;

    info!(
        version = built_info::PKG_VERSION,
        commit = built_info::GIT_COMMIT_HASH_SHORT.unwrap_or("unknown"),
        built = built_info::BUILT_TIME_UTC,
        "Starting sattrack"
    );

    let config = load_config(&opts)?;
    if let Some(name) = &config.name {
        info!(name = %name, "Loaded configuration");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    LocalSet::new().block_on(&runtime, run(opts, config, intr))
}

/// Config file values with the command line flags applied on top
fn load_config(opts: &Opts) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let (Some(lat), Some(lon)) = (opts.lat, opts.lon) {
        config.observer = Some(ObserverLocation::new(lat, lon));
    }
    if let Some(path) = &opts.tle_path {
        config.source = Some(Source {
            file: Some(path.clone()),
            url: None,
        });
    }
    if let Some(url) = &opts.url {
        config.source = Some(Source {
            file: None,
            url: Some(url.clone()),
        });
    }

    config.validate()?;
    Ok(config)
}

async fn run(
    opts: Opts,
    config: Config,
    intr: interruptor::Interruptor,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = match config.source_location()? {
        SourceLocation::File(path) => {
            info!(path = %path.display(), "Reading element sets from file");
            AnyElementSource::File(FileElementSource::new(path))
        }
        SourceLocation::Url(url) => {
            info!(url = %url, "Retrieving element sets over HTTP");
            AnyElementSource::Http(HttpElementSource::new(url)?)
        }
    };

    let tracker = Rc::new(Tracker::new(config.popular_catalog()));
    if config.observer.is_none() {
        info!("No observer location configured, nothing will be published");
    }

    if opts.once {
        let now = Timestamp::now();
        let count = tracker.refresh(&source, now).await?;
        let snapshot = tracker.store().get();
        info!(
            count,
            dropped = snapshot.dropped(),
            retrieved_at = ?snapshot.retrieved_at(),
            "Element sets retrieved"
        );
        let state = tracker.compute(now, config.observer.as_ref());
        print_state(&state, opts.json)?;
        return Ok(());
    }

    let (_observer_tx, observer_rx) = watch::channel(config.observer);
    let mut states = tracker.subscribe();
    let scheduler = RefreshScheduler::spawn(tracker, source, observer_rx, SystemClock);

    while !intr.is_set() {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                print_state(&state, opts.json)?;
            }
            _ = tokio::time::sleep(INTERRUPT_POLL_PERIOD) => {}
        }
    }

    scheduler.shutdown().await;
    Ok(())
}

fn print_state(state: &TrackerState, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(state)?);
        return Ok(());
    }

    if !state.ready {
        println!("Waiting for element sets and an observer location");
        return Ok(());
    }

    println!(
        "{:<28} {:>6} {:>6} {:>7} {:>7} {:>8} {:>8}  VIS",
        "NAME", "AZ", "EL", "RANGE", "ALT", "LAT", "LON"
    );
    for r in state.reports.iter() {
        println!(
            "{:<28} {:>6} {:>6} {:>7} {:>7} {:>8.2} {:>8.2}  {}{}",
            r.name,
            r.azimuth,
            r.elevation,
            r.range,
            r.altitude,
            r.latitude,
            r.longitude,
            if r.visible { "yes" } else { "no" },
            if r.popular { " *" } else { "" },
        );
    }
    println!();
    Ok(())
}

mod interruptor {
    use std::sync::atomic::{AtomicBool, Ordering::SeqCst};
    use std::sync::Arc;

    #[derive(Clone, Debug)]
    #[repr(transparent)]
    pub struct Interruptor(Arc<AtomicBool>);

    impl Interruptor {
        pub fn new() -> Self {
            Interruptor(Arc::new(AtomicBool::new(false)))
        }

        pub fn set(&self) {
            self.0.store(true, SeqCst);
        }

        pub fn is_set(&self) -> bool {
            self.0.load(SeqCst)
        }
    }

    impl Default for Interruptor {
        fn default() -> Self {
            Self::new()
        }
    }
}
