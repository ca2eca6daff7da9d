use std::fs::File;
use std::io::{stdout, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use diameter::network::Timestamp;
use diameter::{Error, RouteConfig, ScheduleIngester, TimetableValidator, TsvSink};

#[derive(Parser, Debug)]
#[command(
    name = "diameter",
    version,
    about = "Find the farthest destination from every location in a carrier schedule",
    long_about = "Validates a carrier schedule against a table of baseline travel times, then runs an \
                  earliest-arrival search from every location. Prints the itinerary to each \
                  location's farthest destination and keeps the longest of them (the network \
                  diameter) in a separate file."
)]
struct Args {
    /// Baseline travel times: <origin> TAB <destination> TAB <duration>
    timetable: PathBuf,

    /// Carrier schedule: <carrier> TAB <origin> TAB <departure> TAB <destination> TAB <arrival>
    schedule: PathBuf,

    /// File rewritten with the longest itinerary found so far
    #[arg(long, default_value = "diameter.txt")]
    diameter_out: PathBuf,

    /// Also write the itinerary between every pair of locations to this file
    #[arg(long)]
    all_routes: Option<PathBuf>,

    /// Minimum time between consecutive legs of the same carrier
    #[arg(long, default_value_t = RouteConfig::default().min_layover)]
    min_layover: Timestamp,

    /// Time needed after arriving somewhere before an onward leg can be taken
    #[arg(long, default_value_t = RouteConfig::default().transfer_time)]
    transfer_time: Timestamp,

    /// Log the full route graph before searching
    #[arg(long)]
    dump: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn open(path: &Path) -> Result<BufReader<File>, Error> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| Error::Open { path: path.to_owned(), source })
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let config = RouteConfig::new(args.min_layover, args.transfer_time);
    log::info!("Timetable: {}", args.timetable.display());
    log::info!("Schedule: {}", args.schedule.display());

    // Open both inputs up front so a bad path is reported before any work is done.
    let timetable_file = open(&args.timetable)?;
    let schedule_file = open(&args.schedule)?;

    let timetable = TimetableValidator::from_reader(timetable_file).context("Failed to read timetable")?;
    let mut network = ScheduleIngester::new(&timetable, config)
        .ingest(schedule_file)
        .context("Failed to load schedule")?;
    if args.dump {
        log::info!("Route graph:\n{network}");
    }

    let mut sink = TsvSink::new(BufWriter::new(stdout().lock()), &args.diameter_out)?;
    if let Some(path) = &args.all_routes {
        sink = sink.with_all_routes(path)?;
    }

    if let Err(err) = network.search_all(&config, &mut sink) {
        if let Error::Reachability(unreachable) = &err {
            for name in &unreachable.unreachable {
                log::error!("Location {name} is unreachable from {}!", unreachable.source_name);
            }
        }
        sink.flush()?;
        return Err(err).context("Search failed");
    }
    sink.flush()?;

    match network.diameter() {
        Some(_) => log::info!("Diameter written to {}", args.diameter_out.display()),
        None => log::warn!("No itinerary left its origin, {} is empty.", args.diameter_out.display()),
    }
    Ok(())
}
