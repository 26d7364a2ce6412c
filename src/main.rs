use clap::{ArgAction, Parser, Subcommand};
use dedupestore::helpers::identity;
use dedupestore::helpers::level_counter::{LevelCounter, LevelCounts};
use dedupestore::helpers::location::{location_validator, validate, ArchiveRequirement, Location};
use dedupestore::helpers::locations_config::LocationsConfig;
use dedupestore::helpers::result_error::error::Error;
use dedupestore::helpers::result_error::result::Result;
use dedupestore::helpers::result_error::WithMsg;
use dedupestore::helpers::size::human_readable_size;
use serde::Serialize;
use std::path::PathBuf;
use std::process::exit;
use tracing::{error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Inspect backup locations and the small helpers around them
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// More log output, repeat for more
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a location and print its parts
    Location {
        #[arg(value_parser = location_validator(ArchiveRequirement::Any))]
        location: Location,
        /// Whether the location must, may or must not name an archive
        #[arg(long, value_enum, default_value_t = ArchiveRequirement::Any)]
        archive: ArchiveRequirement,
        /// Print the parts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print byte counts in human readable form
    Size {
        #[arg(required = true)]
        bytes: Vec<u64>,
    },
    /// Resolve a user name to its uid, or a uid to its name
    User { name_or_id: String },
    /// Resolve a group name to its gid, or a gid to its name
    Group { name_or_id: String },
    /// Check every location listed in a YAML file
    Check {
        /// Location of config file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Serialize)]
struct LocationParts<'a> {
    user: Option<&'a str>,
    host: Option<&'a str>,
    path: &'a str,
    archive: Option<&'a str>,
    location: String,
    canonical: String,
}

impl<'a> From<&'a Location> for LocationParts<'a> {
    fn from(location: &'a Location) -> Self {
        Self {
            user: location.user(),
            host: location.host(),
            path: location.path(),
            archive: location.archive(),
            location: location.to_string(),
            canonical: location.canonical(),
        }
    }
}

fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Logs the warning/error tally at the most severe level seen, so the
/// summary passes the same filter as the records it counts. Returns whether
/// the run should exit non-zero.
fn report_summary(counts: LevelCounts) -> bool {
    if counts.error() > 0 {
        error!("Finished with {counts}");
        true
    } else {
        if counts.warn() > 0 {
            warn!("Finished with {counts}");
        }
        false
    }
}

fn print_location(location: &Location, json: bool) -> Result<()> {
    let parts = LocationParts::from(location);
    if json {
        println!("{}", serde_json::to_string_pretty(&parts)?);
    } else {
        println!("user:    {}", parts.user.unwrap_or("-"));
        println!("host:    {}", parts.host.unwrap_or("-"));
        println!("path:    {}", parts.path);
        println!("archive: {}", parts.archive.unwrap_or("-"));
        println!("display: {}", parts.canonical);
    }
    Ok(())
}

fn resolve<N, I>(kind: &str, name_or_id: &str, by_id: N, by_name: I)
where
    N: Fn(u32) -> Option<String>,
    I: Fn(&str) -> Option<u32>,
{
    match name_or_id.parse::<u32>() {
        Ok(id) => match by_id(id) {
            Some(name) => println!("{id} {name}"),
            None => warn!("No {kind} with id {id}"),
        },
        Err(_) => match by_name(name_or_id) {
            Some(id) => println!("{id} {name_or_id}"),
            None => warn!("No {kind} named {name_or_id:?}"),
        },
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Location {
            location,
            archive,
            json,
        } => {
            let location = validate(location, archive).map_err(Error::from)?;
            print_location(&location, json)
        }
        Command::Size { bytes } => {
            for b in bytes {
                println!("{b}\t{}", human_readable_size(b));
            }
            Ok(())
        }
        Command::User { name_or_id } => {
            resolve(
                "user",
                &name_or_id,
                identity::user_name_for_id,
                identity::id_for_user_name,
            );
            Ok(())
        }
        Command::Group { name_or_id } => {
            resolve(
                "group",
                &name_or_id,
                identity::group_name_for_id,
                identity::id_for_group_name,
            );
            Ok(())
        }
        Command::Check { config } => {
            let locations = LocationsConfig::load(&config)?;
            let accepted = locations
                .check()
                .with_msg(format!("Location check failed: {:?}", &config))?;
            info!("All {} locations in {:?} accepted", accepted.len(), &config);
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();
    let counter = LevelCounter::new();
    tracing_subscriber::registry()
        .with(level_filter(args.verbose, args.quiet))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(counter.clone())
        .init();

    if let Err(e) = run(args.command) {
        error!("{e}");
    }

    if report_summary(counter.counts()) {
        exit(1);
    }
}
