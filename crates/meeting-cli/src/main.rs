//! `meetings` CLI — expand recurring meetings, check conflicts and render
//! geo/time labels from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Expand a seed meeting using its own frequency and end date
//! meetings expand -i seed.json
//!
//! # Override the rule and link instances to the stored seed
//! meetings expand -i seed.json --frequency weekly --until 2026-06-30T00:00:00Z --parent-id 8d1c
//!
//! # Check a candidate slot against booked meetings (stdin)
//! cat booked.json | meetings conflict --start 2026-03-02T10:30:00Z --end 2026-03-02T11:00:00Z
//!
//! # Distance and travel labels
//! meetings distance --from 50.4501,30.5234 --to 49.8397,24.0297
//! meetings travel --km 60
//!
//! # Map viewport for a list of points
//! meetings bounds -i points.json
//!
//! # Localized time label
//! meetings format-time --at 2026-10-17T11:30:00Z --timezone Europe/Kyiv
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use meeting_engine::conflict::check_instances;
use meeting_engine::expander::{expand_seed, generate_instances_with, link_to_parent};
use meeting_engine::model::{meeting_from_json, meetings_from_json};
use meeting_engine::timezone::{
    format_date_in_timezone, format_time_in_timezone, parse_timestamp, utc_offset_label,
};
use meeting_engine::{
    calculate_distance, check_conflict, estimate_travel_time, format_distance,
    format_in_timezone, get_bounds_for_coordinates, Coordinates, Locale, RecurrenceFrequency,
    ScheduleConfig,
};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "meetings",
    version,
    about = "Meeting scheduling helpers: recurrence, conflicts, geo/time labels"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with scheduling settings
    #[arg(long, global = true)]
    config: Option<String>,

    /// Label language (overrides the config file)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a seed meeting into its later occurrences
    Expand {
        /// Seed meeting JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// none, daily, weekly or monthly (defaults to the seed's own)
        #[arg(long)]
        frequency: Option<String>,
        /// Last allowed start, ISO 8601 (defaults to the seed's recurrence_end_date)
        #[arg(long)]
        until: Option<String>,
        /// Set parent_meeting_id on every instance (defaults to the seed's id)
        #[arg(long)]
        parent_id: Option<String>,
        /// JSON array of booked meetings; report which instances collide
        #[arg(long)]
        check_against: Option<String>,
    },
    /// Check a candidate slot against booked meetings
    Conflict {
        /// JSON array of booked meetings (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Ignore the meeting with this id (re-validating an edit)
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Great-circle distance between two points
    Distance {
        /// LAT,LON
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Coordinates,
        /// LAT,LON
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Coordinates,
        /// Print the raw kilometers instead of a label
        #[arg(long)]
        raw: bool,
    },
    /// Estimated travel time for a distance
    Travel {
        #[arg(long)]
        km: f64,
        /// Average speed (defaults to the configured speed)
        #[arg(long)]
        speed: Option<f64>,
    },
    /// Map viewport enclosing a JSON array of {latitude, longitude}
    Bounds {
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Render a timestamp in a timezone
    FormatTime {
        /// ISO 8601 timestamp
        #[arg(long)]
        at: String,
        /// IANA zone; unknown or missing zones render in local time
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long, value_enum, default_value_t = Style::DateTime)]
        style: Style,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Style {
    DateTime,
    Date,
    Time,
    Offset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let locale = cli.locale.unwrap_or(config.locale);

    match cli.command {
        Commands::Expand {
            input,
            output,
            frequency,
            until,
            parent_id,
            check_against,
        } => {
            let json = read_input(input.as_deref())?;
            let seed = meeting_from_json(&json).context("Failed to parse seed meeting")?;
            seed.validate().context("Seed meeting is not a valid interval")?;
            let options = config.expansion_options();

            let frequency = frequency
                .map(|f| f.parse::<RecurrenceFrequency>())
                .transpose()
                .context("Unsupported --frequency")?;
            let until = until
                .map(|u| parse_timestamp(&u))
                .transpose()
                .context("Invalid --until timestamp")?;

            let mut instances = if frequency.is_none() && until.is_none() {
                expand_seed(&seed, &options)
            } else {
                let frequency = frequency.unwrap_or_else(|| seed.recurrence_frequency.clone());
                let Some(end) = until.or(seed.recurrence_end_date) else {
                    anyhow::bail!("--frequency needs --until or a seed recurrence_end_date");
                };
                generate_instances_with(&seed, &frequency, end, &options)
            };
            log::info!("generated {} instances", instances.len());

            if let Some(parent_id) = parent_id.as_deref().or(seed.id.as_deref()) {
                link_to_parent(&mut instances, parent_id);
            }

            let rendered = match check_against {
                Some(path) => {
                    let booked = meetings_from_json(&read_input(Some(&path))?)
                        .with_context(|| format!("Failed to parse booked meetings in {}", path))?;
                    let conflicts = check_instances(&instances, &booked);
                    serde_json::to_string_pretty(&serde_json::json!({
                        "instances": instances,
                        "conflicts": conflicts,
                    }))?
                }
                None => serde_json::to_string_pretty(&instances)?,
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Conflict {
            input,
            start,
            end,
            exclude,
        } => {
            let start = parse_timestamp(&start).context("Invalid --start timestamp")?;
            let end = parse_timestamp(&end).context("Invalid --end timestamp")?;
            if end <= start {
                anyhow::bail!("--end must be after --start");
            }
            let json = read_input(input.as_deref())?;
            let booked = meetings_from_json(&json).context("Failed to parse booked meetings")?;

            let verdict = check_conflict(start, end, &booked, exclude.as_deref());
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Commands::Distance { from, to, raw } => {
            let km = calculate_distance(from.latitude, from.longitude, to.latitude, to.longitude);
            if raw {
                println!("{}", km);
            } else {
                println!("{}", format_distance(km, locale));
            }
        }
        Commands::Travel { km, speed } => {
            let speed = speed.unwrap_or(config.travel_speed_kmh);
            println!("{}", estimate_travel_time(km, speed, locale));
        }
        Commands::Bounds { input } => {
            let json = read_input(input.as_deref())?;
            let points: Vec<Coordinates> =
                serde_json::from_str(&json).context("Failed to parse coordinates")?;
            let bounds = get_bounds_for_coordinates(&points);
            println!("{}", serde_json::to_string_pretty(&bounds)?);
        }
        Commands::FormatTime {
            at,
            timezone,
            style,
        } => {
            let ts = parse_timestamp(&at).context("Invalid --at timestamp")?;
            let timezone = timezone.or_else(|| config.default_timezone.clone());
            let tz = timezone.as_deref();
            let label = match style {
                Style::DateTime => format_in_timezone(ts, tz, locale),
                Style::Date => format_date_in_timezone(ts, tz, locale),
                Style::Time => format_time_in_timezone(ts, tz, locale),
                Style::Offset => utc_offset_label(ts, tz),
            };
            println!("{}", label);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn load_config(path: Option<&str>) -> Result<ScheduleConfig> {
    let Some(path) = path else {
        return Ok(ScheduleConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    let config = ScheduleConfig::from_toml_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path))?;
    log::debug!("loaded config from {}: {:?}", path, config);
    Ok(config)
}

/// Parse `LAT,LON` into coordinates.
fn parse_point(s: &str) -> Result<Coordinates, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{}'", s))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("coordinates out of range: {}", s));
    }
    Ok(Coordinates::new(latitude, longitude))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
