mod config;
mod time;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gochara_core::{Body, MeanElementsOracle};
use gochara_search::{
    AstroEvent, LunarPhaseEvent, Sign, SignPosition, StationaryEvent, VoidPeriod, VoidStatus,
    find_void_periods, search_events, search_full_moons, search_ingresses, search_lunar_phases,
    search_new_moons, search_stationary, sign_position, void_status_at,
};
use serde::Serialize;

use crate::config::FileConfig;
use crate::time::{format_jd, parse_time};

#[derive(Parser)]
#[command(
    name = "gochara",
    version,
    about = "Transit event search: stations, ingresses, lunations, void-of-course Moon"
)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    /// TOML file with detector settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Debug logging to stderr (otherwise RUST_LOG, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Zodiac sign of an ecliptic longitude
    Sign {
        /// Ecliptic longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
    /// Retrograde and direct stations of a planet
    Stations {
        /// Body name (mercury .. pluto)
        #[arg(long)]
        body: String,
        /// Range start: JD, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// Range end: JD, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        end: String,
    },
    /// Sign ingresses of a body
    Ingresses {
        /// Body name (sun, moon, mercury .. pluto, node)
        #[arg(long)]
        body: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// New and full moons with eclipse flags
    Phases {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Which phases to report
        #[arg(long, value_enum, default_value_t = PhaseFilter::All)]
        only: PhaseFilter,
    },
    /// Void-of-course classification at one instant
    VoidStatus {
        /// Query time: JD, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        at: String,
    },
    /// Void-of-course Moon periods in a range
    Void {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// All stations, ingresses and lunations in a range, in time order
    Events {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PhaseFilter {
    All,
    New,
    Full,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn require_time(s: &str) -> f64 {
    parse_time(s).unwrap_or_else(|e| fail(e))
}

fn require_range(start: &str, end: &str) -> (f64, f64) {
    (require_time(start), require_time(end))
}

fn require_body(s: &str) -> Body {
    Body::from_name(s).unwrap_or_else(|| {
        let valid: Vec<&str> = Body::all().iter().map(|b| b.name()).collect();
        fail(format!("Invalid body name: {s}\nValid: {}", valid.join(", ")))
    })
}

fn load_config(path: Option<&PathBuf>) -> FileConfig {
    match path {
        Some(p) => FileConfig::load(p).unwrap_or_else(|e| fail(e)),
        None => FileConfig::default(),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => fail(format!("Error: {e}")),
    }
}

fn sign_name(index: u8) -> &'static str {
    Sign::from_index(index).map_or("?", Sign::name)
}

fn format_position(pos: &SignPosition) -> String {
    let whole = pos.degree_in_sign.floor();
    let minutes = ((pos.degree_in_sign - whole) * 60.0).floor();
    format!("{:02}°{:02}' {}", whole as u32, minutes as u32, sign_name(pos.sign_index))
}

fn format_station(e: &StationaryEvent) -> String {
    let kind = AstroEvent::from(*e).kind();
    format!(
        "{}  {:<18} {:<8} {}",
        format_jd(e.jd),
        kind,
        e.body.name(),
        format_position(&sign_position(e.longitude_deg))
    )
}

fn format_phase(e: &LunarPhaseEvent) -> String {
    let kind = AstroEvent::from(*e).kind();
    let mut line = format!(
        "{}  {:<10} Moon {}",
        format_jd(e.jd),
        kind,
        format_position(&sign_position(e.moon_longitude_deg))
    );
    if let Some(ecl) = e.eclipse {
        let label = match ecl.kind {
            gochara_search::EclipseKind::Solar => "solar",
            gochara_search::EclipseKind::Lunar => "lunar",
        };
        line.push_str(&format!(
            "  [{label} eclipse, {:.1}° from node]",
            ecl.distance_to_node_deg
        ));
    }
    line
}

fn format_event(e: &AstroEvent) -> String {
    match e {
        AstroEvent::StationRetrograde(s) | AstroEvent::StationDirect(s) => format_station(s),
        AstroEvent::Ingress(i) => format!(
            "{}  {:<18} {:<8} {} -> {}{}",
            format_jd(i.jd),
            "ingress",
            i.body.name(),
            sign_name(i.from_sign),
            sign_name(i.to_sign),
            if i.retrograde { " (R)" } else { "" }
        ),
        AstroEvent::NewMoon(p) | AstroEvent::FullMoon(p) => format_phase(p),
    }
}

fn format_void_period(p: &VoidPeriod) -> String {
    let start_mark = if p.start_estimated { "~" } else { "" };
    let end_mark = if p.end_estimated { "~" } else { "" };
    format!(
        "{start_mark}{}  ->  {end_mark}{}  {:>6.2} h  Moon in {}",
        format_jd(p.start_jd),
        format_jd(p.end_jd),
        p.duration_hours(),
        sign_name(p.moon_sign)
    )
}

fn print_void_status(s: &VoidStatus) {
    println!("Time: {}", format_jd(s.jd));
    println!("Moon in {}", sign_name(s.moon_sign));
    match s.days_to_exit {
        Some(d) => println!("Leaves sign in {:.2} h", d * 24.0),
        None => println!("Moon is not moving; sign exit undefined"),
    }
    if s.is_void {
        println!("Void of course");
    } else if let Some(hit) = s.next_aspect {
        println!(
            "Not void: {} {} in {:.2} h",
            hit.aspect.name(),
            hit.body.name(),
            hit.days_until * 24.0
        );
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = load_config(cli.config.as_ref());
    let oracle = MeanElementsOracle::new();

    match cli.command {
        Commands::Sign { lon } => {
            if !lon.is_finite() {
                fail(format!("Invalid longitude: {lon}"));
            }
            let pos = sign_position(lon);
            if cli.json {
                print_json(&serde_json::json!({
                    "sign": pos.sign_index,
                    "name": sign_name(pos.sign_index),
                    "degreeInSign": pos.degree_in_sign,
                }));
            } else {
                println!("{} (sign {})", format_position(&pos), pos.sign_index);
            }
        }

        Commands::Stations { body, start, end } => {
            let body = require_body(&body);
            let (jd_start, jd_end) = require_range(&start, &end);
            let events =
                search_stationary(&oracle, body, jd_start, jd_end, &cfg.stationary_for(body))
                    .unwrap_or_else(|e| fail(format!("Error: {e}")));
            if cli.json {
                let tagged: Vec<AstroEvent> = events.into_iter().map(AstroEvent::from).collect();
                print_json(&tagged);
            } else if events.is_empty() {
                println!("No stations in range");
            } else {
                for e in &events {
                    println!("{}", format_station(e));
                }
            }
        }

        Commands::Ingresses { body, start, end } => {
            let body = require_body(&body);
            let (jd_start, jd_end) = require_range(&start, &end);
            let events = search_ingresses(&oracle, body, jd_start, jd_end, &cfg.ingress_for(body))
                .unwrap_or_else(|e| fail(format!("Error: {e}")));
            let tagged: Vec<AstroEvent> = events.into_iter().map(AstroEvent::from).collect();
            if cli.json {
                print_json(&tagged);
            } else if tagged.is_empty() {
                println!("No ingresses in range");
            } else {
                for e in &tagged {
                    println!("{}", format_event(e));
                }
            }
        }

        Commands::Phases { start, end, only } => {
            let (jd_start, jd_end) = require_range(&start, &end);
            let found = match only {
                PhaseFilter::All => search_lunar_phases(&oracle, jd_start, jd_end, &cfg.lunar_phase),
                PhaseFilter::New => search_new_moons(&oracle, jd_start, jd_end, &cfg.lunar_phase),
                PhaseFilter::Full => search_full_moons(&oracle, jd_start, jd_end, &cfg.lunar_phase),
            };
            let events = found.unwrap_or_else(|e| fail(format!("Error: {e}")));
            if cli.json {
                let tagged: Vec<AstroEvent> = events.into_iter().map(AstroEvent::from).collect();
                print_json(&tagged);
            } else if events.is_empty() {
                println!("No lunar phases in range");
            } else {
                for e in &events {
                    println!("{}", format_phase(e));
                }
            }
        }

        Commands::VoidStatus { at } => {
            let jd = require_time(&at);
            let status = void_status_at(&oracle, jd, &cfg.void_of_course)
                .unwrap_or_else(|e| fail(format!("Error: {e}")));
            if cli.json {
                print_json(&status);
            } else {
                print_void_status(&status);
            }
        }

        Commands::Void { start, end } => {
            let (jd_start, jd_end) = require_range(&start, &end);
            let periods = find_void_periods(&oracle, jd_start, jd_end, &cfg.void_of_course)
                .unwrap_or_else(|e| fail(format!("Error: {e}")));
            if cli.json {
                print_json(&periods);
            } else if periods.is_empty() {
                println!("No void-of-course periods in range");
            } else {
                for p in &periods {
                    println!("{}", format_void_period(p));
                }
            }
        }

        Commands::Events { start, end } => {
            let (jd_start, jd_end) = require_range(&start, &end);
            let events = search_events(&oracle, jd_start, jd_end, &cfg.events())
                .unwrap_or_else(|e| fail(format!("Error: {e}")));
            if cli.json {
                print_json(&events);
            } else if events.is_empty() {
                println!("No events in range");
            } else {
                for e in &events {
                    println!("{}", format_event(e));
                }
            }
        }
    }
}
