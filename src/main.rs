//! Searches for a Malbolge program that prints a target string.
//!
//! # Usage
//! ```text
//! malbolge [TARGET] [OPTIONS]
//! ```
//!
//! # Arguments
//! - `TARGET`: Text the program must print, matched case-insensitively
//!   (defaults to `Hello World`)
//!
//! # Options
//! - `-w, --beam-width <n>`: Nodes kept per round (defaults to 10000)
//! - `-s, --seed <n>`: Seed for tie-breaking (random if not set)
//! - `-r, --max-rounds <n>`: Give up after this many rounds
//! - `--no-timestamps`: Omit timestamps from log lines
//!
//! On success the program text is printed to stdout.

use malbolge::synthesis::driver::{SearchConfig, Synthesis, synthesize};
use malbolge::utils::log::{self, SHOW_TIMESTAMP};
use malbolge::{error, info};
use std::env;
use std::process;
use std::str::FromStr;
use std::sync::atomic::Ordering;

fn main() {
    log::init();
    let args: Vec<String> = env::args().collect();
    let mut config = SearchConfig::default();
    let mut target: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            k @ ("--beam-width" | "-w") => {
                config.beam_width = parse_value(&args, &mut i, k);
            }
            k @ ("--seed" | "-s") => {
                config.seed = Some(parse_value(&args, &mut i, k));
            }
            k @ ("--max-rounds" | "-r") => {
                config.max_rounds = Some(parse_value(&args, &mut i, k));
            }
            "--no-timestamps" => {
                SHOW_TIMESTAMP.store(false, Ordering::Relaxed);
                i += 1;
            }
            other if other.starts_with('-') || target.is_some() => {
                error!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
            other => {
                target = Some(other.to_string());
                i += 1;
            }
        }
    }

    if let Some(target) = target {
        config.target = target;
    }
    if config.target.is_empty() {
        error!("Target must not be empty");
        process::exit(1);
    }

    let rng = config.rng();
    match synthesize(&config, rng) {
        Ok(Synthesis::Found(solution)) => {
            info!("Final output: {}", String::from_utf8_lossy(&solution.output));
            info!("Final score: {}", solution.score);
            println!("{}", solution.program);
        }
        Ok(Synthesis::Exhausted { .. }) | Ok(Synthesis::Stopped { .. }) => {
            error!("Not found");
            process::exit(1);
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

/// Reads the value following flag `k`, leaving `i` past it.
fn parse_value<T: FromStr>(args: &[String], i: &mut usize, k: &str) -> T {
    *i += 1;
    let Some(raw) = args.get(*i) else {
        error!("{k} requires an argument");
        process::exit(1);
    };
    *i += 1;
    raw.parse::<T>().unwrap_or_else(|_| {
        error!("Invalid value for {k}: '{raw}' is not a valid number");
        process::exit(1);
    })
}

const USAGE: &str = "\
Malbolge program synthesizer

USAGE:
    {program} [TARGET] [OPTIONS]

ARGS:
    [TARGET]    Text the program must print, case-insensitive (defaults to \"Hello World\")

OPTIONS:
    -w, --beam-width <n>    Nodes kept per round (defaults to 10000)
    -s, --seed <n>          Seed for tie-breaking (random if not set)
    -r, --max-rounds <n>    Give up after this many rounds
    --no-timestamps         Omit timestamps from log lines
    -h, --help              Print this help message

ENVIRONMENT:
    MALBOLGE_LOG    Minimum log level: debug, info, warn or error (defaults to info)

EXAMPLES:
    # Search for the default target
    {program}

    # Reproducible search with a narrower beam
    {program} \"hi\" --beam-width 100 --seed 7
";

/// Prints usage information to stderr.
fn print_usage(program: &str) {
    eprintln!("{}", USAGE.replace("{program}", program));
}
