//! Malbolge interpreter CLI.
//!
//! Loads a program file and runs it against stdin and stdout.
//!
//! # Usage
//! ```text
//! interpreter <program> [OPTIONS]
//! ```
//!
//! # Arguments
//! - `program`: Malbolge source file
//!
//! # Options
//! - `--strict`: Fail on printable cells that name no instruction instead of
//!   executing them as no-ops
//! - `--no-timestamps`: Omit timestamps from log lines

use malbolge::utils::log::{self, SHOW_TIMESTAMP};
use malbolge::virtual_machine::interpreter::{Interpreter, StreamPort};
use malbolge::virtual_machine::program::Program;
use malbolge::{debug, error};
use std::env;
use std::io;
use std::path::Path;
use std::process;
use std::sync::atomic::Ordering;

fn main() {
    log::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let input_path = &args[1];
    let mut strict = false;

    for arg in &args[2..] {
        match arg.as_str() {
            "--strict" => strict = true,
            "--no-timestamps" => SHOW_TIMESTAMP.store(false, Ordering::Relaxed),
            other => {
                error!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    if !Path::new(input_path).exists() {
        error!("Input file does not exist: {}", input_path);
        process::exit(1);
    }

    let core = match Program::from_file(input_path).and_then(|program| program.load()) {
        Ok(core) => core,
        Err(e) => {
            error!("Failed to load {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let mut interpreter = Interpreter::new(core);
    if strict {
        interpreter = interpreter.strict();
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut port = StreamPort::new(stdin.lock(), stdout.lock());
    let result = interpreter.run(&mut port);
    let flushed = port.finish();

    if let Err(e) = result {
        error!("Runtime error after {} steps: {}", interpreter.steps(), e);
        process::exit(1);
    }
    if let Err(e) = flushed {
        error!("Failed to write output: {}", e);
        process::exit(1);
    }
    debug!("Exited after {} steps", interpreter.steps());
}

const USAGE: &str = "\
Malbolge interpreter

USAGE:
    {program} <program> [OPTIONS]

ARGS:
    <program>    Malbolge source file

OPTIONS:
    --strict           Fail on printable cells that name no instruction
    --no-timestamps    Omit timestamps from log lines
    -h, --help         Print this help message

ENVIRONMENT:
    MALBOLGE_LOG    Minimum log level: debug, info, warn or error (defaults to info)
";

fn print_usage(program: &str) {
    eprintln!("{}", USAGE.replace("{program}", program));
}
