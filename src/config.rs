//! Compile-time and runtime configuration

use clap::ArgMatches;

/// Add command line flag `-v`.
pub const ENABLE_LOGGING: bool = true;
/// Whether to do bounds checking when accessing array elements.
pub const ENABLE_BOUNDS_CHECKING: bool = cfg!(debug_assertions);
/// Check the `requires!()` assertions at runtime (cheap).
pub const CHECK_PRECONDITIONS: bool = true;
/// Check the `invariant!()` assertions at runtime (cheap).
pub const CHECK_INVARIANTS: bool = true;
/// Check correctness of the watcher lists after propagation (very expensive).
pub const CHECK_WATCH_INVARIANTS: bool = cfg!(debug_assertions);

/// The time budget used when `--timeout` is not given.
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 3600.0;

/// Runtime options from the command line.
#[derive(Debug, PartialEq)]
pub struct Config {
    /// The input file in DIMACS CNF format.
    pub formula_filename: String,
    /// The time budget in seconds.
    pub timeout: f64,
    /// How much diagnostic output to print.
    pub verbosity: u64,
}

impl Config {
    pub fn new(matches: ArgMatches) -> Config {
        let timeout = match matches.value_of("TIMEOUT") {
            None => DEFAULT_TIMEOUT_SECONDS,
            Some(value) => match value.parse::<f64>() {
                Ok(seconds) if seconds >= 0.0 && seconds.is_finite() => seconds,
                _ => die!("invalid value for --timeout: {}", value),
            },
        };
        Config {
            formula_filename: matches
                .value_of("INPUT")
                .expect("clap ensures INPUT is present")
                .to_string(),
            timeout,
            verbosity: matches.occurrences_of("v"),
        }
    }
}
