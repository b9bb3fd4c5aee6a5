//! rsat decides satisfiability of CNF formulas in DIMACS format, using DPLL
//! search with two-watched-literal unit propagation, pure-literal
//! elimination, and subsumption pre-processing.

#[macro_use]
mod macros;
mod assignment;
mod config;
mod deadline;
mod formula;
mod literal;
mod memory;
mod order;
mod output;
mod parser;
mod simplify;
mod solver;
mod trail;
mod watchlist;

use clap::Arg;
use std::process;

use crate::{
    assignment::format_clause_under_assignment,
    config::Config,
    deadline::Deadline,
    parser::parse_formula_file,
    solver::{Solver, Verdict},
};

fn main() {
    process::exit(run_frontend());
}

/// Run the solver, returning the process exit code.
///
/// This is a separate function because `std::process::exit` does not
/// call destructors.
fn run_frontend() -> i32 {
    output::install_signal_handler();
    let mut app = clap::App::new("rsat")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("INPUT")
                .required(true)
                .help("input file in DIMACS CNF format"),
        )
        .arg(
            Arg::with_name("TIMEOUT")
                .takes_value(true)
                .value_name("SECONDS")
                .short("t")
                .long("timeout")
                .help("Give up after this many seconds (default 3600)."),
        );
    if config::ENABLE_LOGGING {
        app = app.arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Increase the diagnostic output"),
        );
    }
    let config = Config::new(app.get_matches());
    let deadline = Deadline::start(config.timeout);
    puts!("Filename provided: {}\n", config.formula_filename);
    let mut formula = parse_formula_file(&config.formula_filename);
    puts!(
        "| Vars: {} | Clauses: {} |\n",
        formula.maxvar,
        formula.num_clauses()
    );
    let subsumed = simplify::remove_subsumed(&mut formula);
    if config.verbosity > 0 {
        comment!("subsumed clauses removed: {}", subsumed);
        comment!("clauses after preprocessing: {}", formula.num_clauses());
    }
    let mut solver = Solver::new(formula, deadline);
    let verdict = solver.solve();
    if config.verbosity > 0 {
        let stats = solver.stats();
        comment!("decisions: {}", stats.decisions);
        comment!("propagated literals: {}", stats.propagated);
        comment!("pure literals: {}", stats.pure_literals);
        comment!("conflicts: {}", stats.conflicts);
    }
    if config.verbosity > 1 && verdict == Verdict::Sat {
        for clause in solver.formula().clauses.iter() {
            puts!(
                "c {}",
                format_clause_under_assignment(&clause.literals, solver.assignment())
            );
        }
    }
    puts!("Result: {}\n", verdict);
    puts!("CPU time used: {:.5} seconds\n", deadline.elapsed_seconds());
    0
}
