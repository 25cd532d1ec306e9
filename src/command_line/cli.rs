#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use sat_sudoku::sat::assignment::Environment;
use sat_sudoku::sat::cnf::Formula;
use sat_sudoku::sat::dimacs::{parse_file, parse_str, to_dimacs};
use sat_sudoku::sat::dpll::Dpll;
use sat_sudoku::sat::solver::{SolutionStats, Solver};
use sat_sudoku::sudoku::{Sudoku, parse_sudoku_file};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sat-sudoku",
    version,
    about = "A DPLL SAT solver over immutable CNF, with a Sudoku front end"
)]
pub(crate) struct Cli {
    /// An optional path argument. If provided without a subcommand, it's
    /// treated as the path to a DIMACS .cnf file to solve.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`, `sudoku`, `dir`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula provided as plain text.
    Text {
        /// Literal CNF input as a string (e.g. "1 -2 0\n2 3 0").
        /// Literals are space-separated, and 0 terminates a clause.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a Sudoku puzzle.
    /// The puzzle is converted into a CNF formula, which is then solved.
    Sudoku {
        /// Path to the puzzle file: one row per line, `.` or `0` for blanks.
        #[arg(long)]
        path: PathBuf,

        /// Print the generated DIMACS CNF and save it next to the puzzle.
        #[arg(short, long, default_value_t = false)]
        export_dimacs: bool,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.cnf` and `.sudoku` file below a directory.
    Dir {
        /// Directory to walk.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug output, providing more verbose logging during the solving process.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Enable verification of the found solution. If a solution is found, it's checked against the original CNF.
    #[arg(short, long, default_value_t = true)]
    pub(crate) verify: bool,

    /// Enable printing of performance and problem statistics after solving.
    #[arg(short, long, default_value_t = true)]
    pub(crate) stats: bool,

    /// Enable printing of the satisfying assignment (model) if the formula is satisfiable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,
}

/// Result of a single timed solver run.
pub(crate) struct Outcome {
    pub(crate) model: Option<Environment>,
    pub(crate) elapsed: Duration,
    pub(crate) stats: SolutionStats,
}

/// Parses a DIMACS file and reports the result.
///
/// # Errors
///
/// If the file cannot be read or parsed.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let formula = parse_file(path).map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
    let parse_time = time.elapsed();
    info!("parsed {} in {parse_time:?}", path.display());

    solve_and_report(&formula, common, Some(path), parse_time).map(|_| ())
}

/// Parses DIMACS text given on the command line and reports the result.
///
/// # Errors
///
/// If the text is not valid DIMACS.
pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<(), String> {
    let time = Instant::now();
    let formula = parse_textual_cnf(input)?;
    let parse_time = time.elapsed();

    solve_and_report(&formula, common, None, parse_time).map(|_| ())
}

/// Parses CNF given as text. Literal `\n` sequences are accepted as line
/// breaks so that clauses can be written on one shell line.
///
/// # Errors
///
/// If a token is not an integer.
pub(crate) fn parse_textual_cnf(input: &str) -> Result<Formula, String> {
    parse_str(&input.replace("\\n", "\n")).map_err(|e| e.to_string())
}

/// Solves a directory of CNF and Sudoku files.
/// Iterates over every `.cnf` and `.sudoku` file below `path`, parses each
/// file, solves it, and reports the results.
///
/// # Errors
///
/// If `path` is not a directory, or any matching file cannot be read or
/// parsed.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Provided path is not a directory: {}", path.display()));
    }

    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        match file_path.extension().and_then(|ext| ext.to_str()) {
            Some("sudoku") => solve_sudoku(file_path, false, common)?,
            Some("cnf") => solve_file(file_path, common)?,
            _ => warn!("skipping {}", file_path.display()),
        }
    }

    Ok(())
}

/// Verifies a model against `formula`.
///
/// Prints whether the verification was successful, or "UNSAT" when there is
/// no model.
///
/// # Errors
///
/// If the model does not satisfy the formula.
pub(crate) fn verify_solution(formula: &Formula, model: Option<&Environment>) -> Result<(), String> {
    let Some(env) = model else {
        println!("UNSAT");
        return Ok(());
    };

    let ok = formula.is_satisfied_by(env);
    println!("Verified: {ok:?}");
    if ok {
        Ok(())
    } else {
        Err(String::from("Solution failed verification!"))
    }
}

/// Runs the solver on `formula` and times it.
pub(crate) fn solve(formula: &Formula, label: Option<&Path>, common: &CommonOptions) -> Outcome {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }

    if common.debug {
        println!("Variables: {}", formula.variables().len());
        println!("Clauses: {}", formula.len());
        println!("Literals: {}", formula.num_literals());
    }

    let time = Instant::now();
    let mut solver = Dpll::new(formula.clone());
    let model = solver.solve();
    let elapsed = time.elapsed();

    if common.debug {
        match &model {
            Some(env) => println!("Solution: {env}"),
            None => println!("Solution: None"),
        }
        println!("Time: {elapsed:?}");
    }

    Outcome {
        model,
        elapsed,
        stats: solver.stats(),
    }
}

/// Allocated and resident memory in MiB, or zeros when jemalloc cannot be
/// queried.
pub(crate) fn memory_usage() -> (f64, f64) {
    let read = || -> Result<(usize, usize), tikv_jemalloc_ctl::Error> {
        epoch::advance()?;
        Ok((stats::allocated::read()?, stats::resident::read()?))
    };

    read().map_or((0.0, 0.0), |(allocated, resident)| {
        (
            allocated as f64 / (1024.0 * 1024.0),
            resident as f64 / (1024.0 * 1024.0),
        )
    })
}

/// Solves `formula`, then verifies and reports as requested.
///
/// # Errors
///
/// If verification is enabled and the model is wrong.
pub(crate) fn solve_and_report(
    formula: &Formula,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<Option<Environment>, String> {
    let outcome = solve(formula, label, common);
    let (allocated_mib, resident_mib) = memory_usage();

    if common.verify {
        verify_solution(formula, outcome.model.as_ref())?;
    }

    if common.stats {
        print_stats(
            parse_time,
            formula,
            &outcome,
            allocated_mib,
            resident_mib,
            common.print_solution,
        );
    } else {
        print_verdict(outcome.model.as_ref());
    }

    Ok(outcome.model)
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

fn print_verdict(model: Option<&Environment>) {
    if model.is_some() {
        println!("\nSATISFIABLE");
    } else {
        println!("\nUNSATISFIABLE");
    }
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats(
    parse_time: Duration,
    formula: &Formula,
    outcome: &Outcome,
    allocated: f64,
    resident: f64,
    print_solution: bool,
) {
    let elapsed_secs = outcome.elapsed.as_secs_f64();
    let s = &outcome.stats;

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", formula.variables().len());
    stat_line("Clauses", formula.len());
    stat_line("Literals", formula.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");

    if let Some(env) = &outcome.model {
        if print_solution {
            println!("Solutions: {env}");
        }
    }

    print_verdict(outcome.model.as_ref());
}

/// Writes the DIMACS form of `formula` next to the puzzle at `path`, as
/// `<path>.cnf`.
fn export_dimacs(path: &Path, formula: &Formula) -> Result<(), String> {
    let dimacs = to_dimacs(formula);
    println!("DIMACS:\n{dimacs}");

    let dimacs_path = format!("{}.cnf", path.display());
    std::fs::write(&dimacs_path, dimacs)
        .map_err(|e| format!("Unable to write {dimacs_path}: {e}"))?;
    info!("DIMACS written to {dimacs_path}");
    println!("DIMACS written to: {dimacs_path}");
    Ok(())
}

/// Solve a sudoku file.
///
/// # Errors
///
/// If the file doesn't exist or can't be parsed, the DIMACS export fails, or
/// the model can't be read back into a grid.
pub(crate) fn solve_sudoku(
    path: &Path,
    export: bool,
    common: &CommonOptions,
) -> Result<(), String> {
    if !path.is_file() {
        return Err(format!("Sudoku file does not exist: {}", path.display()));
    }

    let time = Instant::now();
    let sudoku: Sudoku =
        parse_sudoku_file(path).map_err(|e| format!("Error parsing Sudoku file: {e}"))?;
    println!("Parsed Sudoku:\n{sudoku}");

    let encode = Instant::now();
    let formula = sudoku.to_formula();
    info!(
        "encoded {}x{} grid into {} clauses in {:?}",
        sudoku.len(),
        sudoku.len(),
        formula.len(),
        encode.elapsed()
    );

    if export {
        export_dimacs(path, &formula)?;
    }

    let parse_time = time.elapsed();
    match solve_and_report(&formula, common, Some(path), parse_time)? {
        Some(env) => {
            let solution = sudoku.decode(&env).map_err(|e| e.to_string())?;
            println!("Solution:\n{solution}");
        }
        None => println!("No solution found"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_textual_cnf_simple() {
        let formula = parse_textual_cnf("1 -2 0\n3 4 0").unwrap();
        assert_eq!(formula.len(), 2);
        assert_eq!(formula.num_literals(), 4);
    }

    #[test]
    fn test_parse_textual_cnf_with_comments_and_p_line() {
        let formula = parse_textual_cnf("c this is a comment\np cnf 2 2\n1 0\n-2 0").unwrap();
        assert_eq!(formula.len(), 2);
        assert!(formula.iter().all(|clause| clause.is_unit()));
    }

    #[test]
    fn test_parse_textual_cnf_empty_lines() {
        let formula = parse_textual_cnf("1 0\n\n-2 0").unwrap();
        assert_eq!(formula.len(), 2);
    }

    #[test]
    fn test_parse_textual_cnf_empty_input() {
        assert!(parse_textual_cnf("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_textual_cnf_single_clause_no_terminator() {
        let formula = parse_textual_cnf("1 2 3").unwrap();
        assert_eq!(formula.len(), 1);
        assert_eq!(formula.num_literals(), 3);
    }

    #[test]
    fn test_parse_textual_cnf_escaped_newlines() {
        let formula = parse_textual_cnf("1 -2 0\\n2 3 0").unwrap();
        assert_eq!(formula.len(), 2);
    }

    #[test]
    fn test_parse_textual_cnf_multiple_clauses_in_line() {
        let formula = parse_textual_cnf("1 2 0 3 4 0").unwrap();
        assert_eq!(formula.len(), 2);
    }

    #[test]
    fn test_parse_textual_cnf_rejects_garbage() {
        assert!(parse_textual_cnf("1 two 0").is_err());
    }

    #[test]
    fn test_verify_solution() {
        let formula = parse_textual_cnf("1 0\n-2 0").unwrap();
        let model = Dpll::new(formula.clone()).solve();
        assert!(verify_solution(&formula, model.as_ref()).is_ok());
        assert!(verify_solution(&formula, Some(&Environment::new())).is_err());
        assert!(verify_solution(&formula, None).is_ok());
    }
}
