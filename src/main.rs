//! # sat-sudoku
//!
//! `sat-sudoku` is a command-line SAT solver built on a DPLL search over
//! immutable CNF formulas. It solves problems in DIMACS CNF format, CNF given
//! as plain text, and Sudoku puzzles by encoding them to CNF.
//!
//! ## Features
//!
//! -   **Input Formats**:
//!     -   DIMACS CNF files (`.cnf`)
//!     -   Plain text CNF
//!     -   Sudoku puzzle files (`.sudoku`) of side 4, 9, 16 or 25
//! -   **Verification**: Every model is checked against the formula.
//! -   **Statistics**: Parse and solve time, decisions, propagations,
//!     conflicts, search depth and memory usage.
//! -   **DIMACS Export**: The CNF generated for a Sudoku can be written out
//!     for use with other solvers.
//! -   **Logging**: `--debug` or `RUST_LOG` enables `env_logger` output.
//!
//! ## Usage
//!
//! ```sh
//! sat-sudoku problem.cnf
//! sat-sudoku file --path problem.cnf --print-solution
//! sat-sudoku text --input "1 -2 0\n2 3 0"
//! sat-sudoku sudoku --path puzzle.sudoku --export-dimacs
//! sat-sudoku dir --path benchmarks/
//! sat-sudoku completions bash > sat-sudoku.bash
//! ```

mod command_line;

use crate::command_line::cli::{
    Cli, Commands, CommonOptions, solve_dir, solve_file, solve_sudoku, solve_text,
};
use clap::{CommandFactory, Parser};
use log::LevelFilter;

/// Global allocator using `tikv-jemallocator` for memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// `--debug` raises the default level; `RUST_LOG` still takes precedence.
fn init_logging(common: &CommonOptions) {
    let default = if common.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .try_init();
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        None => {
            let Some(path) = cli.path else {
                Cli::command().print_help().map_err(|e| e.to_string())?;
                return Ok(());
            };
            init_logging(&cli.common);
            solve_file(&path, &cli.common)
        }
        Some(Commands::File { path, common }) => {
            init_logging(&common);
            solve_file(&path, &common)
        }
        Some(Commands::Text { input, common }) => {
            init_logging(&common);
            solve_text(&input, &common)
        }
        Some(Commands::Sudoku {
            path,
            export_dimacs,
            common,
        }) => {
            init_logging(&common);
            solve_sudoku(&path, export_dimacs, &common)
        }
        Some(Commands::Dir { path, common }) => {
            init_logging(&common);
            solve_dir(&path, &common)
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
