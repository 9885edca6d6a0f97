use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::fmt::Formatter;
use log::{info, Level, Record};

use satcore::config::{SolverConfig, SolverConfigUpdate, Strategy};
use satcore::dimacs::DimacsParser;
use satcore::solver::Solver;
use satcore::sudoku::{self, Grid};

#[derive(Parser)]
#[command(name = "satcore", version, about = "A CDCL SAT solver with DPLL/DP/resolution strategies")]
struct Cli {
    /// The DIMACS CNF input file to read (stdin if omitted).
    input: Option<PathBuf>,

    /// Read a full config from a TOML file.
    #[arg(long = "config", value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Set a single config option as `key=value`, e.g. `-C strategy=dpll`. May be repeated.
    #[arg(short = 'C', value_name = "KEY=VALUE")]
    config_option: Vec<String>,

    /// Which search strategy to use.
    #[arg(long)]
    strategy: Option<CliStrategy>,

    /// Stop and report UNKNOWN after this many conflicts.
    #[arg(long)]
    conflict_budget: Option<u64>,

    /// Stop and report UNKNOWN after this many seconds.
    #[arg(long)]
    time_budget: Option<f64>,

    /// Treat the input as an n*n Sudoku puzzle (one digit per line, `.` or `0` for blanks)
    /// instead of DIMACS CNF.
    #[arg(long)]
    sudoku: bool,

    /// Increase verbosity (can be repeated).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all but the result line.
    #[arg(short = 'q')]
    quiet: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum CliStrategy {
    Cdcl,
    Dpll,
    Dp,
    Resolution,
}

impl From<CliStrategy> for Strategy {
    fn from(value: CliStrategy) -> Strategy {
        match value {
            CliStrategy::Cdcl => Strategy::Cdcl,
            CliStrategy::Dpll => Strategy::Dpll,
            CliStrategy::Dp => Strategy::Dp,
            CliStrategy::Resolution => Strategy::Resolution,
        }
    }
}

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            log::error!("{:#}", err);
            1
        }
        Ok(exit_code) => exit_code,
    };
    std::process::exit(exit_code);
}

/// Prefixes every log line with `c ` so solver logs remain valid DIMACS CNF
/// comments when interleaved with the result on stdout.
fn init_logging(verbose: u8, quiet: bool) {
    let format = |buf: &mut Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::new()
        .format(format)
        .parse_filters(level)
        .init();
}

fn main_with_err() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut config_update = SolverConfigUpdate::default();

    if let Some(path) = &cli.config_file {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file '{}'", path.display()))?;
        config_update.merge(toml::from_str(&contents).context("parsing config file")?);
    }

    for option in &cli.config_option {
        config_update.merge(toml::from_str(option).with_context(|| format!("parsing -C '{}'", option))?);
    }

    if let Some(strategy) = cli.strategy {
        config_update.strategy = Some(strategy.into());
    }
    if cli.conflict_budget.is_some() {
        config_update.conflict_budget = cli.conflict_budget;
    }
    if cli.time_budget.is_some() {
        config_update.time_budget_seconds = cli.time_budget;
    }

    let base = SolverConfig::for_strategy(config_update.strategy.unwrap_or_default());
    let config = config_update.apply(base);

    let mut input = read_input(cli.input.as_deref())?;

    if cli.sudoku {
        return run_sudoku(&input, config);
    }

    let formula = DimacsParser::parse(input.as_bytes()).context("parsing DIMACS input")?;
    input.clear();

    let solver = Solver::new(config);
    let (result, stats) = solver.solve(&formula);

    info!(
        "decisions: {} conflicts: {} restarts: {} learned: {} elapsed: {:.3}s",
        stats.decisions, stats.conflicts, stats.restarts, stats.learned_clauses, stats.elapsed_seconds
    );

    print_result(&result, |model| {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        model.write_dimacs(&mut handle)
    })
}

fn run_sudoku(input: &str, config: SolverConfig) -> Result<i32> {
    let grid = parse_sudoku(input)?;
    let formula = sudoku::encode(&grid);
    let solver = Solver::new(config);
    let (result, _stats) = solver.solve(&formula);

    print_result(&result, |model| {
        let solved = sudoku::decode(model, grid.size());
        print!("{}", solved);
        Ok(())
    })
}

fn print_result(
    result: &satcore::SolveResult,
    mut print_model: impl FnMut(&satcore::Model) -> io::Result<()>,
) -> Result<i32> {
    match result {
        satcore::SolveResult::Sat(model) => {
            println!("s SATISFIABLE");
            print_model(model)?;
            Ok(10)
        }
        satcore::SolveResult::Unsat => {
            println!("s UNSATISFIABLE");
            Ok(20)
        }
        satcore::SolveResult::Unknown(reason) => {
            println!("s UNKNOWN");
            log::warn!("search stopped early: {:?}", reason);
            Ok(0)
        }
    }
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    let mut contents = String::new();
    match path {
        Some(path) => {
            info!("reading file '{}'", path.display());
            fs::File::open(path)
                .with_context(|| format!("opening '{}'", path.display()))?
                .read_to_string(&mut contents)?;
        }
        None => {
            info!("reading from stdin");
            io::stdin().lock().read_to_string(&mut contents)?;
        }
    }
    Ok(contents)
}

/// One row per line, digits (or `.`/`0` for blank) separated by optional whitespace.
fn parse_sudoku(input: &str) -> Result<Grid> {
    let mut rows: Vec<Vec<u8>> = Vec::new();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        let row: Result<Vec<u8>> = line
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' | '0' => Ok(0u8),
                '1'..='9' => Ok(c.to_digit(10).unwrap() as u8),
                other => anyhow::bail!("unexpected Sudoku character '{}'", other),
            })
            .collect();
        rows.push(row?);
    }

    let n = rows.len();
    anyhow::ensure!(n > 0, "Sudoku input was empty");
    anyhow::ensure!(rows.iter().all(|r| r.len() == n), "Sudoku grid must be square");

    let cells = rows.into_iter().flatten().collect();
    Ok(Grid::new(n, cells))
}
