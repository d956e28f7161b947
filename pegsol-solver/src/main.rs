//! English peg solitaire solver.
//!
//! Solves the standard 33-hole board and prints every step of the solution.

use std::io::{self, BufWriter, Write};
use std::process;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use serde::Serialize;

use pegsol_core::{Board, Jump};
use pegsol_solver::render::{render, render_step, RenderOptions};
use pegsol_solver::{Solution, Solver, SolverConfig};

/// Exit code when the board has no solution.
const EXIT_UNSOLVED: i32 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Solve English peg solitaire", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Print the solution as JSON instead of rendered boards
    #[arg(long)]
    json: bool,

    /// Highlight each jump with ANSI colours
    #[arg(long)]
    color: bool,

    /// Only print the outcome and statistics
    #[arg(short, long)]
    quiet: bool,

    /// Seconds between progress log lines
    #[arg(long, default_value_t = 5)]
    log_interval: u64,
}

/// One board of the JSON report.
#[derive(Serialize)]
struct StepReport {
    index: usize,
    jump: Option<Jump>,
    pegs: u32,
    layout: Vec<String>,
}

/// JSON report of a run.
#[derive(Serialize)]
struct Report {
    solved: bool,
    moves: usize,
    expanded: u64,
    generated: u64,
    elapsed_ms: u128,
    steps: Vec<StepReport>,
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .format(|buf, record| {
        writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
    })
    .target(env_logger::Target::Stderr)
    .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_UNSOLVED),
        Err(e) => {
            error!("Fatal error: {e:#}");
            process::exit(1);
        }
    }
}

/// Solve the English board and print the result. Returns whether it was
/// solved.
fn run(args: &Args) -> Result<bool> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let options = RenderOptions { color: args.color };

    let board = Board::english();
    if !args.json && !args.quiet {
        writeln!(out, "{}\n", render(&board, options))?;
        out.flush()?;
    }

    let config = SolverConfig {
        log_interval: Duration::from_secs(args.log_interval),
        ..SolverConfig::default()
    };
    let mut solver = Solver::with_config(config);

    info!("Solving English board ({} pegs)", board.peg_count());
    let start = Instant::now();
    let solution = solver.solve(board);
    info!("Search finished in {:.3}s", start.elapsed().as_secs_f64());

    if args.json {
        let report = build_report(&solver, solution.as_ref());
        serde_json::to_writer_pretty(&mut out, &report).context("writing JSON report")?;
        writeln!(out)?;
        out.flush()?;
        return Ok(solution.is_some());
    }

    match &solution {
        Some(solution) => {
            if !args.quiet {
                for (idx, step) in solution.steps().iter().enumerate() {
                    writeln!(out, "{}\n", render_step(idx + 1, step, options))?;
                }
            }
            writeln!(out, "Solved in {} moves.", solution.len())?;
        }
        None => writeln!(out, "No solution exists from this board.")?,
    }
    writeln!(out)?;
    writeln!(out, "{}", solver.stats)?;
    out.flush()?;

    Ok(solution.is_some())
}

fn build_report(solver: &Solver, solution: Option<&Solution>) -> Report {
    let steps: Vec<StepReport> = solution
        .map(|solution| {
            solution
                .boards()
                .iter()
                .enumerate()
                .map(|(index, board)| StepReport {
                    index,
                    jump: board.last_jump(),
                    pegs: board.peg_count(),
                    layout: board.to_string().lines().map(str::to_owned).collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    Report {
        solved: solution.is_some(),
        moves: solution.map_or(0, Solution::len),
        expanded: solver.stats.expanded,
        generated: solver.stats.generated,
        elapsed_ms: solver.stats.elapsed.as_millis(),
        steps,
    }
}
