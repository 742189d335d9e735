// ─────────────────────────────────────────────────────────────────────
// SCPN PCR — Benchmark Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `pcr` — generate a random tridiagonal system, solve it and report the
//! solve time together with the residual error metrics.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pcr_math::generate::{generate_system, DEFAULT_SEED};
use pcr_math::pcr::{PcrSolver, SolveTiming};
use pcr_math::system::TridiagonalSystem;
use pcr_math::tridiag::solve_sequential;
use pcr_math::validate::ValidationReport;
use pcr_types::config::PcrConfig;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SolverKind {
    /// Parallel Cyclic Reduction
    Pcr,
    /// Sequential Thomas elimination
    Thomas,
}

impl SolverKind {
    fn name(self) -> &'static str {
        match self {
            SolverKind::Pcr => "PCR",
            SolverKind::Thomas => "Thomas",
        }
    }
}

/// Solve a random tridiagonal system and validate the result
#[derive(Parser, Debug)]
#[command(name = "pcr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of equations
    #[arg(value_name = "N")]
    n: usize,

    /// Seed for the random system
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Solver to run
    #[arg(long, value_enum, default_value_t = SolverKind::Pcr)]
    solver: SolverKind,

    /// Worker threads (overrides the config file)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// JSON solver configuration
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<PcrConfig> {
    let mut config = match &cli.config {
        Some(path) => PcrConfig::from_file(path)
            .with_context(|| format!("failed to load config '{path}'"))?,
        None => PcrConfig::default(),
    };
    if cli.threads.is_some() {
        config.num_threads = cli.threads;
    }
    config.validate()?;
    Ok(config)
}

fn run_solver(kind: SolverKind, config: PcrConfig, system: &mut TridiagonalSystem) -> Result<SolveTiming> {
    let timing = match kind {
        SolverKind::Pcr => PcrSolver::new(config)?.solve(system)?,
        SolverKind::Thomas => solve_sequential(system)?,
    };
    Ok(timing)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .init();
    }

    let config = load_config(&cli)?;
    info!(n = cli.n, seed = cli.seed, solver = cli.solver.name(), "generating system");

    let mut system = generate_system(cli.n, cli.seed).context("failed to create system")?;
    // The solve overwrites a, b, c, d; validation needs the originals.
    let reference = system
        .try_clone_coefficients()
        .context("failed to copy system")?;

    let timing = run_solver(cli.solver, config, &mut system).context("failed to solve the system")?;

    println!("{} solve time: {:.6} sec", cli.solver.name(), timing.elapsed_secs());

    let report = ValidationReport::compute(&system, &reference);
    println!("Max relative error: {:e}", report.max_relative_error);
    println!("MAPE value: {:e}%", report.mape);

    Ok(())
}
