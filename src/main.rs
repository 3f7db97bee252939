//! Breadboard - grid circuit solver
//!
//! Solves a board description and prints node voltages and branch currents.
//!
//! # Usage
//!
//! ```bash
//! breadboard lamp.board --ticks 120 --integrate-capacitors
//! BREADBOARD_LOG=debug breadboard lamp.board --trace
//! ```

use std::path::PathBuf;

use clap::Parser;
use breadboard_core::{
    components::ComponentKind,
    dsl,
    error::Result,
    solver::{CapacitorModel, SimulatorConfig, SolverConfig, DAMPING, MAX_ITERATIONS, TOLERANCE},
    Simulator, SolverResult, Topology,
};

/// Grid-based DC circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the board description file
    #[arg(value_name = "BOARD_FILE")]
    board_file: PathBuf,

    /// Number of ticks to run (0 solves once without advancing time)
    #[arg(short, long, default_value_t = 1)]
    ticks: u64,

    /// Tick length in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Maximum relaxation passes per tick
    #[arg(long, default_value_t = MAX_ITERATIONS)]
    max_iterations: usize,

    /// Convergence threshold in volts
    #[arg(long, default_value_t = TOLERANCE)]
    tolerance: f64,

    /// Fraction of each correction applied per pass
    #[arg(long, default_value_t = DAMPING)]
    damping: f64,

    /// Let capacitors charge and discharge between ticks
    #[arg(long)]
    integrate_capacitors: bool,

    /// Print the solution after every tick instead of only the last
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env = env_logger::Env::default().filter("BREADBOARD_LOG").write_style("BREADBOARD_LOG_STYLE");
    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(log::LevelFilter::Warn)
        .parse_env(env)
        .init();

    // Parse the board file
    let ast = dsl::parse_file(&args.board_file)?;
    let board = ast.to_board()?;
    let state = ast.initial_state(&board)?;

    // Validate up front so errors point at the file, not at a tick
    breadboard_core::circuit::validate_board(&board)?;

    let capacitor_model = if args.integrate_capacitors {
        CapacitorModel::Integrating
    } else {
        CapacitorModel::Static
    };
    let config = SimulatorConfig::new()
        .with_solver(
            SolverConfig::new()
                .with_max_iterations(args.max_iterations)
                .with_tolerance(args.tolerance)
                .with_damping(args.damping),
        )
        .with_capacitor_model(capacitor_model);

    let mut simulator = Simulator::with_config(board, config);
    *simulator.state_mut() = state;

    if args.ticks == 0 {
        simulator.refresh()?;
        report(&simulator, None);
        return Ok(());
    }

    simulator.play();
    for tick in 1..=args.ticks {
        if simulator.tick(args.dt)?.is_none() {
            break;
        }
        if args.trace || tick == args.ticks {
            report(&simulator, Some(tick));
        }
    }

    Ok(())
}

fn report(simulator: &Simulator, tick: Option<u64>) {
    let (Some(topology), Some(result)) = (simulator.current_topology(), simulator.last_result()) else {
        return;
    };
    if let Some(tick) = tick {
        println!("tick {} (t = {:.4} s)", tick, simulator.elapsed());
    }
    print_solution(topology, result);
}

fn print_solution(topology: &Topology, result: &SolverResult) {
    println!(
        "  {} after {} passes (max delta {:.3e})",
        if result.converged { "converged" } else { "NOT converged" },
        result.iterations,
        result.max_delta
    );

    println!("  nodes:");
    for (node, volts) in result.voltages() {
        let ground = if Some(node) == result.ground { " (ground)" } else { "" };
        match topology.position(node) {
            Some(p) => println!("    {:>4} ({:>3}, {:>3}) {:>10.4} V{}", node, p.x, p.y, volts, ground),
            None => println!("    {:>4} {:>10.4} V{}", node, volts, ground),
        }
    }

    println!("  components:");
    for pinned in topology.components() {
        let component = &pinned.component;
        let current = result.current(component.id.as_str()).unwrap_or(0.0);
        match (component.kind, result.reading(pinned)) {
            (ComponentKind::Voltmeter, Some(volts)) => {
                println!("    {:<8} {:<10} reads {:>10.4} V", component.id, component.kind, volts)
            }
            (ComponentKind::Ammeter, Some(amps)) => {
                println!("    {:<8} {:<10} reads {:>10.4} A", component.id, component.kind, amps)
            }
            _ => println!("    {:<8} {:<10} {:>10.4} A", component.id, component.kind, current),
        }
    }
}
