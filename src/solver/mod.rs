//! Network solver and simulation driver.
//!
//! ## Relaxation
//!
//! Instead of assembling and factoring a conductance matrix, node voltages
//! are found by damped Gauss-Seidel relaxation. Each component is a branch
//! with resistance `R` and an optional series source; a free node is moved
//! towards
//!
//! ```text
//! Σ (V_neighbour ± V_source) / R
//! ------------------------------
//!           Σ 1 / R
//! ```
//!
//! until no node moves by more than the tolerance, or the pass limit is hit.
//! Branch currents are computed once from the final voltages:
//!
//! ```text
//! I = (V1 - V2 - V_source) / R
//! ```
//!
//! The pass limit bounds the cost of a tick, which keeps the solver usable
//! inside an animation-frame callback.

mod relaxation;
mod result;
mod simulator;
mod state;

pub use relaxation::{ground_node, Relaxation, SolverConfig};
pub use result::SolverResult;
pub use simulator::{Simulator, SimulatorConfig};
pub use state::{CapacitorModel, SimulationState};

/// Relaxation passes per solve.
pub const MAX_ITERATIONS: usize = 200;

/// Convergence tolerance in volts.
pub const TOLERANCE: f64 = 1e-4;

/// Fraction of each relaxation update that is applied.
pub const DAMPING: f64 = 0.8;

/// Longest time step a single tick may advance, in seconds.
pub const MAX_TICK: f64 = 0.1;
