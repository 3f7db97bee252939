//! Damped Gauss-Seidel relaxation of node voltages.

use crate::circuit::{NodeId, Topology};
use crate::components::{BranchModel, ComponentKind};

use super::{SimulationState, SolverResult, DAMPING, MAX_ITERATIONS, TOLERANCE};

/// Tuning knobs for the relaxation loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Upper bound on relaxation passes per solve.
    pub max_iterations: usize,
    /// Stop once no node moves by more than this many volts in a pass.
    pub tolerance: f64,
    /// Fraction of each update actually applied (`0 < damping <= 1`).
    pub damping: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            tolerance: TOLERANCE,
            damping: DAMPING,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of relaxation passes.
    ///
    /// This is what bounds the cost of a tick, whether or not the board
    /// converges.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance (in volts).
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the damping factor.
    ///
    /// Lower values converge more slowly but are steadier on boards with
    /// strongly mismatched resistances.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }
}

/// Relaxation solver for a built topology.
#[derive(Debug, Clone, Default)]
pub struct Relaxation {
    config: SolverConfig,
}

impl Relaxation {
    /// Create a new solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve a topology for node voltages and branch currents.
    ///
    /// Each free node is repeatedly moved towards the conductance-weighted
    /// average of what its neighbours imply for it:
    ///
    /// ```text
    /// estimate = Σ (V_neighbour + V_source) / R  /  Σ 1 / R
    /// V_new    = V_old + damping · (estimate - V_old)
    /// ```
    ///
    /// Nodes are visited in assignment order, so results are reproducible
    /// bit for bit. Running out of passes is not an error: the best estimate
    /// is returned with `converged == false`.
    pub fn solve(&self, topology: &Topology, state: &SimulationState) -> SolverResult {
        if topology.node_count() == 0 {
            return SolverResult::empty();
        }

        let components = topology.components();
        let ground = ground_node(topology);

        // Lamp resistance depends on configuration only, so models are fixed
        // for the whole solve.
        let models: Vec<Option<BranchModel>> = components
            .iter()
            .map(|c| {
                if c.is_single_point() {
                    None
                } else {
                    c.component.branch_model(state.voltage(c.id().as_str()))
                }
            })
            .collect();

        let mut voltages = vec![0.0; topology.node_count()];
        let mut iterations = 0;
        let mut max_delta = 0.0f64;
        let mut converged = false;

        for pass in 0..self.config.max_iterations {
            iterations = pass + 1;
            max_delta = 0.0;

            for &node in topology.nodes() {
                if Some(node) == ground {
                    continue;
                }

                let mut numerator = 0.0;
                let mut denominator = 0.0;

                for &idx in topology.attached_indices(node) {
                    let Some(model) = models[idx] else {
                        continue;
                    };
                    let Some((neighbour, from_first)) = components[idx].opposite(node) else {
                        continue;
                    };
                    numerator += (voltages[neighbour.index()] + model.oriented_source(from_first))
                        / model.resistance;
                    denominator += 1.0 / model.resistance;
                }

                // Floating this pass: keep the previous value.
                if denominator > 0.0 {
                    let old = voltages[node.index()];
                    let estimate = numerator / denominator;
                    let new = old + self.config.damping * (estimate - old);
                    max_delta = max_delta.max((new - old).abs());
                    voltages[node.index()] = new;
                }
            }

            log::trace!("relaxation pass {}: max delta {:.3e}", iterations, max_delta);

            if max_delta < self.config.tolerance {
                converged = true;
                break;
            }
        }

        let currents = components
            .iter()
            .zip(&models)
            .map(|(c, model)| {
                let current = match model {
                    Some(m) => m.current(voltages[c.pins[0].index()], voltages[c.pins[1].index()]),
                    None => 0.0,
                };
                (c.id().clone(), current)
            })
            .collect();

        log::debug!(
            "solved {} nodes in {} passes (converged: {}, max delta {:.3e})",
            voltages.len(),
            iterations,
            converged,
            max_delta
        );

        SolverResult {
            voltages,
            currents,
            ground,
            converged,
            iterations,
            max_delta,
        }
    }
}

/// The node held at 0 V: the second terminal of the first battery, or the
/// first node when there is no battery.
pub fn ground_node(topology: &Topology) -> Option<NodeId> {
    topology
        .components()
        .iter()
        .find(|c| c.component.kind == ComponentKind::Battery)
        .map(|battery| battery.pins[1])
        .or_else(|| topology.nodes().first().copied())
}
