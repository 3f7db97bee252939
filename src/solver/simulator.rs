//! Tick-driven simulation driver.

use crate::circuit::{validate_board, Board, Topology};
use crate::error::Result;

use super::{CapacitorModel, Relaxation, SimulationState, SolverConfig, SolverResult, MAX_TICK};

/// Configuration for the simulation driver.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Relaxation settings used for every tick.
    pub solver: SolverConfig,
    /// How capacitor voltages evolve between ticks.
    pub capacitor_model: CapacitorModel,
    /// Longest time step a single tick may advance, in seconds.
    pub max_tick: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            capacitor_model: CapacitorModel::default(),
            max_tick: MAX_TICK,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_capacitor_model(mut self, capacitor_model: CapacitorModel) -> Self {
        self.capacitor_model = capacitor_model;
        self
    }

    /// Clamp tick length (in seconds). Frame callbacks after a stall can
    /// report huge gaps; they are cut down to this.
    pub fn with_max_tick(mut self, max_tick: f64) -> Self {
        self.max_tick = max_tick;
        self
    }
}

/// Owns a board, its cached topology and the capacitor state, and runs one
/// solve per tick.
///
/// The topology is only rebuilt when the board's version differs from the
/// one it was built from.
pub struct Simulator {
    board: Board,
    config: SimulatorConfig,
    relaxation: Relaxation,
    topology: Topology,
    /// Board version the cached topology was built from
    built_version: Option<u64>,
    state: SimulationState,
    last: Option<SolverResult>,
    elapsed: f64,
    ticks: u64,
    running: bool,
    /// Set once non-convergence has been reported for the current layout
    warned: bool,
}

impl Simulator {
    /// Create a new simulator for the given board with default configuration.
    pub fn new(board: Board) -> Self {
        Self::with_config(board, SimulatorConfig::default())
    }

    /// Create a new simulator for the given board with custom configuration.
    pub fn with_config(board: Board, config: SimulatorConfig) -> Self {
        let relaxation = Relaxation::with_config(config.solver);
        Self {
            board,
            config,
            relaxation,
            topology: Topology::default(),
            built_version: None,
            state: SimulationState::new(),
            last: None,
            elapsed: 0.0,
            ticks: 0,
            running: false,
            warned: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board. Any edit invalidates the topology.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable access to the capacitor state, e.g. to precharge a capacitor.
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Result of the most recent solve.
    pub fn last_result(&self) -> Option<&SolverResult> {
        self.last.as_ref()
    }

    /// Simulated seconds since the last reset.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn play(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stop, clear capacitor state and elapsed time, and solve the board
    /// again from scratch. The board is left alone.
    pub fn reset(&mut self) -> Result<&SolverResult> {
        self.running = false;
        self.state.reset();
        self.elapsed = 0.0;
        self.ticks = 0;
        self.last = None;
        self.refresh()
    }

    /// The topology for the current board, rebuilding it if stale.
    pub fn topology(&mut self) -> Result<&Topology> {
        self.refresh_topology()?;
        Ok(&self.topology)
    }

    /// The cached topology, if it still matches the board.
    ///
    /// Unlike [`Simulator::topology`] this never rebuilds, so it can be read
    /// alongside [`Simulator::last_result`].
    pub fn current_topology(&self) -> Option<&Topology> {
        (self.built_version == Some(self.board.version())).then_some(&self.topology)
    }

    /// Rebuild the topology if the board changed. Returns whether it did.
    fn refresh_topology(&mut self) -> Result<bool> {
        let version = self.board.version();
        if self.built_version == Some(version) {
            return Ok(false);
        }

        validate_board(&self.board)?;
        self.topology = Topology::build(self.board.components());
        self.state.retain_present(&self.topology);
        self.built_version = Some(version);
        self.warned = false;

        log::debug!("topology rebuilt for board version {}", version);
        Ok(true)
    }

    /// Advance one tick if the simulation is running.
    ///
    /// Returns `None` while paused.
    pub fn tick(&mut self, dt: f64) -> Result<Option<&SolverResult>> {
        if !self.running {
            return Ok(None);
        }
        self.step(dt).map(Some)
    }

    /// Solve and advance by `dt` seconds regardless of the running flag.
    pub fn step(&mut self, dt: f64) -> Result<&SolverResult> {
        let dt = dt.max(0.0).min(self.config.max_tick);
        self.solve_and_advance(dt)
    }

    /// Solve the current board without advancing time, e.g. right after an
    /// edit while paused.
    pub fn refresh(&mut self) -> Result<&SolverResult> {
        self.solve_and_advance(0.0)
    }

    fn solve_and_advance(&mut self, dt: f64) -> Result<&SolverResult> {
        self.refresh_topology()?;

        let result = self.relaxation.solve(&self.topology, &self.state);
        if !result.converged && !self.warned {
            log::warn!(
                "relaxation did not converge within {} passes (max delta {:.3e}); using best estimate",
                result.iterations,
                result.max_delta
            );
            self.warned = true;
        }

        self.state
            .advance(&self.topology, &result, dt, self.config.capacitor_model);
        if dt > 0.0 {
            self.elapsed += dt;
            self.ticks += 1;
        }

        Ok(self.last.insert(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Point, Rotation};
    use crate::components::{Component, ComponentKind};
    use crate::error::BoardError;
    use approx::assert_abs_diff_eq;

    fn series_board() -> Board {
        Board::from_components([
            Component::new("B1", ComponentKind::Battery, Point::new(0.0, 0.0)),
            Component::new("R1", ComponentKind::Resistor, Point::new(3.0, 0.0))
                .with_rotation(Rotation::Deg180),
        ])
        .unwrap()
    }

    #[test]
    fn test_paused_tick_does_nothing() {
        let mut sim = Simulator::new(series_board());
        assert!(sim.tick(1.0 / 60.0).unwrap().is_none());
        assert_eq!(sim.elapsed(), 0.0);

        sim.play();
        assert!(sim.tick(1.0 / 60.0).unwrap().is_some());
        assert_abs_diff_eq!(sim.elapsed(), 1.0 / 60.0);
    }

    #[test]
    fn test_tick_is_clamped() {
        let mut sim = Simulator::new(series_board());
        sim.step(5.0).unwrap();
        assert_abs_diff_eq!(sim.elapsed(), MAX_TICK);
    }

    #[test]
    fn test_topology_reused_until_edit() {
        let mut sim = Simulator::new(series_board());
        assert!(sim.refresh_topology().unwrap());
        assert!(!sim.refresh_topology().unwrap());

        sim.board_mut().rotate("R1").unwrap();
        assert!(sim.current_topology().is_none());
        assert!(sim.refresh_topology().unwrap());
        assert!(sim.current_topology().is_some());
    }

    #[test]
    fn test_edit_changes_result() {
        let mut sim = Simulator::new(series_board());
        let before = sim.step(0.01).unwrap().current("R1").unwrap();
        sim.board_mut().set_param("R1", "resistance", 8.0).unwrap();
        let after = sim.step(0.01).unwrap().current("R1").unwrap();

        assert_abs_diff_eq!(before.abs(), 9.0 / 101.0, epsilon = 1e-3);
        assert_abs_diff_eq!(after.abs(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_reset_pauses_and_resolves() {
        let mut board = series_board();
        board
            .add(Component::new("C1", ComponentKind::Capacitor, Point::new(10.0, 10.0)))
            .unwrap();
        let config = SimulatorConfig::new().with_capacitor_model(CapacitorModel::Integrating);
        let mut sim = Simulator::with_config(board, config);
        sim.state_mut().set_voltage("C1", 4.0);
        sim.play();
        sim.tick(0.05).unwrap();

        let current = sim.reset().unwrap().current("R1").unwrap();
        assert_abs_diff_eq!(current.abs(), 9.0 / 101.0, epsilon = 1e-3);
        assert!(!sim.is_running());
        assert_eq!(sim.state().voltage("C1"), Some(0.0));
        assert_eq!(sim.elapsed(), 0.0);
        assert_eq!(sim.ticks(), 0);
        assert!(sim.last_result().is_some());

        // Paused after a reset: ticks do nothing until play.
        assert!(sim.tick(0.05).unwrap().is_none());
    }

    #[test]
    fn test_invalid_board_is_refused() {
        let mut sim = Simulator::new(series_board());
        sim.board_mut()
            .move_to("R1", Point::new(f64::NAN, 0.0))
            .unwrap();
        assert!(matches!(
            sim.step(0.01),
            Err(BoardError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn test_refresh_does_not_advance_time() {
        let mut sim = Simulator::new(series_board());
        sim.refresh().unwrap();
        assert_eq!(sim.elapsed(), 0.0);
        assert_eq!(sim.ticks(), 0);
        assert!(sim.last_result().is_some());
    }
}
