//! State carried from one tick to the next.

use std::collections::HashMap;

use crate::circuit::{ComponentId, Topology};
use crate::components::{ComponentKind, CAPACITOR_RESISTANCE, DEFAULT_CAPACITANCE};

use super::SolverResult;

/// How stored capacitor voltages evolve between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacitorModel {
    /// Capacitors are voltage sources whose value only changes when set
    /// from outside. Charging and discharging are not modelled.
    #[default]
    Static,
    /// The stored voltage follows the solved branch current,
    /// `dV/dt = I / C`.
    Integrating,
}

/// Persistent solver state: the voltage held by each capacitor.
///
/// Owned by the driver and lent to the solver read-only, so nothing can
/// change it while a solve is running.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationState {
    capacitor_voltages: HashMap<ComponentId, f64>,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored voltage of a capacitor, positive at its first terminal.
    pub fn voltage(&self, id: &str) -> Option<f64> {
        self.capacitor_voltages.get(id).copied()
    }

    /// Preset a capacitor's stored voltage.
    pub fn set_voltage(&mut self, id: impl Into<ComponentId>, volts: f64) {
        self.capacitor_voltages.insert(id.into(), volts);
    }

    pub fn len(&self) -> usize {
        self.capacitor_voltages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacitor_voltages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, f64)> + '_ {
        self.capacitor_voltages.iter().map(|(id, &v)| (id, v))
    }

    /// Forget every stored voltage.
    pub fn reset(&mut self) {
        self.capacitor_voltages.clear();
    }

    /// Drop entries for capacitors that are no longer on the board.
    pub fn retain_present(&mut self, topology: &Topology) {
        self.capacitor_voltages.retain(|id, _| {
            topology
                .component(id.as_str())
                .is_some_and(|c| c.component.kind == ComponentKind::Capacitor)
        });
    }

    /// Bring the state forward by `dt` seconds after a solve.
    ///
    /// Every capacitor gets an entry (0 V) the first time it is seen. With
    /// [`CapacitorModel::Integrating`] the stored voltage then relaxes
    /// towards the voltage across the capacitor's terminals with time
    /// constant `R·C`, `R` being the capacitor branch resistance. For small
    /// steps this is `ΔV = I·dt / C`; for large ones it cannot overshoot.
    pub fn advance(&mut self, topology: &Topology, result: &SolverResult, dt: f64, model: CapacitorModel) {
        for pinned in topology.components() {
            let component = &pinned.component;
            if component.kind != ComponentKind::Capacitor {
                continue;
            }

            let stored = self
                .capacitor_voltages
                .entry(component.id.clone())
                .or_insert(0.0);

            if model == CapacitorModel::Static || dt <= 0.0 || pinned.is_single_point() {
                continue;
            }

            let Some(across) = result.voltage_across(pinned) else {
                continue;
            };
            let capacitance = component.properties.capacitance.unwrap_or(DEFAULT_CAPACITANCE);
            let decay = (-dt / (CAPACITOR_RESISTANCE * capacitance)).exp();
            *stored = across + (*stored - across) * decay;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Point, Rotation};
    use crate::components::Component;
    use crate::solver::Relaxation;
    use approx::assert_abs_diff_eq;

    fn rc_loop() -> Topology {
        Topology::build(&[
            Component::new("B1", ComponentKind::Battery, Point::new(0.0, 0.0)),
            Component::new("C1", ComponentKind::Capacitor, Point::new(3.0, 0.0))
                .with_rotation(Rotation::Deg180),
        ])
    }

    #[test]
    fn test_static_creates_entries_lazily() {
        let topo = rc_loop();
        let mut state = SimulationState::new();
        let result = Relaxation::new().solve(&topo, &state);

        state.advance(&topo, &result, 0.1, CapacitorModel::Static);
        assert_eq!(state.voltage("C1"), Some(0.0));
        assert_eq!(state.len(), 1);

        // A static capacitor never moves on its own.
        state.advance(&topo, &result, 0.1, CapacitorModel::Static);
        assert_eq!(state.voltage("C1"), Some(0.0));
    }

    #[test]
    fn test_integrating_moves_towards_terminal_voltage() {
        let topo = rc_loop();
        let mut state = SimulationState::new();
        let result = Relaxation::new().solve(&topo, &state);
        let across = result.voltage_across(topo.component("C1").unwrap()).unwrap();

        state.advance(&topo, &result, 1.0, CapacitorModel::Integrating);
        // 1 s is far beyond R·C = 5 ms, so the capacitor settles fully.
        assert_abs_diff_eq!(state.voltage("C1").unwrap(), across, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_dt_keeps_voltage() {
        let topo = rc_loop();
        let mut state = SimulationState::new();
        state.set_voltage("C1", 2.0);
        let result = Relaxation::new().solve(&topo, &state);
        state.advance(&topo, &result, 0.0, CapacitorModel::Integrating);
        assert_eq!(state.voltage("C1"), Some(2.0));
    }

    #[test]
    fn test_retain_present() {
        let topo = rc_loop();
        let mut state = SimulationState::new();
        state.set_voltage("C1", 1.0);
        state.set_voltage("C9", 1.0);
        state.set_voltage("B1", 1.0);
        state.retain_present(&topo);
        assert_eq!(state.len(), 1);
        assert_eq!(state.voltage("C1"), Some(1.0));
    }

    #[test]
    fn test_reset() {
        let mut state = SimulationState::new();
        state.set_voltage("C1", 4.0);
        state.reset();
        assert!(state.is_empty());
    }
}
