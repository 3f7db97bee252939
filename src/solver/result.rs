//! Output of one solve.

use std::collections::HashMap;

use crate::circuit::{ComponentId, NodeId, PinnedComponent};
use crate::components::ComponentKind;

/// Node voltages and branch currents for one tick.
///
/// A result is produced fresh by every solve and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverResult {
    /// Voltage of every node, indexed by node
    pub(crate) voltages: Vec<f64>,
    /// Signed current of every component, first terminal to second
    pub(crate) currents: HashMap<ComponentId, f64>,
    /// The reference node held at 0 V
    pub ground: Option<NodeId>,
    /// Whether the last pass moved every node by less than the tolerance
    pub converged: bool,
    /// Relaxation passes performed
    pub iterations: usize,
    /// Largest node change in the final pass
    pub max_delta: f64,
}

impl SolverResult {
    /// Result for a board with no nodes.
    pub fn empty() -> Self {
        Self {
            voltages: Vec::new(),
            currents: HashMap::new(),
            ground: None,
            converged: true,
            iterations: 0,
            max_delta: 0.0,
        }
    }

    /// Voltage at a node, relative to ground.
    pub fn voltage(&self, node: NodeId) -> Option<f64> {
        self.voltages.get(node.index()).copied()
    }

    /// All node voltages as `(node, volts)` pairs, in node order.
    pub fn voltages(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.voltages
            .iter()
            .enumerate()
            .map(|(idx, &v)| (NodeId(idx), v))
    }

    /// Node voltages keyed by node.
    pub fn voltage_map(&self) -> HashMap<NodeId, f64> {
        self.voltages().collect()
    }

    /// Current through a component, positive from its first terminal to its
    /// second.
    pub fn current(&self, id: &str) -> Option<f64> {
        self.currents.get(id).copied()
    }

    pub fn currents(&self) -> &HashMap<ComponentId, f64> {
        &self.currents
    }

    /// Voltages under both terminals of a component.
    pub fn pin_voltages(&self, component: &PinnedComponent) -> Option<(f64, f64)> {
        let [p1, p2] = component.pins;
        Some((self.voltage(p1)?, self.voltage(p2)?))
    }

    /// Voltage drop from the first terminal to the second.
    pub fn voltage_across(&self, component: &PinnedComponent) -> Option<f64> {
        self.pin_voltages(component).map(|(v1, v2)| v1 - v2)
    }

    /// What a meter would display: volts across a voltmeter, amps through an
    /// ammeter. `None` for every other kind.
    pub fn reading(&self, component: &PinnedComponent) -> Option<f64> {
        match component.component.kind {
            ComponentKind::Voltmeter => self.voltage_across(component),
            ComponentKind::Ammeter => self.current(component.id().as_str()),
            _ => None,
        }
    }
}
