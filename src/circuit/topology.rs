//! Electrical graph derived from component placement.

use std::collections::{BTreeMap, HashMap};

use super::types::{ComponentId, GridPoint, NodeId};
use crate::components::Component;

/// A component together with the nodes its terminals resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct PinnedComponent {
    pub component: Component,
    /// Nodes under the first and second terminal
    pub pins: [NodeId; 2],
}

impl PinnedComponent {
    pub fn id(&self) -> &ComponentId {
        &self.component.id
    }

    /// Both terminals landed on the same node. Such a component is legal but
    /// forms no conduction path.
    pub fn is_single_point(&self) -> bool {
        self.pins[0] == self.pins[1]
    }

    /// The node on the other side of this component, seen from `node`.
    /// Returns the first pin's flag so callers can orient sources.
    pub fn opposite(&self, node: NodeId) -> Option<(NodeId, bool)> {
        if self.pins[0] == node {
            Some((self.pins[1], true))
        } else if self.pins[1] == node {
            Some((self.pins[0], false))
        } else {
            None
        }
    }
}

/// Nodes and node-to-component connectivity for one board layout.
///
/// A topology is immutable once built and can be reused for as many solves
/// as the layout stays the same.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Topology {
    /// Node identities, in assignment order
    nodes: Vec<NodeId>,
    /// Grid position of every node, indexed by node
    positions: Vec<GridPoint>,
    /// Reverse lookup of `positions`
    node_map: HashMap<GridPoint, NodeId>,
    /// Indices into `components` attached to each node, indexed by node
    attached: Vec<Vec<usize>>,
    /// Components in board order, with resolved pins
    components: Vec<PinnedComponent>,
}

impl Topology {
    /// Build the topology for a list of placed components.
    ///
    /// Terminal coordinates are snapped to the grid, and every distinct
    /// intersection becomes a node the first time it is seen. Components
    /// are never rejected here: non-finite coordinates must be filtered out
    /// beforehand (see [`validate_board`](super::validate_board)).
    pub fn build(components: &[Component]) -> Self {
        let mut topology = Topology {
            components: Vec::with_capacity(components.len()),
            ..Topology::default()
        };

        for (idx, component) in components.iter().enumerate() {
            let [first, second] = component.terminals();
            let pins = [
                topology.intern(first.snap()),
                topology.intern(second.snap()),
            ];

            for pin in pins {
                topology.attached[pin.index()].push(idx);
            }

            topology.components.push(PinnedComponent {
                component: component.clone(),
                pins,
            });
        }

        log::debug!(
            "built topology: {} nodes from {} components",
            topology.nodes.len(),
            topology.components.len()
        );

        topology
    }

    fn intern(&mut self, point: GridPoint) -> NodeId {
        if let Some(&node) = self.node_map.get(&point) {
            return node;
        }
        let node = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.positions.push(point);
        self.attached.push(Vec::new());
        self.node_map.insert(point, node);
        node
    }

    /// All nodes in assignment order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Grid position of a node.
    pub fn position(&self, node: NodeId) -> Option<GridPoint> {
        self.positions.get(node.index()).copied()
    }

    /// The node at a grid position, if any terminal lands there.
    pub fn node_at(&self, point: GridPoint) -> Option<NodeId> {
        self.node_map.get(&point).copied()
    }

    /// Components in board order, with their pins.
    pub fn components(&self) -> &[PinnedComponent] {
        &self.components
    }

    /// Look up a component by identity.
    pub fn component(&self, id: &str) -> Option<&PinnedComponent> {
        self.components.iter().find(|c| c.id().as_str() == id)
    }

    /// Components whose terminals touch `node`, in board order.
    ///
    /// A single-point component is yielded twice, once per terminal.
    pub fn attached(&self, node: NodeId) -> impl Iterator<Item = &PinnedComponent> + '_ {
        self.attached
            .get(node.index())
            .into_iter()
            .flatten()
            .map(move |&idx| &self.components[idx])
    }

    /// Indices into [`Topology::components`] of the components touching `node`.
    pub fn attached_indices(&self, node: NodeId) -> &[usize] {
        self.attached
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Node-to-component connection map.
    pub fn connections(&self) -> BTreeMap<NodeId, Vec<ComponentId>> {
        self.nodes
            .iter()
            .map(|&node| (node, self.attached(node).map(|c| c.id().clone()).collect()))
            .collect()
    }
}
