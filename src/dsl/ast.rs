//! Abstract Syntax Tree types for the board description language.

use crate::circuit::{Point, Rotation};
use crate::components::ComponentKind;

/// Complete AST representation of a parsed board.
#[derive(Debug, Clone, Default)]
pub struct BoardAst {
    /// Placements in file order; the order fixes node numbering
    pub placements: Vec<Placement>,
    /// Capacitor voltages to preset before the first tick
    pub charges: Vec<ChargeDef>,
}

impl BoardAst {
    /// Create a new empty board AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// One line that puts something on the board.
#[derive(Debug, Clone)]
pub enum Placement {
    Component(ComponentDef),
    Wire(WireDef),
}

/// A component definition: `kind name x y [rotation] { key=value }`.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    pub kind: ComponentKind,
    /// Unique component name
    pub name: String,
    pub anchor: Point,
    pub rotation: Rotation,
    /// `key=value` parameters, in the order written
    pub params: Vec<(String, f64)>,
    /// Source line number for error reporting
    pub line: usize,
}

/// A wire drawn between two points: `.wire name x1 y1 x2 y2`.
#[derive(Debug, Clone)]
pub struct WireDef {
    pub name: String,
    pub start: Point,
    pub end: Point,
    pub line: usize,
}

/// A preset capacitor voltage: `.charge name volts`.
#[derive(Debug, Clone)]
pub struct ChargeDef {
    pub name: String,
    pub volts: f64,
    pub line: usize,
}
