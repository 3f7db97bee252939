//! Board description language.
//!
//! A small, line-oriented text format for laying out a board by hand, used
//! by the CLI and the wasm bindings. Coordinates are in grid units; `y`
//! grows downwards.
//!
//! # Grammar Overview
//!
//! ```text
//! board       = { line }
//! line        = comment | directive | component | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = '.' directive_name { argument }
//! component   = kind name x y [rotation] { param '=' value }
//!
//! directive_name = "wire" | "charge"
//! kind        = "WIRE" | "RESISTOR" | "R" | "LAMP" | "L" | "SWITCH" | "SW"
//!             | "CAPACITOR" | "C" | "BATTERY" | "BAT" | "B"
//!             | "VOLTMETER" | "VM" | "AMMETER" | "AM"
//! rotation    = 0 | 90 | 180 | 270   (any multiple of 90)
//! param       = "length" | "resistance" | "voltage" | "capacitance" | "on"
//! value       = number [unit_suffix] | "on" | "off" | "true" | "false"
//!
//! number      = ['-'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Directives
//!
//! | Directive | Description | Syntax |
//! |-----------|-------------|--------|
//! | .wire | Wire dragged from one point to another | `.wire <name> <x1> <y1> <x2> <y2>` |
//! | .charge | Preset a capacitor's voltage | `.charge <name> <volts>` |
//!
//! # Example
//!
//! ```text
//! # 9 V battery driving a lamp through a switch
//! battery B1 0 0 voltage=9
//! switch  S1 3 0 on=1
//! lamp    L1 6 0 90
//! .wire   W1 6 3 0 3
//! .wire   W2 0 3 0 0
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::circuit::Board;
use crate::components::Component;
use crate::error::{BoardError, Result};
use crate::solver::SimulationState;

/// Parse a board description string into an AST.
pub fn parse(input: &str) -> Result<BoardAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a board description file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<BoardAst> {
    let content = std::fs::read_to_string(path).map_err(|e| BoardError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

impl BoardAst {
    /// Lay the parsed components out on a fresh board.
    pub fn to_board(&self) -> Result<Board> {
        let mut board = Board::new();

        for placement in &self.placements {
            match placement {
                Placement::Component(def) => {
                    let mut component =
                        Component::new(def.name.as_str(), def.kind, def.anchor).with_rotation(def.rotation);
                    for (param, value) in &def.params {
                        component.set_param(param, *value)?;
                    }
                    board.add(component)?;
                }
                Placement::Wire(def) => {
                    board.wire_between(def.name.as_str(), def.start, def.end)?;
                }
            }
        }

        Ok(board)
    }

    /// Initial capacitor state from `.charge` directives.
    pub fn initial_state(&self, board: &Board) -> Result<SimulationState> {
        let mut state = SimulationState::new();
        for charge in &self.charges {
            if board.get(&charge.name).is_none() {
                return Err(BoardError::parse(
                    charge.line,
                    format!(".charge refers to unknown component '{}'", charge.name),
                ));
            }
            state.set_voltage(charge.name.as_str(), charge.volts);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Point, Rotation};
    use crate::components::ComponentKind;

    #[test]
    fn test_to_board() {
        let ast = parse("battery B1 0 0 voltage=4.5 length=2\n.wire W1 2 0 2 3\n").unwrap();
        let board = ast.to_board().unwrap();

        let b = board.get("B1").unwrap();
        assert_eq!(b.properties.voltage, Some(4.5));
        assert_eq!(b.length, 2.0);

        let w = board.get("W1").unwrap();
        assert_eq!(w.kind, ComponentKind::Wire);
        assert_eq!(w.anchor, Point::new(2.0, 0.0));
        assert_eq!(w.rotation, Rotation::Deg90);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let ast = parse("R R1 0 0\nR R1 1 1\n").unwrap();
        assert!(matches!(ast.to_board(), Err(BoardError::DuplicateComponent { .. })));
    }

    #[test]
    fn test_unknown_param_rejected() {
        let ast = parse("lamp L1 0 0 colour=3").unwrap();
        assert!(matches!(ast.to_board(), Err(BoardError::InvalidParameter { .. })));
    }

    #[test]
    fn test_initial_state() {
        let ast = parse("C C1 0 0\n.charge C1 -1.5").unwrap();
        let board = ast.to_board().unwrap();
        let state = ast.initial_state(&board).unwrap();
        assert_eq!(state.voltage("C1"), Some(-1.5));

        let ast = parse(".charge C9 1").unwrap();
        assert!(ast.initial_state(&Board::new()).is_err());
    }
}
