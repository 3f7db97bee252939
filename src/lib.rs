//! # Breadboard Core
//!
//! A DC circuit solver for a grid-based breadboard editor.
//!
//! This library provides:
//! - A board model of two-terminal components placed on an integer grid
//! - Topology building that merges coincident terminals into nodes
//! - A damped Gauss–Seidel relaxation solver for node voltages and branch
//!   currents
//! - A tick-driven simulation driver with play/pause/reset and optional
//!   capacitor charging
//! - A small text format for describing boards by hand
//!
//! ## Architecture
//!
//! - [`components`] - Component kinds, geometry and electrical models
//! - [`circuit`] - The editable board, topology building and validation
//! - [`solver`] - Relaxation solver, simulation state and the driver
//! - [`dsl`] - Parser for the board description language
//! - [`error`] - The crate-wide error type
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! BREADBOARD_LOG=debug breadboard lamp.board --ticks 60
//! ```
//!
//! ### Library
//!
//! ```
//! use breadboard_core::{dsl, Simulator};
//!
//! let ast = dsl::parse("battery B1 0 0\nresistor R1 3 0 180 resistance=100\n").unwrap();
//! let mut sim = Simulator::new(ast.to_board().unwrap());
//! let result = sim.refresh().unwrap();
//! assert!(result.converged);
//! assert!((result.current("R1").unwrap().abs() - 9.0 / 101.0).abs() < 1e-3);
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmBoard } from 'breadboard_core';
//!
//! const board = new WasmBoard("battery B1 0 0\nlamp L1 3 0 180");
//! board.play();
//! board.tick(1 / 60);
//! ```
//!
//! ## Solution Method
//!
//! Each component is a branch with a resistance and an optional series
//! source. Node voltages start at zero and are swept in order, each one
//! moved towards the conductance-weighted average its neighbours imply,
//! until the largest change in a pass drops below the tolerance or the
//! pass limit is reached. The ground node is pinned at 0 V.

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{Board, Topology};
pub use error::{BoardError, Result};
pub use solver::{Relaxation, Simulator, SolverResult};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmBoard;
