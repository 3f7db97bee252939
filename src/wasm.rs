//! WASM bindings for Breadboard Core.
//!
//! This module provides JavaScript-friendly bindings for driving the solver
//! from a browser-based board editor, typically once per animation frame.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmBoard } from 'breadboard_core';
//!
//! await init();
//!
//! const board = new WasmBoard(`
//!   battery B1 0 0
//!   lamp    L1 3 0 180
//! `);
//!
//! board.add_component("switch", "S1", 0, 0, 90);
//! board.play();
//!
//! let last = performance.now();
//! function frame(now) {
//!   board.tick((now - last) / 1000);
//!   last = now;
//!   const [v1, v2] = board.pin_voltages("L1");
//!   requestAnimationFrame(frame);
//! }
//! requestAnimationFrame(frame);
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{Point, Rotation};
use crate::components::{Component, ComponentKind};
use crate::dsl;
use crate::error::BoardError;
use crate::solver::{CapacitorModel, Simulator, SimulatorConfig, SolverConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: BoardError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-compatible board simulator.
///
/// Wraps the native [`Simulator`]. Edits go straight to the board; the
/// topology is rebuilt lazily on the next tick or refresh.
#[wasm_bindgen]
pub struct WasmBoard {
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmBoard {
    /// Create a new simulator from a board description.
    ///
    /// Pass an empty string to start from an empty board.
    ///
    /// # Example
    /// ```javascript
    /// const board = new WasmBoard("battery B1 0 0\nresistor R1 3 0 180");
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(board_text: &str) -> Result<WasmBoard, JsValue> {
        Self::with_config(
            board_text,
            crate::solver::MAX_ITERATIONS,
            crate::solver::TOLERANCE,
            crate::solver::DAMPING,
            false,
        )
    }

    /// Create a new simulator with custom relaxation settings.
    ///
    /// # Arguments
    /// * `board_text` - The board in the description language
    /// * `max_iterations` - Relaxation passes per tick (default: 200)
    /// * `tolerance` - Convergence tolerance in volts (default: 1e-4)
    /// * `damping` - Fraction of each correction applied (default: 0.8)
    /// * `integrate_capacitors` - Let capacitors charge between ticks
    #[wasm_bindgen]
    pub fn with_config(
        board_text: &str,
        max_iterations: usize,
        tolerance: f64,
        damping: f64,
        integrate_capacitors: bool,
    ) -> Result<WasmBoard, JsValue> {
        let ast = dsl::parse(board_text).map_err(to_js)?;
        let board = ast.to_board().map_err(to_js)?;
        let state = ast.initial_state(&board).map_err(to_js)?;

        crate::circuit::validate_board(&board).map_err(to_js)?;

        let capacitor_model = if integrate_capacitors {
            CapacitorModel::Integrating
        } else {
            CapacitorModel::Static
        };
        let config = SimulatorConfig::new()
            .with_solver(
                SolverConfig::new()
                    .with_max_iterations(max_iterations)
                    .with_tolerance(tolerance)
                    .with_damping(damping),
            )
            .with_capacitor_model(capacitor_model);

        let mut simulator = Simulator::with_config(board, config);
        *simulator.state_mut() = state;

        Ok(WasmBoard { simulator })
    }

    // ============ Editing ============

    /// Place a component. Unrecognised kinds are accepted and solved as a
    /// near-short.
    #[wasm_bindgen]
    pub fn add_component(&mut self, kind: &str, id: &str, x: f64, y: f64, rotation: i32) -> Result<(), JsValue> {
        let rotation = Rotation::from_degrees(rotation as i64).ok_or_else(|| {
            to_js(BoardError::WasmError {
                message: format!("rotation {} is not a multiple of 90", rotation),
            })
        })?;
        let component =
            Component::new(id, ComponentKind::from_name_lenient(kind), Point::new(x, y)).with_rotation(rotation);
        self.simulator.board_mut().add(component).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn remove_component(&mut self, id: &str) -> Result<(), JsValue> {
        self.simulator.board_mut().remove(id).map(|_| ()).map_err(to_js)
    }

    /// Rotate 90° clockwise. Returns the new rotation in degrees.
    #[wasm_bindgen]
    pub fn rotate_component(&mut self, id: &str) -> Result<i32, JsValue> {
        let rotation = self.simulator.board_mut().rotate(id).map_err(to_js)?;
        Ok(rotation.degrees() as i32)
    }

    /// Flip a switch. Returns the new state.
    #[wasm_bindgen]
    pub fn toggle_switch(&mut self, id: &str) -> Result<bool, JsValue> {
        self.simulator.board_mut().toggle(id).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn move_component(&mut self, id: &str, x: f64, y: f64) -> Result<(), JsValue> {
        self.simulator
            .board_mut()
            .move_to(id, Point::new(x, y))
            .map_err(to_js)
    }

    /// Set `length`, `resistance`, `voltage`, `capacitance` or `on`.
    #[wasm_bindgen]
    pub fn set_property(&mut self, id: &str, name: &str, value: f64) -> Result<(), JsValue> {
        self.simulator
            .board_mut()
            .set_param(id, name, value)
            .map_err(to_js)
    }

    /// Draw an orthogonal wire from a drag start to a drag end.
    #[wasm_bindgen]
    pub fn draw_wire(&mut self, id: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), JsValue> {
        self.simulator
            .board_mut()
            .wire_between(id, Point::new(x1, y1), Point::new(x2, y2))
            .map(|_| ())
            .map_err(to_js)
    }

    /// Remove every component and reset.
    #[wasm_bindgen]
    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.simulator.board_mut().clear();
        self.reset()
    }

    #[wasm_bindgen]
    pub fn set_capacitor_voltage(&mut self, id: &str, volts: f64) {
        self.simulator.state_mut().set_voltage(id, volts);
    }

    // ============ Running ============

    #[wasm_bindgen]
    pub fn play(&mut self) {
        self.simulator.play();
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.simulator.pause();
    }

    /// Stop, clear capacitor state and elapsed time, and re-solve so the
    /// readback getters show the reset board straight away.
    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.simulator.reset().map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.simulator.is_running()
    }

    /// Advance one tick of `dt` seconds. Returns false while paused.
    #[wasm_bindgen]
    pub fn tick(&mut self, dt: f64) -> Result<bool, JsValue> {
        self.simulator
            .tick(dt)
            .map(|result| result.is_some())
            .map_err(to_js)
    }

    /// Solve without advancing time, e.g. to show an edit while paused.
    #[wasm_bindgen]
    pub fn refresh(&mut self) -> Result<(), JsValue> {
        self.simulator.refresh().map(|_| ()).map_err(to_js)
    }

    // ============ Readback ============

    #[wasm_bindgen(getter)]
    pub fn converged(&self) -> bool {
        self.simulator.last_result().is_some_and(|r| r.converged)
    }

    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> usize {
        self.simulator.last_result().map_or(0, |r| r.iterations)
    }

    #[wasm_bindgen(getter)]
    pub fn elapsed(&self) -> f64 {
        self.simulator.elapsed()
    }

    /// Voltage of every node, in node order.
    #[wasm_bindgen]
    pub fn node_voltages(&self) -> Vec<f64> {
        self.simulator
            .last_result()
            .map(|r| r.voltages().map(|(_, v)| v).collect())
            .unwrap_or_default()
    }

    /// Grid position of every node as a flat `[x0, y0, x1, y1, ...]` list.
    #[wasm_bindgen]
    pub fn node_positions(&self) -> Vec<i32> {
        let Some(topology) = self.simulator.current_topology() else {
            return Vec::new();
        };
        topology
            .nodes()
            .iter()
            .filter_map(|&node| topology.position(node))
            .flat_map(|p| [p.x as i32, p.y as i32])
            .collect()
    }

    /// Signed current through a component, first terminal to second.
    ///
    /// # Returns
    /// The current in amperes, or `undefined` if the component was not part
    /// of the last solve.
    #[wasm_bindgen]
    pub fn component_current(&self, id: &str) -> Option<f64> {
        self.simulator.last_result()?.current(id)
    }

    /// Voltages at a component's two terminals.
    #[wasm_bindgen]
    pub fn pin_voltages(&self, id: &str) -> Option<Vec<f64>> {
        let topology = self.simulator.current_topology()?;
        let result = self.simulator.last_result()?;
        let (v1, v2) = result.pin_voltages(topology.component(id)?)?;
        Some(vec![v1, v2])
    }

    /// What a meter shows: volts for a voltmeter, amperes for an ammeter.
    #[wasm_bindgen]
    pub fn meter_reading(&self, id: &str) -> Option<f64> {
        let topology = self.simulator.current_topology()?;
        self.simulator.last_result()?.reading(topology.component(id)?)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
