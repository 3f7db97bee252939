//! Components that can be placed on the board.
//!
//! Every component is a two-terminal element:
//! - Conductors: Wire, Switch, Ammeter
//! - Loads: Resistor, Lamp
//! - Sources: Battery, Capacitor
//! - Probes: Voltmeter
//!
//! Geometry (anchor, rotation, length) decides where the terminals land on
//! the grid; [`model`] decides how the component behaves electrically.

mod model;

pub use model::*;

use std::fmt;

use crate::circuit::{ComponentId, Point, Rotation};
use crate::error::{BoardError, Result};

/// Default component length in grid units.
pub const DEFAULT_LENGTH: f64 = 3.0;

/// The kind of a placed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Wire,
    Resistor,
    Lamp,
    Switch,
    Capacitor,
    Battery,
    Voltmeter,
    Ammeter,
    /// A type name the solver does not recognise. Solved as a near-short.
    Unknown,
}

impl ComponentKind {
    /// Parse a component kind from a board description keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "WIRE" | "W" => Some(Self::Wire),
            "RESISTOR" | "R" => Some(Self::Resistor),
            "LAMP" | "L" => Some(Self::Lamp),
            "SWITCH" | "SW" => Some(Self::Switch),
            "CAPACITOR" | "C" => Some(Self::Capacitor),
            "BATTERY" | "BAT" | "B" => Some(Self::Battery),
            "VOLTMETER" | "VM" => Some(Self::Voltmeter),
            "AMMETER" | "AM" => Some(Self::Ammeter),
            _ => None,
        }
    }

    /// Like [`ComponentKind::from_keyword`], but never fails.
    ///
    /// Used at the wasm boundary, where the editor may hand over type names
    /// this crate does not know about.
    pub fn from_name_lenient(name: &str) -> Self {
        Self::from_keyword(name).unwrap_or(Self::Unknown)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Wire => "wire",
            Self::Resistor => "resistor",
            Self::Lamp => "lamp",
            Self::Switch => "switch",
            Self::Capacitor => "capacitor",
            Self::Battery => "battery",
            Self::Voltmeter => "voltmeter",
            Self::Ammeter => "ammeter",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Configurable electrical properties.
///
/// Which fields matter depends on the component kind; unset values fall back
/// to the defaults in [`model`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    /// Resistance in ohms (resistors)
    pub resistance: Option<f64>,
    /// Source voltage (batteries) or rated voltage (lamps)
    pub voltage: Option<f64>,
    /// Capacitance in farads (capacitors)
    pub capacitance: Option<f64>,
    /// Switch state
    pub is_on: bool,
}

impl Properties {
    /// The properties a freshly placed component of `kind` starts with.
    pub fn defaults_for(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Battery => Self {
                voltage: Some(DEFAULT_BATTERY_VOLTAGE),
                ..Self::default()
            },
            ComponentKind::Resistor => Self {
                resistance: Some(DEFAULT_RESISTANCE),
                ..Self::default()
            },
            ComponentKind::Capacitor => Self {
                capacitance: Some(DEFAULT_CAPACITANCE),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Iterate over the numeric properties that are set.
    pub fn numeric(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        [
            ("resistance", self.resistance),
            ("voltage", self.voltage),
            ("capacitance", self.capacitance),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// A component placed on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub kind: ComponentKind,
    /// First terminal position
    pub anchor: Point,
    pub rotation: Rotation,
    /// Distance between the terminals, in grid units
    pub length: f64,
    pub properties: Properties,
}

impl Component {
    /// Create a component with the default length, no rotation and the
    /// default properties for its kind.
    pub fn new(id: impl Into<ComponentId>, kind: ComponentKind, anchor: Point) -> Self {
        Self {
            id: id.into(),
            kind,
            anchor,
            rotation: Rotation::default(),
            length: DEFAULT_LENGTH,
            properties: Properties::defaults_for(kind),
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    pub fn with_resistance(mut self, ohms: f64) -> Self {
        self.properties.resistance = Some(ohms);
        self
    }

    pub fn with_voltage(mut self, volts: f64) -> Self {
        self.properties.voltage = Some(volts);
        self
    }

    pub fn with_capacitance(mut self, farads: f64) -> Self {
        self.properties.capacitance = Some(farads);
        self
    }

    pub fn with_state(mut self, is_on: bool) -> Self {
        self.properties.is_on = is_on;
        self
    }

    /// Positions of both terminals.
    ///
    /// A length of zero or less collapses the component onto its anchor.
    pub fn terminals(&self) -> [Point; 2] {
        if self.length <= 0.0 {
            return [self.anchor, self.anchor];
        }
        let (dx, dy) = self.rotation.direction();
        let end = Point::new(
            self.anchor.x + dx * self.length,
            self.anchor.y + dy * self.length,
        );
        [self.anchor, end]
    }

    /// Set a named parameter, as written in a board description.
    ///
    /// Recognised names: `length`, `resistance`, `voltage`, `capacitance`
    /// and `on` (any non-zero value closes a switch).
    pub fn set_param(&mut self, name: &str, value: f64) -> Result<()> {
        match name.to_ascii_lowercase().as_str() {
            "length" | "len" => self.length = value,
            "resistance" | "r" => self.properties.resistance = Some(value),
            "voltage" | "v" => self.properties.voltage = Some(value),
            "capacitance" | "c" => self.properties.capacitance = Some(value),
            "on" | "closed" => self.properties.is_on = value != 0.0,
            _ => {
                return Err(BoardError::invalid_parameter(
                    self.id.as_str(),
                    name,
                    "unknown parameter",
                ))
            }
        }
        Ok(())
    }

    pub fn is_switch(&self) -> bool {
        self.kind == ComponentKind::Switch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminals_follow_rotation() {
        let c = Component::new("W1", ComponentKind::Wire, Point::new(5.0, 5.0));
        assert_eq!(c.terminals()[1], Point::new(8.0, 5.0));

        let c = c.with_rotation(Rotation::Deg90);
        assert_eq!(c.terminals()[1], Point::new(5.0, 8.0));

        let c = c.with_rotation(Rotation::Deg180).with_length(2.0);
        assert_eq!(c.terminals()[1], Point::new(3.0, 5.0));

        let c = c.with_rotation(Rotation::Deg270);
        assert_eq!(c.terminals()[1], Point::new(5.0, 3.0));
    }

    #[test]
    fn test_non_positive_length_collapses() {
        let c = Component::new("W1", ComponentKind::Wire, Point::new(1.0, 2.0)).with_length(0.0);
        assert_eq!(c.terminals(), [Point::new(1.0, 2.0), Point::new(1.0, 2.0)]);

        let c = c.with_length(-4.0);
        assert_eq!(c.terminals()[0], c.terminals()[1]);
    }

    #[test]
    fn test_defaults_per_kind() {
        let b = Component::new("B1", ComponentKind::Battery, Point::default());
        assert_eq!(b.properties.voltage, Some(9.0));
        let s = Component::new("S1", ComponentKind::Switch, Point::default());
        assert!(!s.properties.is_on);
        let r = Component::new("R1", ComponentKind::Resistor, Point::default());
        assert_eq!(r.properties.resistance, Some(100.0));
    }

    #[test]
    fn test_set_param() {
        let mut c = Component::new("S1", ComponentKind::Switch, Point::default());
        c.set_param("on", 1.0).unwrap();
        assert!(c.properties.is_on);
        c.set_param("length", 4.0).unwrap();
        assert_eq!(c.length, 4.0);
        assert!(c.set_param("colour", 1.0).is_err());
    }

    #[test]
    fn test_lenient_kind() {
        assert_eq!(ComponentKind::from_name_lenient("battery"), ComponentKind::Battery);
        assert_eq!(ComponentKind::from_name_lenient("diode"), ComponentKind::Unknown);
    }

    #[test]
    fn test_keyword_aliases() {
        assert_eq!(ComponentKind::from_keyword("w"), Some(ComponentKind::Wire));
        assert_eq!(ComponentKind::from_keyword("L"), Some(ComponentKind::Lamp));
        assert_eq!(ComponentKind::from_keyword("B"), Some(ComponentKind::Battery));
        assert_eq!(ComponentKind::from_keyword("Bat"), Some(ComponentKind::Battery));
        assert_eq!(ComponentKind::from_keyword("X"), None);
    }
}
