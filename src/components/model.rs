//! Per-kind branch models.
//!
//! For relaxation every component is reduced to a Thevenin-like branch: a
//! small but non-zero resistance `R` in series with a source voltage. The
//! source's sign depends on which terminal it is seen from: the first
//! terminal is positive, so with no current flowing `V1 - V2 = V_source`.
//!
//! | Kind | R (Ω) | Source |
//! |------|-------|--------|
//! | Wire, closed Switch | 0.1 | - |
//! | Resistor | configured (100 when unset) | - |
//! | Lamp | `20 + 2 × rated voltage`, at least 10 | - |
//! | Battery | 1.0 | configured voltage (9 when unset) |
//! | Capacitor | 5.0 | stored capacitor voltage |
//! | Ammeter | 0.01 | - |
//! | Unknown | 1e-6 | - |
//!
//! Open switches and voltmeters have no branch model at all: they are left
//! out of the sums instead of being given a huge resistance.

use super::{Component, ComponentKind};

/// Resistance of a wire.
pub const WIRE_RESISTANCE: f64 = 0.1;
/// Resistance of a closed switch.
pub const SWITCH_RESISTANCE: f64 = 0.1;
/// Resistance of a resistor with no configured value.
pub const DEFAULT_RESISTANCE: f64 = 100.0;
/// Lamp resistance at a rated voltage of zero.
pub const LAMP_BASE_RESISTANCE: f64 = 20.0;
/// Lamp resistance added per volt of rating.
pub const LAMP_OHMS_PER_VOLT: f64 = 2.0;
/// Lower bound on lamp resistance.
pub const LAMP_MIN_RESISTANCE: f64 = 10.0;
/// Internal resistance of a battery.
pub const BATTERY_INTERNAL_RESISTANCE: f64 = 1.0;
/// Voltage of a battery with no configured value.
pub const DEFAULT_BATTERY_VOLTAGE: f64 = 9.0;
/// Series resistance of the quasi-static capacitor source.
pub const CAPACITOR_RESISTANCE: f64 = 5.0;
/// Capacitance of a freshly placed capacitor.
pub const DEFAULT_CAPACITANCE: f64 = 1e-3;
/// Resistance of an ammeter.
pub const AMMETER_RESISTANCE: f64 = 0.01;
/// Resistance used for kinds the solver does not recognise.
pub const FALLBACK_RESISTANCE: f64 = 1e-6;

/// Electrical model of one conducting branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchModel {
    /// Series resistance in ohms
    pub resistance: f64,
    /// Source voltage, positive at the first terminal
    pub source_voltage: f64,
}

impl BranchModel {
    pub fn resistor(resistance: f64) -> Self {
        Self {
            resistance,
            source_voltage: 0.0,
        }
    }

    pub fn source(resistance: f64, source_voltage: f64) -> Self {
        Self {
            resistance,
            source_voltage,
        }
    }

    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }

    /// Source voltage as seen when relaxing the node at one of the terminals.
    pub fn oriented_source(&self, from_first_terminal: bool) -> f64 {
        if from_first_terminal {
            self.source_voltage
        } else {
            -self.source_voltage
        }
    }

    /// Branch current flowing from the first to the second terminal.
    pub fn current(&self, v1: f64, v2: f64) -> f64 {
        (v1 - v2 - self.source_voltage) / self.resistance
    }
}

impl Component {
    /// Branch model for this component, or `None` when it does not conduct.
    ///
    /// `stored_voltage` is the capacitor voltage carried over from the
    /// previous tick; it is ignored by every other kind.
    pub fn branch_model(&self, stored_voltage: Option<f64>) -> Option<BranchModel> {
        let props = &self.properties;
        let model = match self.kind {
            ComponentKind::Wire => BranchModel::resistor(WIRE_RESISTANCE),
            ComponentKind::Switch if props.is_on => BranchModel::resistor(SWITCH_RESISTANCE),
            ComponentKind::Switch | ComponentKind::Voltmeter => return None,
            ComponentKind::Resistor => {
                let r = props
                    .resistance
                    .filter(|&r| r != 0.0)
                    .unwrap_or(DEFAULT_RESISTANCE);
                BranchModel::resistor(r)
            }
            ComponentKind::Lamp => BranchModel::resistor(lamp_resistance(props.voltage.unwrap_or(0.0))),
            ComponentKind::Battery => BranchModel::source(
                BATTERY_INTERNAL_RESISTANCE,
                props
                    .voltage
                    .filter(|&v| v != 0.0)
                    .unwrap_or(DEFAULT_BATTERY_VOLTAGE),
            ),
            ComponentKind::Capacitor => {
                BranchModel::source(CAPACITOR_RESISTANCE, stored_voltage.unwrap_or(0.0))
            }
            ComponentKind::Ammeter => BranchModel::resistor(AMMETER_RESISTANCE),
            ComponentKind::Unknown => BranchModel::resistor(FALLBACK_RESISTANCE),
        };
        Some(model)
    }
}

/// Lamp resistance as a function of its rated voltage.
///
/// Depends on the configured rating only, not on the current flowing.
pub fn lamp_resistance(rated_voltage: f64) -> f64 {
    (LAMP_BASE_RESISTANCE + LAMP_OHMS_PER_VOLT * rated_voltage).max(LAMP_MIN_RESISTANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Point;
    use approx::assert_abs_diff_eq;

    fn place(kind: ComponentKind) -> Component {
        Component::new("X1", kind, Point::default())
    }

    #[test]
    fn test_switch_excluded_when_open() {
        let s = place(ComponentKind::Switch);
        assert_eq!(s.branch_model(None), None);
        let s = s.with_state(true);
        assert_eq!(s.branch_model(None), Some(BranchModel::resistor(SWITCH_RESISTANCE)));
    }

    #[test]
    fn test_voltmeter_never_conducts() {
        assert_eq!(place(ComponentKind::Voltmeter).branch_model(Some(3.0)), None);
    }

    #[test]
    fn test_lamp_floor() {
        assert_abs_diff_eq!(lamp_resistance(0.0), 20.0);
        assert_abs_diff_eq!(lamp_resistance(6.0), 32.0);
        assert_abs_diff_eq!(lamp_resistance(-8.0), LAMP_MIN_RESISTANCE);
    }

    #[test]
    fn test_battery_orientation() {
        let b = place(ComponentKind::Battery).with_voltage(6.0);
        let m = b.branch_model(None).unwrap();
        assert_abs_diff_eq!(m.oriented_source(true), 6.0);
        assert_abs_diff_eq!(m.oriented_source(false), -6.0);
        // Open-circuit terminal voltage carries no current.
        assert_abs_diff_eq!(m.current(6.0, 0.0), 0.0);
    }

    #[test]
    fn test_battery_zero_uses_default() {
        let b = place(ComponentKind::Battery).with_voltage(0.0);
        assert_abs_diff_eq!(b.branch_model(None).unwrap().source_voltage, DEFAULT_BATTERY_VOLTAGE);
    }

    #[test]
    fn test_resistor_zero_uses_default() {
        let r = place(ComponentKind::Resistor).with_resistance(0.0);
        assert_abs_diff_eq!(r.branch_model(None).unwrap().resistance, DEFAULT_RESISTANCE);
    }

    #[test]
    fn test_capacitor_uses_stored_voltage() {
        let c = place(ComponentKind::Capacitor);
        assert_abs_diff_eq!(c.branch_model(None).unwrap().source_voltage, 0.0);
        assert_abs_diff_eq!(c.branch_model(Some(2.5)).unwrap().source_voltage, 2.5);
    }

    #[test]
    fn test_unknown_falls_back_to_near_short() {
        let m = place(ComponentKind::Unknown).branch_model(None).unwrap();
        assert_abs_diff_eq!(m.resistance, FALLBACK_RESISTANCE);
    }
}
