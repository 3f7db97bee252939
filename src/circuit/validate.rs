//! Board validation.

use std::collections::HashSet;

use crate::components::{Component, ComponentKind};
use crate::error::{BoardError, Result};

use super::Board;

/// Validate a board before its topology is built.
///
/// The topology builder and the solver never check their numeric input, so
/// anything that would turn into NaN must be stopped here:
/// - Anchors and lengths are finite
/// - Numeric properties are finite
/// - Resistance and capacitance are not negative
/// - Component identities are unique
pub fn validate_board(board: &Board) -> Result<()> {
    validate_components(board.components())
}

/// Validate a bare component list (see [`validate_board`]).
pub fn validate_components(components: &[Component]) -> Result<()> {
    let mut seen = HashSet::new();

    for component in components {
        let id = component.id.as_str();

        if !seen.insert(id) {
            return Err(BoardError::DuplicateComponent { id: id.to_string() });
        }

        for (field, value) in [
            ("x", component.anchor.x),
            ("y", component.anchor.y),
            ("length", component.length),
        ] {
            if !value.is_finite() {
                return Err(BoardError::NonFiniteCoordinate {
                    id: id.to_string(),
                    field,
                    value,
                });
            }
        }

        for (param, value) in component.properties.numeric() {
            if !value.is_finite() {
                return Err(BoardError::invalid_parameter(id, param, format!("{} is not finite", value)));
            }
        }

        let props = &component.properties;
        if props.resistance.is_some_and(|r| r < 0.0) {
            return Err(BoardError::invalid_parameter(id, "resistance", "must not be negative"));
        }
        if props.capacitance.is_some_and(|c| c < 0.0) {
            return Err(BoardError::invalid_parameter(id, "capacitance", "must not be negative"));
        }

        if component.kind == ComponentKind::Unknown {
            log::warn!("component '{}' has an unknown kind and will be solved as a near-short", id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Point;

    #[test]
    fn test_accepts_plain_board() {
        let board = Board::from_components([
            Component::new("B1", ComponentKind::Battery, Point::new(0.0, 0.0)),
            Component::new("R1", ComponentKind::Resistor, Point::new(3.0, 0.0)),
        ])
        .unwrap();
        assert!(validate_board(&board).is_ok());
    }

    #[test]
    fn test_rejects_nan_anchor() {
        let components = [Component::new("W1", ComponentKind::Wire, Point::new(f64::NAN, 0.0))];
        assert!(matches!(
            validate_components(&components),
            Err(BoardError::NonFiniteCoordinate { field: "x", .. })
        ));
    }

    #[test]
    fn test_rejects_infinite_property() {
        let components =
            [Component::new("B1", ComponentKind::Battery, Point::default()).with_voltage(f64::INFINITY)];
        assert!(matches!(
            validate_components(&components),
            Err(BoardError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_resistance() {
        let components =
            [Component::new("R1", ComponentKind::Resistor, Point::default()).with_resistance(-5.0)];
        assert!(validate_components(&components).is_err());
    }

    #[test]
    fn test_rejects_duplicates() {
        let components = [
            Component::new("R1", ComponentKind::Resistor, Point::default()),
            Component::new("R1", ComponentKind::Resistor, Point::new(1.0, 0.0)),
        ];
        assert!(matches!(
            validate_components(&components),
            Err(BoardError::DuplicateComponent { .. })
        ));
    }
}
