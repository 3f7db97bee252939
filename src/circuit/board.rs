//! The editable list of placed components.

use super::types::{round_half_up, ComponentId, Point, Rotation};
use crate::components::{Component, ComponentKind};
use crate::error::{BoardError, Result};

/// An ordered list of placed components plus a version counter.
///
/// Every structural change bumps the version, which is what the
/// [`Simulator`](crate::solver::Simulator) compares to decide whether its
/// cached topology is stale. Board order matters: it fixes node numbering
/// and the choice of ground.
#[derive(Debug, Clone, Default)]
pub struct Board {
    components: Vec<Component>,
    version: u64,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board from components, rejecting duplicate identities.
    pub fn from_components(components: impl IntoIterator<Item = Component>) -> Result<Self> {
        let mut board = Self::new();
        for component in components {
            board.add(component)?;
        }
        Ok(board)
    }

    /// Version of the layout; changes whenever the component list does.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id.as_str() == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Component> {
        self.components
            .iter_mut()
            .find(|c| c.id.as_str() == id)
            .ok_or_else(|| BoardError::not_found(id))
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Place a component at the end of the list.
    pub fn add(&mut self, component: Component) -> Result<()> {
        if self.get(component.id.as_str()).is_some() {
            return Err(BoardError::DuplicateComponent {
                id: component.id.0,
            });
        }
        self.components.push(component);
        self.touch();
        Ok(())
    }

    /// Take a component off the board.
    pub fn remove(&mut self, id: &str) -> Result<Component> {
        let idx = self
            .components
            .iter()
            .position(|c| c.id.as_str() == id)
            .ok_or_else(|| BoardError::not_found(id))?;
        let removed = self.components.remove(idx);
        self.touch();
        Ok(removed)
    }

    /// Rotate a component 90° clockwise about its anchor.
    pub fn rotate(&mut self, id: &str) -> Result<Rotation> {
        let component = self.get_mut(id)?;
        component.rotation = component.rotation.rotated();
        let rotation = component.rotation;
        self.touch();
        Ok(rotation)
    }

    /// Flip a switch. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let component = self.get_mut(id)?;
        if !component.is_switch() {
            return Err(BoardError::WrongComponentKind {
                id: id.to_string(),
                kind: component.kind.to_string(),
                expected: ComponentKind::Switch.to_string(),
            });
        }
        component.properties.is_on = !component.properties.is_on;
        let is_on = component.properties.is_on;
        self.touch();
        Ok(is_on)
    }

    /// Move a component's anchor.
    pub fn move_to(&mut self, id: &str, anchor: Point) -> Result<()> {
        self.get_mut(id)?.anchor = anchor;
        self.touch();
        Ok(())
    }

    /// Set a named parameter on a component (see [`Component::set_param`]).
    pub fn set_param(&mut self, id: &str, name: &str, value: f64) -> Result<()> {
        self.get_mut(id)?.set_param(name, value)?;
        self.touch();
        Ok(())
    }

    /// Lay a wire from `start` towards `end`.
    ///
    /// Wires are always horizontal or vertical: the dominant axis of the drag
    /// wins (ties go horizontal) and the length is rounded to whole grid
    /// units. A drag that rounds to zero length places nothing.
    pub fn wire_between(&mut self, id: impl Into<ComponentId>, start: Point, end: Point) -> Result<&Component> {
        let id = id.into();
        let dx = end.x - start.x;
        let dy = end.y - start.y;

        let (length, rotation) = if dx.abs() >= dy.abs() {
            (dx.abs(), if dx >= 0.0 { Rotation::Deg0 } else { Rotation::Deg180 })
        } else {
            (dy.abs(), if dy >= 0.0 { Rotation::Deg90 } else { Rotation::Deg270 })
        };
        let length = round_half_up(length) as f64;

        if length <= 0.0 {
            return Err(BoardError::ZeroLengthWire { id: id.0 });
        }

        let wire = Component::new(id, ComponentKind::Wire, start)
            .with_rotation(rotation)
            .with_length(length);
        self.add(wire)?;
        Ok(&self.components[self.components.len() - 1])
    }

    /// Remove every component.
    pub fn clear(&mut self) {
        self.components.clear();
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_bump_version() {
        let mut board = Board::new();
        let v0 = board.version();

        board
            .add(Component::new("S1", ComponentKind::Switch, Point::default()))
            .unwrap();
        let v1 = board.version();
        assert_ne!(v0, v1);

        assert!(board.toggle("S1").unwrap());
        assert_ne!(board.version(), v1);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut board = Board::new();
        board
            .add(Component::new("R1", ComponentKind::Resistor, Point::default()))
            .unwrap();
        let version = board.version();
        let err = board
            .add(Component::new("R1", ComponentKind::Lamp, Point::default()))
            .unwrap_err();
        assert!(matches!(err, BoardError::DuplicateComponent { .. }));
        assert_eq!(board.version(), version);
    }

    #[test]
    fn test_toggle_requires_switch() {
        let mut board = Board::new();
        board
            .add(Component::new("L1", ComponentKind::Lamp, Point::default()))
            .unwrap();
        assert!(matches!(
            board.toggle("L1"),
            Err(BoardError::WrongComponentKind { .. })
        ));
        assert!(matches!(
            board.toggle("S9"),
            Err(BoardError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_rotate_wraps() {
        let mut board = Board::new();
        board
            .add(Component::new("B1", ComponentKind::Battery, Point::default()).with_rotation(Rotation::Deg270))
            .unwrap();
        assert_eq!(board.rotate("B1").unwrap(), Rotation::Deg0);
    }

    #[test]
    fn test_wire_between_snaps_to_axis() {
        let mut board = Board::new();
        let w = board
            .wire_between("W1", Point::new(2.0, 2.0), Point::new(-1.9, 3.0))
            .unwrap();
        assert_eq!(w.rotation, Rotation::Deg180);
        assert_eq!(w.length, 4.0);

        let w = board
            .wire_between("W2", Point::new(0.0, 0.0), Point::new(0.4, -5.0))
            .unwrap();
        assert_eq!(w.rotation, Rotation::Deg270);
        assert_eq!(w.length, 5.0);
    }

    #[test]
    fn test_zero_length_wire_rejected() {
        let mut board = Board::new();
        let err = board
            .wire_between("W1", Point::new(1.0, 1.0), Point::new(1.2, 0.9))
            .unwrap_err();
        assert!(matches!(err, BoardError::ZeroLengthWire { .. }));
        assert!(board.is_empty());
    }

    #[test]
    fn test_wire_length_just_under_half_rounds_down() {
        let mut board = Board::new();
        let err = board
            .wire_between("W1", Point::new(0.0, 0.0), Point::new(0.49999999999999994, 0.0))
            .unwrap_err();
        assert!(matches!(err, BoardError::ZeroLengthWire { .. }));

        let w = board
            .wire_between("W2", Point::new(0.0, 0.0), Point::new(0.0, 1.5))
            .unwrap();
        assert_eq!(w.length, 2.0);
    }

    #[test]
    fn test_remove() {
        let mut board = Board::new();
        board
            .add(Component::new("R1", ComponentKind::Resistor, Point::default()))
            .unwrap();
        let removed = board.remove("R1").unwrap();
        assert_eq!(removed.id.as_str(), "R1");
        assert!(board.get("R1").is_none());
        assert!(board.remove("R1").is_err());
    }
}
