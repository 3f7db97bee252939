//! Core types for board geometry and circuit identity.

use std::borrow::Borrow;
use std::fmt;

/// A unique identifier for an electrical node.
///
/// Node identities are assigned in first-seen order while building a
/// [`Topology`](super::Topology), so `NodeId(0)` is the first coordinate
/// touched by the first component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Position of this node in the topology's node list.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("n{}", self.0))
    }
}

/// A unique identifier for a component placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A placement position on the board, in grid units.
///
/// Upstream placement logic may leave small floating drift on these values;
/// they are only ever compared after [`Point::snap`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round to the nearest grid intersection.
    pub fn snap(&self) -> GridPoint {
        GridPoint {
            x: round_half_up(self.x),
            y: round_half_up(self.y),
        }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An exact integer grid intersection. Terminals sharing a `GridPoint`
/// share a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

// Halves round towards +inf, so -2.5 snaps to -2 and 2.5 snaps to 3.
pub(crate) fn round_half_up(v: f64) -> i64 {
    let r = v.floor();
    if v - r >= 0.5 {
        r as i64 + 1
    } else {
        r as i64
    }
}

/// Orientation of a component on the grid.
///
/// The second terminal sits `length` units away from the anchor along the
/// rotation's direction (y grows downwards, as on screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Parse a rotation in degrees. Any multiple of 90 is accepted and
    /// normalised into `[0, 360)`.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    pub fn degrees(&self) -> i64 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// The next rotation clockwise (`+90°`, wrapping at 360°).
    pub fn rotated(&self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    /// The opposite direction.
    pub fn reversed(&self) -> Self {
        self.rotated().rotated()
    }

    /// Unit step along this rotation's direction.
    pub fn direction(&self) -> (f64, f64) {
        match self {
            Self::Deg0 => (1.0, 0.0),
            Self::Deg90 => (0.0, 1.0),
            Self::Deg180 => (-1.0, 0.0),
            Self::Deg270 => (0.0, -1.0),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_half_up() {
        assert_eq!(Point::new(2.5, -2.5).snap(), GridPoint::new(3, -2));
        assert_eq!(Point::new(3.9999, 0.0001).snap(), GridPoint::new(4, 0));
        assert_eq!(Point::new(-0.4, -0.6).snap(), GridPoint::new(0, -1));
        // Just under a half.
        assert_eq!(Point::new(0.49999999999999994, -0.5).snap(), GridPoint::new(0, 0));
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(0), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn test_rotation_wraps() {
        assert_eq!(Rotation::Deg270.rotated(), Rotation::Deg0);
        assert_eq!(Rotation::Deg90.reversed(), Rotation::Deg270);
    }

    #[test]
    fn test_component_id_borrows_as_str() {
        let mut map = std::collections::HashMap::new();
        map.insert(ComponentId::from("R1"), 1);
        assert_eq!(map.get("R1"), Some(&1));
    }
}
