//! Board layout and the electrical graph derived from it.
//!
//! The [`Board`] holds the components as the editor placed them. A
//! [`Topology`] is built from that list by merging terminals that land on
//! the same grid intersection into a single [`NodeId`].

mod board;
mod topology;
mod types;
mod validate;

pub use board::Board;
pub use topology::{PinnedComponent, Topology};
pub use types::*;
pub use validate::{validate_board, validate_components};
