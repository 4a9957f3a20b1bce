//! Slice-rotation state machine for twisty-puzzle lattices.
//!
//! Provides lattice objects that turn in quarter-turn steps under a drag
//! gesture, and a router that hands each gesture to the object under it.

pub mod cube;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod movement;
pub mod prism;
pub mod router;

pub use cube::AxisLattice;
pub use error::{Error, Result};
pub use geometry::{Boundary, Direction, Face, Point, QuarterTurn};
pub use movement::{MoveEvent, Settled};
pub use prism::{PrismShape, SingleAxisLattice};
pub use router::{GestureRouter, Zone};

/// Trait that lets the router drive any lattice object without knowing its shape.
///
/// Points are in the object's local frame: x to the right from its left edge,
/// y up from its bottom edge. Each object holds at most one move in flight;
/// calls made out of order return an [`Error`] and change nothing.
pub trait Rotatable: Send + Sync {
    /// Begins a move. `start` is where the gesture began, `pos` where it is now.
    fn start_drag(&self, start: Point, pos: Point) -> Result<()>;
    /// Follows the drag to `pos`.
    fn rotate(&self, pos: Point) -> Result<()>;
    /// Snaps the move to the nearest quarter turn and ends it.
    fn settle(&self) -> Result<Settled>;
    /// Takes every event emitted since the last call.
    fn drain_events(&self) -> Vec<MoveEvent>;
}
