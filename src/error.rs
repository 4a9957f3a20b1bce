use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// `start_drag` was called while a move was still in flight.
    #[error("a move is already in progress")]
    MoveInProgress,

    /// `rotate` or `settle` was called with no move in flight.
    #[error("no move is in progress")]
    NoActiveMove,

    #[error("lattice dimensions must be at least 1")]
    ZeroDimension,

    #[error("drag frame must have a finite, positive size, got {0}")]
    InvalidExtent(crate::geometry::Point),

    #[error("zone has an empty extent: {0:?}")]
    EmptyZone(crate::geometry::Boundary),

    #[error("zones {first} and {second} overlap")]
    ZonesOverlap { first: usize, second: usize },

    #[error("{shape} cannot be textured with {texturing}")]
    TexturingMismatch { shape: String, texturing: String },

    #[error("the prism is a single slab, not a grid of elements")]
    NotTessellated,
}

pub type Result<T> = std::result::Result<T, Error>;
