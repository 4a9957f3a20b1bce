//! Geometric primitives shared by every lattice object.
//!
//! Lattice positions use doubled coordinates so that both odd (3x3x3) and even
//! (4x4x4) lattices stay on integers: an axis of size `dim` spans
//! `-(dim - 1) ..= dim - 1` in steps of 2, and the real coordinate is half the
//! stored value. Quarter turns are exact coordinate swaps and negations on
//! these integers, so no floating error ever accumulates in the lattice.

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::time::Duration;

/// One quarter turn, in radians.
pub const RIGHT_ANGLE: f64 = FRAC_PI_2;

/// Scale applied to a slice while it is grabbed.
pub const FIT_SCALE: f64 = 0.7;
/// Scale that undoes [`FIT_SCALE`] once the slice has snapped.
pub const REFIT_SCALE: f64 = 1.0 / FIT_SCALE;

/// Time the grab shrink animation takes.
pub const GRAB_DURATION: Duration = Duration::from_millis(100);
/// Time the refit animation takes after a cube slice snaps.
pub const REFIT_DURATION: Duration = Duration::from_millis(80);
/// Snap animation length for slices of an axis-rotating lattice.
pub const CUBE_SNAP_DURATION: Duration = Duration::from_millis(230);
/// Snap animation length for a whole single-axis body.
pub const PRISM_SNAP_DURATION: Duration = Duration::from_millis(300);

/// A lattice position in doubled coordinates.
pub type Coord = (i32, i32, i32);

/// Per-axis element counts of a lattice: `(x, y, z)`.
pub type Dims = (usize, usize, usize);

/// Doubled coordinate of the `index`-th cell along an axis of size `dim`.
#[inline(always)]
pub const fn centered(index: usize, dim: usize) -> i32 {
    2 * index as i32 - (dim as i32 - 1)
}

/// Doubled coordinate of the outermost cell on the positive side of an axis.
#[inline(always)]
pub const fn boundary(dim: usize) -> i32 {
    dim as i32 - 1
}

/// A 2D point in some local or screen frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether this can size a drag frame: both sides finite and positive.
    pub fn is_valid_extent(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x > 0.0 && self.y > 0.0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A closed axis-aligned screen rectangle.
///
/// Screen space grows downwards, so `top < bottom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Boundary {
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Whether `point` lies inside the rectangle, edges included.
    pub fn contains(&self, point: Point) -> bool {
        (self.left..=self.right).contains(&point.x) && (self.top..=self.bottom).contains(&point.y)
    }

    /// Width and height of the rectangle.
    pub fn extent(&self) -> Point {
        Point::new(self.right - self.left, self.bottom - self.top)
    }

    /// Maps a screen point into this rectangle's local frame, where y grows upwards.
    pub fn to_local(&self, screen: Point) -> Point {
        Point::new(screen.x - self.left, self.bottom - screen.y)
    }

    /// Whether the interiors of two rectangles intersect.
    ///
    /// Shared edges do not count: adjacent zones may touch.
    pub fn overlaps(&self, other: &Boundary) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// A lattice axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub fn get(self, coord: Coord) -> i32 {
        match self {
            Axis::X => coord.0,
            Axis::Y => coord.1,
            Axis::Z => coord.2,
        }
    }

    #[inline]
    pub fn set(self, coord: &mut Coord, value: i32) {
        match self {
            Axis::X => coord.0 = value,
            Axis::Y => coord.1 = value,
            Axis::Z => coord.2 = value,
        }
    }

    /// Element count along this axis.
    #[inline]
    pub fn size(self, dims: Dims) -> usize {
        match self {
            Axis::X => dims.0,
            Axis::Y => dims.1,
            Axis::Z => dims.2,
        }
    }
}

/// Which way a move turns a slice.
///
/// `Horizontal` turns a row about the vertical (y) axis and is driven by
/// x-drags; `Vertical` turns a column about the x axis and is driven by
/// y-drags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// The axis the slice turns about. Slice members share this coordinate.
    pub fn pivot_axis(self) -> Axis {
        match self {
            Direction::Horizontal => Axis::Y,
            Direction::Vertical => Axis::X,
        }
    }

    /// Face slots cycled by a positive quarter turn, each moving to the next.
    fn face_ring(self) -> [Face; 4] {
        match self {
            Direction::Horizontal => [Face::Front, Face::Right, Face::Back, Face::Left],
            Direction::Vertical => [Face::Front, Face::Bottom, Face::Back, Face::Top],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Horizontal => f.write_str("row"),
            Direction::Vertical => f.write_str("column"),
        }
    }
}

/// The six face-material slots of an element, in slot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Right,
    Back,
    Left,
    Top,
    Bottom,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Right,
        Face::Back,
        Face::Left,
        Face::Top,
        Face::Bottom,
    ];

    /// Slot index of this face in an element's material array.
    #[inline]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// The axis this face is perpendicular to, and which end of it.
    pub fn normal(self) -> (Axis, i32) {
        match self {
            Face::Front => (Axis::Z, 1),
            Face::Back => (Axis::Z, -1),
            Face::Right => (Axis::X, 1),
            Face::Left => (Axis::X, -1),
            Face::Top => (Axis::Y, 1),
            Face::Bottom => (Axis::Y, -1),
        }
    }

    /// Doubled coordinate, along [`Face::normal`], of the outer layer of a lattice.
    pub fn layer(self, dims: Dims) -> i32 {
        let (axis, sign) = self.normal();
        sign * boundary(axis.size(dims))
    }

    /// Whether `coord` sits on the outer layer this face covers.
    #[inline]
    pub fn covers(self, coord: Coord, dims: Dims) -> bool {
        self.normal().0.get(coord) == self.layer(dims)
    }

    /// In-face column and row axes as seen from outside, each with a sign.
    ///
    /// Columns grow left to right and rows grow bottom to top.
    pub(crate) fn plane(self) -> ((Axis, i32), (Axis, i32)) {
        match self {
            Face::Front => ((Axis::X, 1), (Axis::Y, 1)),
            Face::Right => ((Axis::Z, -1), (Axis::Y, 1)),
            Face::Back => ((Axis::X, -1), (Axis::Y, 1)),
            Face::Left => ((Axis::Z, 1), (Axis::Y, 1)),
            Face::Top => ((Axis::X, 1), (Axis::Z, -1)),
            Face::Bottom => ((Axis::X, 1), (Axis::Z, 1)),
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Face::Front => "front",
            Face::Right => "right",
            Face::Back => "back",
            Face::Left => "left",
            Face::Top => "top",
            Face::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// A settled rotation: no turn, or one quarter turn either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuarterTurn {
    Backward,
    Rest,
    Forward,
}

impl QuarterTurn {
    /// Signed angle of the turn: one of `-π/2`, `0`, `π/2`.
    pub fn radians(self) -> f64 {
        match self {
            QuarterTurn::Backward => -RIGHT_ANGLE,
            QuarterTurn::Rest => 0.0,
            QuarterTurn::Forward => RIGHT_ANGLE,
        }
    }

    /// Exact cosine and sine of the turn angle.
    #[inline]
    pub const fn cos_sin(self) -> (i32, i32) {
        match self {
            QuarterTurn::Backward => (0, -1),
            QuarterTurn::Rest => (1, 0),
            QuarterTurn::Forward => (0, 1),
        }
    }
}

/// Outcome of snapping an in-progress rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snap {
    /// Extra rotation that brings the slice onto the settled angle.
    pub correction: f64,
    /// The settled angle.
    pub turn: QuarterTurn,
}

/// Snaps an accumulated rotation to a quarter turn or back to rest.
///
/// Only the remainder modulo a quarter turn counts: at least half a quarter
/// turn completes the turn in the direction of travel, anything less springs
/// back.
pub fn snap(cumulative: f64) -> Snap {
    let remainder = cumulative % RIGHT_ANGLE;
    let half = RIGHT_ANGLE / 2.0;

    let (correction, turn) = if remainder >= 0.0 {
        if remainder >= half {
            (RIGHT_ANGLE - remainder, QuarterTurn::Forward)
        } else {
            (-remainder, QuarterTurn::Rest)
        }
    } else if remainder.abs() >= half {
        (remainder.abs() - RIGHT_ANGLE, QuarterTurn::Backward)
    } else {
        (remainder.abs(), QuarterTurn::Rest)
    };

    debug_assert!(
        (remainder + correction - turn.radians()).abs() < 1e-9,
        "snap of {cumulative} left the slice between quarter turns"
    );

    Snap { correction, turn }
}

/// Signed rotation produced by dragging from `anchor` to `pos` in a frame of size `extent`.
///
/// A full frame width of x-drag is a positive quarter turn. A full frame
/// height of y-drag is a negative one.
#[inline]
pub fn drag_increment(direction: Direction, anchor: Point, pos: Point, extent: Point) -> f64 {
    match direction {
        Direction::Horizontal => (pos.x - anchor.x) / extent.x * RIGHT_ANGLE,
        Direction::Vertical => -((pos.y - anchor.y) / extent.y * RIGHT_ANGLE),
    }
}

/// Index of the slice under a local coordinate, clamped to the lattice.
#[inline]
pub fn slice_index(coord: f64, extent: f64, dim: usize) -> usize {
    let cell = (coord / (extent / dim as f64)).floor();
    if cell <= 0.0 {
        0
    } else {
        (cell as usize).min(dim - 1)
    }
}

/// Rotates a pivot-relative position by a settled quarter turn.
pub fn turn_coord(coord: Coord, direction: Direction, turn: QuarterTurn) -> Coord {
    let (x, y, z) = coord;
    let (cos, sin) = turn.cos_sin();
    match direction {
        Direction::Horizontal => (x * cos + z * sin, y, -x * sin + z * cos),
        Direction::Vertical => (x, y * cos - z * sin, y * sin + z * cos),
    }
}

/// Moves the side materials one step around the turn, leaving the two faces
/// on the turn axis alone.
pub fn turn_faces<M>(faces: &mut [M; 6], direction: Direction, turn: QuarterTurn) {
    let ring = direction.face_ring();
    let order = match turn {
        QuarterTurn::Rest => return,
        QuarterTurn::Forward => [ring[1], ring[2], ring[3]],
        QuarterTurn::Backward => [ring[3], ring[2], ring[1]],
    };
    for face in order {
        faces.swap(ring[0].slot(), face.slot());
    }
}

/// Visual position of a pivot-relative point after rotating it by `angle`
/// about the pivot axis.
pub fn spin_point(point: [f64; 3], direction: Direction, angle: f64) -> [f64; 3] {
    let [x, y, z] = point;
    let (sin, cos) = angle.sin_cos();
    match direction {
        Direction::Horizontal => [x * cos + z * sin, y, -x * sin + z * cos],
        Direction::Vertical => [x, y * cos - z * sin, y * sin + z * cos],
    }
}
