//! N×N×N lattice whose rows and columns turn independently.
//!
//! Every row and every column has a permanent pivot handle. Starting a drag
//! hands the elements of one row or column to its pivot, re-expressing their
//! positions relative to the pivot offset; the pivot then carries the live
//! rotation. Settling writes the elements back into the lattice frame with an
//! exact quarter-turn (or no turn) and cycles their side materials, so the
//! elements themselves are never rotated.

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::geometry::{
    centered, slice_index, spin_point, turn_coord, turn_faces, Dims, Direction, Face, Point,
    CUBE_SNAP_DURATION, FIT_SCALE, GRAB_DURATION, REFIT_SCALE,
};
use crate::grid::{self, Element, Owner, PivotId};
use crate::movement::{EventLog, MoveEvent, MoveState, Settled};
use crate::Rotatable;

/// A rotation handle for one row or column.
#[derive(Clone, Debug, PartialEq)]
pub struct PivotAxis {
    pub id: PivotId,
    /// Doubled coordinate of the slice along the pivot axis.
    pub offset: i32,
    /// Visual rotation currently shown, in radians.
    pub angle: f64,
    /// Visual scale currently shown.
    pub scale: f64,
}

impl PivotAxis {
    fn new(direction: Direction, index: usize, dim: usize) -> Self {
        Self {
            id: PivotId { direction, index },
            offset: centered(index, dim),
            angle: 0.0,
            scale: 1.0,
        }
    }
}

struct CubeState<M> {
    elements: Vec<Element<M>>,
    rows: Vec<PivotAxis>,
    columns: Vec<PivotAxis>,
    motion: MoveState<PivotId>,
    events: EventLog,
}

impl<M> CubeState<M> {
    fn pivot_mut(&mut self, id: PivotId) -> &mut PivotAxis {
        match id.direction {
            Direction::Horizontal => &mut self.rows[id.index],
            Direction::Vertical => &mut self.columns[id.index],
        }
    }

    fn pivot(&self, id: PivotId) -> &PivotAxis {
        match id.direction {
            Direction::Horizontal => &self.rows[id.index],
            Direction::Vertical => &self.columns[id.index],
        }
    }
}

/// A cube-shaped lattice with row and column moves.
pub struct AxisLattice<M> {
    dim: usize,
    extent: Point,
    state: Mutex<CubeState<M>>,
}

impl<M: Clone> AxisLattice<M> {
    /// Creates a `dim`-sized cube whose drags are measured against a local
    /// frame of size `extent`. Every face slot starts out as `fill`.
    pub fn new(dim: usize, extent: Point, fill: M) -> Result<Self> {
        if dim == 0 {
            return Err(Error::ZeroDimension);
        }
        if !extent.is_valid_extent() {
            return Err(Error::InvalidExtent(extent));
        }
        let rows = (0..dim)
            .map(|index| PivotAxis::new(Direction::Horizontal, index, dim))
            .collect();
        let columns = (0..dim)
            .map(|index| PivotAxis::new(Direction::Vertical, index, dim))
            .collect();
        Ok(Self {
            dim,
            extent,
            state: Mutex::new(CubeState {
                elements: grid::build_lattice((dim, dim, dim), &fill),
                rows,
                columns,
                motion: MoveState::Idle,
                events: EventLog::default(),
            }),
        })
    }

    /// Textures one outer face, one image per element in storage order.
    ///
    /// Returns how many elements received an image. Only allowed between moves.
    pub fn apply_face_images(&self, face: Face, images: &[M]) -> Result<usize> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.motion.ensure_idle()?;
        let members = grid::face_members(&state.elements, self.dims(), face);
        Ok(grid::paint(&mut state.elements, &members, face, images))
    }

    /// Copy of every element.
    pub fn elements(&self) -> Vec<Element<M>> {
        self.state.lock().elements.clone()
    }
}

impl<M> AxisLattice<M> {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn dims(&self) -> Dims {
        (self.dim, self.dim, self.dim)
    }

    pub fn extent(&self) -> Point {
        self.extent
    }

    pub fn is_moving(&self) -> bool {
        self.state.lock().motion.is_active()
    }

    /// Rotation accumulated by the move in flight.
    pub fn cumulative_rotation(&self) -> Option<f64> {
        self.state
            .lock()
            .motion
            .active()
            .ok()
            .map(|active| active.cumulative)
    }

    /// The pivot carrying the move in flight.
    pub fn active_pivot(&self) -> Option<PivotAxis> {
        let state = self.state.lock();
        let id = state.motion.active().ok()?.pivot;
        Some(state.pivot(id).clone())
    }

    pub fn pivot(&self, id: PivotId) -> Option<PivotAxis> {
        let state = self.state.lock();
        let pivots = match id.direction {
            Direction::Horizontal => &state.rows,
            Direction::Vertical => &state.columns,
        };
        pivots.get(id.index).cloned()
    }

    /// Where every element currently appears, live pivot rotation and scale included.
    pub fn element_centers(&self) -> Vec<[f64; 3]> {
        let state = self.state.lock();
        state
            .elements
            .iter()
            .map(|element| match element.owner {
                Owner::Permanent => element.center(),
                Owner::Pivot(id) => {
                    let pivot = state.pivot(id);
                    let axis = id.direction.pivot_axis() as usize;
                    let mut point = spin_point(element.center(), id.direction, pivot.angle)
                        .map(|value| value * pivot.scale);
                    point[axis] += pivot.offset as f64 / 2.0;
                    point
                }
            })
            .collect()
    }

    pub fn format(&self) -> String
    where
        M: std::fmt::Display,
    {
        grid::format_lattice(&self.state.lock().elements, self.dims())
    }
}

impl<M: Send> Rotatable for AxisLattice<M> {
    /// Picks the row or column under `start` and hands its elements to the pivot.
    ///
    /// A mostly sideways drag turns the row under `start.y`; anything else
    /// turns the column under `start.x`.
    fn start_drag(&self, start: Point, pos: Point) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.motion.ensure_idle()?;

        let direction = if (pos.x - start.x).abs() > (pos.y - start.y).abs() {
            Direction::Horizontal
        } else {
            Direction::Vertical
        };
        let index = match direction {
            Direction::Horizontal => slice_index(start.y, self.extent.y, self.dim),
            Direction::Vertical => slice_index(start.x, self.extent.x, self.dim),
        };
        let id = PivotId { direction, index };
        let axis = direction.pivot_axis();

        let pivot = state.pivot_mut(id);
        let offset = pivot.offset;
        pivot.scale *= FIT_SCALE;

        let mut members = Vec::with_capacity(self.dim * self.dim);
        for (element_index, element) in state.elements.iter_mut().enumerate() {
            if element.owner == Owner::Permanent && axis.get(element.position) == offset {
                element.owner = Owner::Pivot(id);
                axis.set(&mut element.position, 0);
                members.push(element_index);
            }
        }

        state.motion.begin(direction, id, start)?;
        debug!(pivot = %id, members = members.len(), "grabbed slice");
        state.events.push(MoveEvent::Grabbed {
            direction,
            slice: Some(index),
            members,
            scale: FIT_SCALE,
            duration: GRAB_DURATION,
        });
        Ok(())
    }

    fn rotate(&self, pos: Point) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let increment = state.motion.advance(pos, self.extent)?;
        let active = state.motion.active()?;
        let (id, direction) = (active.pivot, active.direction);

        state.pivot_mut(id).angle += increment;
        trace!(pivot = %id, increment, "turned slice");
        state.events.push(MoveEvent::Turned {
            direction,
            radians: increment,
        });
        Ok(())
    }

    /// Snaps the slice and writes its elements back into the lattice.
    fn settle(&self) -> Result<Settled> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let (finished, outcome) = state.motion.finish()?;
        let id = finished.pivot;
        let direction = finished.direction;

        let pivot = state.pivot_mut(id);
        pivot.angle += outcome.correction;
        pivot.scale *= REFIT_SCALE;
        let offset = pivot.offset;
        state.events.push(MoveEvent::Snapped {
            correction: outcome.correction,
            turn: outcome.turn,
            duration: CUBE_SNAP_DURATION,
        });

        let axis = direction.pivot_axis();
        let mut members = Vec::with_capacity(self.dim * self.dim);
        for (element_index, element) in state.elements.iter_mut().enumerate() {
            if element.owner != Owner::Pivot(id) {
                continue;
            }
            element.owner = Owner::Permanent;
            let shifted = axis.get(element.position) + offset;
            axis.set(&mut element.position, shifted);
            element.position = turn_coord(element.position, direction, outcome.turn);
            turn_faces(&mut element.faces, direction, outcome.turn);
            members.push(element_index);
        }

        let pivot = state.pivot_mut(id);
        pivot.angle = 0.0;
        pivot.scale = 1.0;

        debug!(
            pivot = %id,
            turn = ?outcome.turn,
            correction = outcome.correction,
            cumulative = finished.cumulative,
            "settled slice"
        );
        state.events.push(MoveEvent::Rehomed {
            members,
            turn: outcome.turn,
        });

        Ok(Settled {
            direction,
            turn: outcome.turn,
            correction: outcome.correction,
        })
    }

    fn drain_events(&self) -> Vec<MoveEvent> {
        self.state.lock().events.drain()
    }
}
