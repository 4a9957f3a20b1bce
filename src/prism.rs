//! Flat lattice objects that only spin as a whole, like a turntable.

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::geometry::{spin_point, Dims, Direction, Face, Point, PRISM_SNAP_DURATION, RIGHT_ANGLE};
use crate::grid::{self, Element};
use crate::movement::{EventLog, MoveEvent, MoveState, Settled};
use crate::Rotatable;

/// How a prism is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrismShape {
    /// A one-element-high grid of `width` × `depth` unit elements.
    Tessellated { width: usize, depth: usize },
    /// A single element standing in for the whole body.
    Slab,
}

impl PrismShape {
    pub fn dims(self) -> Dims {
        match self {
            PrismShape::Tessellated { width, depth } => (width, 1, depth),
            PrismShape::Slab => (1, 1, 1),
        }
    }
}

struct PrismState<M> {
    elements: Vec<Element<M>>,
    motion: MoveState<()>,
    /// Settled orientation, in positive quarter turns modulo 4.
    resting: u8,
    /// Live rotation of the move in flight.
    live: f64,
    events: EventLog,
}

/// A lattice that turns about its vertical axis as one body.
pub struct SingleAxisLattice<M> {
    shape: PrismShape,
    direction: Direction,
    extent: Point,
    state: Mutex<PrismState<M>>,
}

impl<M: Clone> SingleAxisLattice<M> {
    pub fn new(shape: PrismShape, extent: Point, fill: M) -> Result<Self> {
        let (width, _, depth) = shape.dims();
        if width == 0 || depth == 0 {
            return Err(Error::ZeroDimension);
        }
        if !extent.is_valid_extent() {
            return Err(Error::InvalidExtent(extent));
        }
        Ok(Self {
            shape,
            direction: Direction::Horizontal,
            extent,
            state: Mutex::new(PrismState {
                elements: grid::build_lattice(shape.dims(), &fill),
                motion: MoveState::Idle,
                resting: 0,
                live: 0.0,
                events: EventLog::default(),
            }),
        })
    }

    /// Textures one outer face, one image per element in storage order.
    pub fn apply_face_images(&self, face: Face, images: &[M]) -> usize {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let members = grid::face_members(&state.elements, self.shape.dims(), face);
        grid::paint(&mut state.elements, &members, face, images)
    }

    /// Wraps the four sides of the first element with up to four images,
    /// in front, right, back, left order.
    pub fn apply_images(&self, images: &[M]) -> usize {
        let mut state = self.state.lock();
        let sides = [Face::Front, Face::Right, Face::Back, Face::Left];
        let mut applied = 0;
        for (face, image) in sides.into_iter().zip(images) {
            state.elements[0].faces[face.slot()] = image.clone();
            applied += 1;
        }
        if applied < sides.len() {
            warn!(supplied = images.len(), "not enough images to wrap the prism");
        }
        applied
    }

    /// Puts one image on top of every element, in storage order.
    pub fn apply_top_images(&self, images: &[M]) -> Result<usize> {
        self.ensure_tessellated()?;
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let members: Vec<usize> = (0..state.elements.len()).collect();
        Ok(grid::paint(&mut state.elements, &members, Face::Top, images))
    }

    /// Runs one image sequence around the sides: the front layer, then left,
    /// right and back.
    pub fn apply_side_images(&self, images: &[M]) -> Result<usize> {
        self.ensure_tessellated()?;
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let dims = self.shape.dims();
        let mut remaining = images;
        let mut applied = 0;
        for face in [Face::Front, Face::Left, Face::Right, Face::Back] {
            let members = grid::face_members(&state.elements, dims, face);
            let take = members.len().min(remaining.len());
            applied += grid::paint(&mut state.elements, &members, face, &remaining[..take]);
            remaining = &remaining[take..];
        }
        Ok(applied)
    }

    pub fn elements(&self) -> Vec<Element<M>> {
        self.state.lock().elements.clone()
    }

    fn ensure_tessellated(&self) -> Result<()> {
        match self.shape {
            PrismShape::Tessellated { .. } => Ok(()),
            PrismShape::Slab => Err(Error::NotTessellated),
        }
    }
}

impl<M> SingleAxisLattice<M> {
    pub fn shape(&self) -> PrismShape {
        self.shape
    }

    pub fn extent(&self) -> Point {
        self.extent
    }

    pub fn is_moving(&self) -> bool {
        self.state.lock().motion.is_active()
    }

    pub fn cumulative_rotation(&self) -> Option<f64> {
        self.state
            .lock()
            .motion
            .active()
            .ok()
            .map(|active| active.cumulative)
    }

    /// Settled orientation in quarter turns, `0..4`.
    pub fn resting_quarter_turns(&self) -> u8 {
        self.state.lock().resting
    }

    /// Angle the body currently shows: the settled orientation plus any live turn.
    pub fn orientation(&self) -> f64 {
        let state = self.state.lock();
        state.resting as f64 * RIGHT_ANGLE + state.live
    }

    /// Where every element currently appears.
    pub fn element_centers(&self) -> Vec<[f64; 3]> {
        let state = self.state.lock();
        let angle = state.resting as f64 * RIGHT_ANGLE + state.live;
        state
            .elements
            .iter()
            .map(|element| spin_point(element.center(), self.direction, angle))
            .collect()
    }

    pub fn format(&self) -> String
    where
        M: std::fmt::Display,
    {
        grid::format_lattice(&self.state.lock().elements, self.shape.dims())
    }
}

impl<M: Send> Rotatable for SingleAxisLattice<M> {
    fn start_drag(&self, start: Point, _pos: Point) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.motion.begin(self.direction, (), start)?;
        debug!(direction = %self.direction, "grabbed prism");
        state.events.push(MoveEvent::Grabbed {
            direction: self.direction,
            slice: None,
            members: (0..state.elements.len()).collect(),
            scale: 1.0,
            duration: std::time::Duration::ZERO,
        });
        Ok(())
    }

    fn rotate(&self, pos: Point) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let increment = state.motion.advance(pos, self.extent)?;
        state.live += increment;
        trace!(increment, "turned prism");
        state.events.push(MoveEvent::Turned {
            direction: self.direction,
            radians: increment,
        });
        Ok(())
    }

    /// Snaps the whole body. The elements never leave the body, so nothing is re-homed.
    fn settle(&self) -> Result<Settled> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let (finished, outcome) = state.motion.finish()?;

        state.events.push(MoveEvent::Snapped {
            correction: outcome.correction,
            turn: outcome.turn,
            duration: PRISM_SNAP_DURATION,
        });
        // whole quarter turns already shown stay, the snap only finishes the last one
        let quarters = ((finished.cumulative + outcome.correction) / RIGHT_ANGLE).round() as i64;
        state.resting = (i64::from(state.resting) + quarters).rem_euclid(4) as u8;
        state.live = 0.0;

        debug!(
            turn = ?outcome.turn,
            correction = outcome.correction,
            resting = state.resting,
            "settled prism"
        );
        Ok(Settled {
            direction: finished.direction,
            turn: outcome.turn,
            correction: outcome.correction,
        })
    }

    fn drain_events(&self) -> Vec<MoveEvent> {
        self.state.lock().events.drain()
    }
}
