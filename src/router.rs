//! Routes one screen-space drag gesture to the lattice object under it.
//!
//! The screen is split into fixed, non-overlapping zones, each owning one
//! [`Rotatable`]. A gesture that starts in a zone drives that zone's object
//! until it ends. If it wanders onto another object's zone or off the screen,
//! the object is settled immediately and the rest of the gesture is ignored, so a
//! single drag can never start a second move.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Boundary, Point};
use crate::Rotatable;

/// A screen region and the object it controls.
#[derive(Clone)]
pub struct Zone {
    pub boundary: Boundary,
    pub target: Arc<dyn Rotatable>,
}

impl Zone {
    pub fn new(boundary: Boundary, target: Arc<dyn Rotatable>) -> Self {
        Self { boundary, target }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tracking {
    Idle,
    /// Driving the object of the zone at this index.
    Tracking(usize),
    /// The gesture left its zone; wait for it to end.
    Suppressed,
}

pub struct GestureRouter {
    screen: Boundary,
    zones: Vec<Zone>,
    tracking: Tracking,
}

impl GestureRouter {
    /// Builds a router over `zones`, checked in order.
    ///
    /// Zones may share edges but not overlap; a point on a shared edge belongs
    /// to the earlier zone.
    pub fn new(screen: Boundary, zones: Vec<Zone>) -> Result<Self> {
        for (index, zone) in zones.iter().enumerate() {
            let extent = zone.boundary.extent();
            if extent.x <= 0.0 || extent.y <= 0.0 {
                return Err(Error::EmptyZone(zone.boundary));
            }
            if let Some(earlier) = zones[..index]
                .iter()
                .position(|other| other.boundary.overlaps(&zone.boundary))
            {
                return Err(Error::ZonesOverlap {
                    first: earlier,
                    second: index,
                });
            }
        }
        Ok(Self {
            screen,
            zones,
            tracking: Tracking::Idle,
        })
    }

    pub fn tracking(&self) -> Tracking {
        self.tracking
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Index of the zone under a screen point, if any.
    pub fn zone_at(&self, location: Point) -> Option<usize> {
        if !self.screen.contains(location) {
            return None;
        }
        self.zones
            .iter()
            .position(|zone| zone.boundary.contains(location))
    }

    /// Handles one drag update. `start` is where the gesture began, `location`
    /// where it is now, both in screen coordinates.
    pub fn on_changed(&mut self, start: Point, location: Point) -> Result<()> {
        let target = self.zone_at(location);
        match (self.tracking, target) {
            (Tracking::Suppressed, _) => Ok(()),
            (Tracking::Idle, None) => {
                debug!(%location, "gesture started outside every zone");
                self.tracking = Tracking::Suppressed;
                Ok(())
            }
            (Tracking::Idle, Some(index)) => {
                let zone = &self.zones[index];
                let local = zone.boundary.to_local(location);
                self.tracking = Tracking::Tracking(index);
                debug!(zone = index, "gesture started");
                zone.target
                    .start_drag(zone.boundary.to_local(start), local)?;
                zone.target.rotate(local)
            }
            (Tracking::Tracking(current), Some(index)) if self.same_target(current, index) => {
                // zones sharing one object hand the gesture over in the new zone's frame
                self.tracking = Tracking::Tracking(index);
                let zone = &self.zones[index];
                zone.target.rotate(zone.boundary.to_local(location))
            }
            (Tracking::Tracking(current), _) => {
                debug!(zone = current, ?target, "gesture left its zone, settling early");
                self.tracking = Tracking::Suppressed;
                self.zones[current].target.settle().map(|_| ())
            }
        }
    }

    /// Whether two zones drive the very same object.
    fn same_target(&self, first: usize, second: usize) -> bool {
        let address = |index: usize| Arc::as_ptr(&self.zones[index].target) as *const ();
        first == second || std::ptr::eq(address(first), address(second))
    }

    /// Handles the end of the gesture.
    pub fn on_ended(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.tracking, Tracking::Idle) {
            Tracking::Tracking(current) => {
                debug!(zone = current, "gesture ended");
                self.zones[current].target.settle().map(|_| ())
            }
            Tracking::Suppressed | Tracking::Idle => Ok(()),
        }
    }
}
