//! Per-object record of the move in flight, and the events a move emits.
//!
//! A lattice object owns exactly one [`MoveState`]. It is empty between moves,
//! filled by `start_drag`, advanced by every `rotate`, and emptied again by
//! `settle`. Calls made in the wrong state come back as protocol errors.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::warn;

use crate::error::{Error, Result};
use crate::geometry::{drag_increment, snap, Direction, Point, QuarterTurn, Snap};

/// Events kept per object before the oldest are dropped.
pub const EVENT_BACKLOG: usize = 512;

/// A move in flight.
///
/// `P` is the handle of whatever turns: a pivot for slice moves, `()` when the
/// whole body turns.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveMove<P> {
    pub direction: Direction,
    pub pivot: P,
    /// Last observed drag position, in the object's local frame.
    pub anchor: Point,
    /// Signed rotation accumulated since the move started.
    pub cumulative: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MoveState<P> {
    Idle,
    Active(ActiveMove<P>),
}

impl<P> Default for MoveState<P> {
    fn default() -> Self {
        MoveState::Idle
    }
}

impl<P> MoveState<P> {
    pub fn is_active(&self) -> bool {
        matches!(self, MoveState::Active(_))
    }

    /// Fails if a move is already in flight.
    pub fn ensure_idle(&self) -> Result<()> {
        match self {
            MoveState::Idle => Ok(()),
            MoveState::Active(_) => Err(Error::MoveInProgress),
        }
    }

    pub fn active(&self) -> Result<&ActiveMove<P>> {
        match self {
            MoveState::Active(active) => Ok(active),
            MoveState::Idle => Err(Error::NoActiveMove),
        }
    }

    /// Starts a move anchored at `anchor`.
    pub fn begin(&mut self, direction: Direction, pivot: P, anchor: Point) -> Result<()> {
        self.ensure_idle()?;
        *self = MoveState::Active(ActiveMove {
            direction,
            pivot,
            anchor,
            cumulative: 0.0,
        });
        Ok(())
    }

    /// Adds the rotation from the last anchor to `pos` and re-anchors there.
    ///
    /// Returns the increment, which the caller applies on top of whatever the
    /// turning part already shows.
    pub fn advance(&mut self, pos: Point, extent: Point) -> Result<f64> {
        let MoveState::Active(active) = self else {
            return Err(Error::NoActiveMove);
        };
        let increment = drag_increment(active.direction, active.anchor, pos, extent);
        active.cumulative += increment;
        active.anchor = pos;
        Ok(increment)
    }

    /// Ends the move, returning it with its snap outcome. The state is empty afterwards.
    pub fn finish(&mut self) -> Result<(ActiveMove<P>, Snap)> {
        match std::mem::replace(self, MoveState::Idle) {
            MoveState::Active(active) => {
                let outcome = snap(active.cumulative);
                Ok((active, outcome))
            }
            MoveState::Idle => Err(Error::NoActiveMove),
        }
    }
}

/// Result of a completed `settle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settled {
    pub direction: Direction,
    pub turn: QuarterTurn,
    /// Rotation that was still needed to reach `turn`.
    pub correction: f64,
}

/// Something a renderer should animate or mirror.
#[derive(Clone, Debug, PartialEq)]
pub enum MoveEvent {
    /// A slice (or the whole body) was picked up and shrunk by `scale`.
    Grabbed {
        direction: Direction,
        /// Row or column index; `None` when the whole body turns.
        slice: Option<usize>,
        members: Vec<usize>,
        scale: f64,
        duration: Duration,
    },
    /// Live rotation to add on top of the current orientation.
    Turned { direction: Direction, radians: f64 },
    /// Final correction, to be played over `duration`.
    Snapped {
        correction: f64,
        turn: QuarterTurn,
        duration: Duration,
    },
    /// Members were written back into the lattice frame.
    Rehomed { members: Vec<usize>, turn: QuarterTurn },
}

/// Bounded queue of pending [`MoveEvent`]s.
#[derive(Debug, Default)]
pub struct EventLog {
    events: VecDeque<MoveEvent>,
    dropped: usize,
}

impl EventLog {
    pub fn push(&mut self, event: MoveEvent) {
        if self.events.len() == EVENT_BACKLOG {
            self.events.pop_front();
            if self.dropped == 0 {
                warn!("move event backlog full, dropping oldest events");
            }
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<MoveEvent> {
        self.dropped = 0;
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RIGHT_ANGLE;

    const EXTENT: Point = Point::new(100.0, 100.0);

    #[test]
    fn test_new_state_is_idle() {
        let state: MoveState<()> = MoveState::default();
        assert!(!state.is_active());
        assert_eq!(state.active(), Err(Error::NoActiveMove));
    }

    #[test]
    fn test_begin_twice_is_a_protocol_error() {
        let mut state = MoveState::Idle;
        state.begin(Direction::Horizontal, 2usize, Point::new(1.0, 1.0)).unwrap();
        assert_eq!(
            state.begin(Direction::Vertical, 0, Point::default()),
            Err(Error::MoveInProgress)
        );
        // the first move is untouched
        let active = state.active().unwrap();
        assert_eq!(active.direction, Direction::Horizontal);
        assert_eq!(active.pivot, 2);
    }

    #[test]
    fn test_advance_without_move_fails() {
        let mut state: MoveState<()> = MoveState::Idle;
        assert_eq!(state.advance(Point::new(5.0, 5.0), EXTENT), Err(Error::NoActiveMove));
        assert!(matches!(state.finish(), Err(Error::NoActiveMove)));
    }

    #[test]
    fn test_advance_re_anchors_each_step() {
        let mut state = MoveState::Idle;
        state.begin(Direction::Horizontal, (), Point::new(0.0, 0.0)).unwrap();

        let first = state.advance(Point::new(25.0, 0.0), EXTENT).unwrap();
        let second = state.advance(Point::new(50.0, 0.0), EXTENT).unwrap();
        assert_eq!(first, RIGHT_ANGLE / 4.0);
        assert_eq!(second, RIGHT_ANGLE / 4.0);

        let active = state.active().unwrap();
        assert_eq!(active.anchor, Point::new(50.0, 0.0));
        assert_eq!(active.cumulative, first + second);
    }

    #[test]
    fn test_finish_resets_to_idle() {
        let mut state = MoveState::Idle;
        state.begin(Direction::Vertical, (), Point::new(0.0, 0.0)).unwrap();
        state.advance(Point::new(0.0, -80.0), EXTENT).unwrap();

        let (finished, outcome) = state.finish().unwrap();
        assert_eq!(finished.direction, Direction::Vertical);
        assert_eq!(outcome.turn, QuarterTurn::Forward);
        assert_eq!(state, MoveState::Idle);
    }

    #[test]
    fn test_event_log_keeps_newest_events() {
        let mut log = EventLog::default();
        for i in 0..EVENT_BACKLOG + 3 {
            log.push(MoveEvent::Turned {
                direction: Direction::Horizontal,
                radians: i as f64,
            });
        }
        let events = log.drain();
        assert_eq!(events.len(), EVENT_BACKLOG);
        assert_eq!(
            events[0],
            MoveEvent::Turned {
                direction: Direction::Horizontal,
                radians: 3.0
            }
        );
        assert!(log.drain().is_empty());
    }
}
