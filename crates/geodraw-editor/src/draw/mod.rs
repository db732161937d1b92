//! Interactive shape creation.
//!
//! A draw session turns a stream of pointer and key input into one finished
//! [`Geometry`] (or several, in repeat mode). All sessions share the
//! [`DrawSession`] lifecycle: `start`, `on_input`, `finish`, `cancel`.
//!
//! - [`LineSession`]: click to place vertices (polyline, polygon)
//! - [`SizingSession`]: anchor and size from a second point (rectangle, circle)
//! - [`MarkerSession`]: click to place a point

mod error_indicator;
mod line;
mod marker;
mod sizing;

pub use error_indicator::TransientError;
pub use line::LineSession;
pub use marker::MarkerSession;
pub use sizing::{BoundsSession, BoundsSizing, RadiusSession, RadiusSizing, Sizing, SizingSession};

use std::fmt;
use std::time::Instant;

use geodraw_core::{GeoPoint, Geometry, GeometryError, HandleRef, MapSurface, Notifier, ShapeKind};

/// Keys a draw session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Cancels the active session
    Escape,
    Other,
}

/// Pointer and key input, already resolved to geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawInput {
    Click(GeoPoint),
    PointerDown(GeoPoint),
    PointerMove(GeoPoint),
    PointerUp(GeoPoint),
    /// A click landed on a handle created by the session
    HandleClicked(HandleRef),
    Key(Key),
}

/// Outcome of feeding one input to a session
#[derive(Debug, Clone, PartialEq)]
pub enum DrawStep {
    /// The input meant nothing in the current state
    Ignored,
    /// Session state or preview changed
    Updated,
    /// The input was refused and an error indicator is showing
    Rejected(GeometryError),
    /// A shape was completed
    Finished(Geometry),
    /// The session was cancelled
    Cancelled,
}

/// Lifecycle state of a draw session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    /// Not started
    Inactive,
    /// Waiting for the first point of a sized shape or marker
    Idle,
    /// Placing vertices; holds the number placed so far
    Placing(usize),
    /// A sized shape is anchored and follows the pointer
    Dragging,
    Finished,
    Cancelled,
}

impl DrawState {
    /// Whether the session still accepts input
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Idle | Self::Placing(_) | Self::Dragging)
    }
}

impl fmt::Display for DrawState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Idle => write!(f, "idle"),
            Self::Placing(n) => write!(f, "placing({})", n),
            Self::Dragging => write!(f, "dragging"),
            Self::Finished => write!(f, "finished"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Notification emitted by draw sessions
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    DrawStart(ShapeKind),
    VertexAdded { index: usize, position: GeoPoint },
    VertexRemoved { index: usize },
    Created(Geometry),
    /// An error indicator was shown
    Error(GeometryError),
    /// The error indicator was hidden, by timeout or a valid action
    ErrorCleared,
    DrawStop(ShapeKind),
}

/// Tooltip content for the pointer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tooltip {
    pub text: String,
    pub subtext: Option<String>,
    /// Render in the error style
    pub is_error: bool,
}

impl Tooltip {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            subtext: None,
            is_error: false,
        }
    }

    pub fn with_subtext(mut self, subtext: Option<String>) -> Self {
        self.subtext = subtext;
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: message.into(),
            subtext: None,
            is_error: true,
        }
    }
}

/// Common lifecycle of all draw sessions.
///
/// `now` drives the transient error indicator; hosts pass the time of the
/// event and call [`DrawSession::tick`] from a timer.
pub trait DrawSession {
    fn kind(&self) -> ShapeKind;

    fn state(&self) -> DrawState;

    /// Activate the session and publish `DrawStart`.
    fn start(&mut self, surface: &mut dyn MapSurface);

    fn on_input(&mut self, input: DrawInput, surface: &mut dyn MapSurface, now: Instant)
        -> DrawStep;

    /// Complete the shape from the points placed so far.
    fn finish(&mut self, surface: &mut dyn MapSurface, now: Instant) -> DrawStep;

    /// Abandon the session, removing every visual it created.
    fn cancel(&mut self, surface: &mut dyn MapSurface);

    /// Undo the last placement step.
    fn delete_last_vertex(&mut self, surface: &mut dyn MapSurface) -> DrawStep;

    /// Hide an error indicator whose timeout has passed.
    fn tick(&mut self, surface: &mut dyn MapSurface, now: Instant);

    fn tooltip(&self) -> Tooltip;

    fn events_mut(&mut self) -> &mut Notifier<DrawEvent>;

    /// Ignore the next click, e.g. one synthesized at the end of a drag.
    fn suppress_next_click(&mut self) {}
}
