//! Error handling for GeoDraw
//!
//! Provides the error types for all editing layers:
//! - Geometry errors (invalid shapes, self-intersections)
//! - Persistence failures reported by the host
//! - Precondition violations detected at construction time
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::geo::{HandleRef, ShapeId};
use crate::shape::ShapeKind;

/// Geometry validity error type
///
/// Raised when a mutation would leave a shape invalid. These errors are
/// recovered locally by the session that produced them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Not enough vertices to finish or keep the shape
    #[error("Shape needs at least {required} vertices, has {actual}")]
    TooFewVertices {
        /// Minimum number of vertices required.
        required: usize,
        /// Number of vertices present.
        actual: usize,
    },

    /// A new segment would cross an existing one
    #[error("Shape edges cannot cross")]
    SelfIntersection,

    /// An operation was applied to the wrong kind of shape
    #[error("Expected a {expected} shape, found {actual}")]
    KindMismatch {
        /// The shape kind the operation requires.
        expected: ShapeKind,
        /// The shape kind that was found.
        actual: ShapeKind,
    },
}

/// Main error type for GeoDraw
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid shape geometry
    #[error("Invalid shape geometry: {0}")]
    InvalidShapeGeometry(#[from] GeometryError),

    /// The host rejected a save or delete
    #[error("Failed to persist shape {id}: {reason}")]
    PersistenceFailure {
        /// The shape that failed to persist.
        id: ShapeId,
        /// The reason reported by the host.
        reason: String,
    },

    /// A component was constructed or used without what it requires
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// No shape with this id in the collection
    #[error("Unknown shape {0}")]
    UnknownShape(ShapeId),

    /// No handle with this reference in the editor
    #[error("Unknown handle {0}")]
    UnknownHandle(HandleRef),
}

impl Error {
    /// Create a precondition violation error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionViolation(msg.into())
    }

    /// Whether the error is local to a session and must not escape it
    pub fn is_geometry(&self) -> bool {
        matches!(self, Self::InvalidShapeGeometry(_))
    }
}

/// Result type for GeoDraw operations
pub type Result<T> = std::result::Result<T, Error>;
