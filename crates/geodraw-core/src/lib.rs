//! # GeoDraw Core
//!
//! Core types, geometry math, and collaborator traits for GeoDraw.
//! Provides the value types shared by every editing component, the pure
//! geometry helpers (segment intersection, geodesic area, readable units),
//! and the projection/renderer interface the host map must implement.

pub mod constants;
pub mod error;
pub mod geo;
pub mod geometry;
pub mod notify;
pub mod projection;
pub mod shape;
pub mod types;
pub mod units;

pub use error::{Error, GeometryError, Result};
pub use geo::{GeoPoint, HandleRef, Point2D, ShapeId};
pub use geometry::{geodesic_area, guide_dashes, new_point_intersects, segments_intersect};
pub use notify::{Notifier, SubscriptionId};
pub use projection::{
    HandleStyle, MapSurface, PlanarProjection, PreviewStyle, Projection, Renderer,
    SphericalMercator,
};
pub use shape::{BoundsShape, CircleShape, Geometry, LineShape, PointShape, ShapeKind};
pub use types::{shared, Shared};
pub use units::{readable_area, readable_distance, MeasurementSystem};
