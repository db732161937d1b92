//! # GeoDraw
//!
//! An interactive drawing and editing engine for map shapes:
//! - Polylines and polygons placed vertex by vertex, with optional
//!   self-intersection checks
//! - Rectangles and circles sized from an anchor point
//! - Markers placed with a single click
//! - Edit mode with vertex, midpoint, move and resize handles, and
//!   batch save/cancel of every change
//!
//! ## Architecture
//!
//! GeoDraw is organized as a workspace with multiple crates:
//!
//! 1. **geodraw-core** - Value types, geometry math, units, error types and
//!    the map collaborator traits
//! 2. **geodraw-settings** - Draw/edit configuration and tooltip strings
//! 3. **geodraw-editor** - Draw sessions, shape editors, edit controller and
//!    toolbar
//! 4. **geodraw** - This crate; re-exports the public API and sets up
//!    logging
//!
//! The engine never renders. A host map implements
//! [`MapSurface`](geodraw_core::MapSurface) and feeds pointer input in;
//! [`HeadlessMap`] is an in-memory implementation for headless hosts and
//! tests.

pub use geodraw_core::{
    geodesic_area, guide_dashes, new_point_intersects, readable_area, readable_distance,
    segments_intersect, BoundsShape, CircleShape, Error, GeoPoint, Geometry, GeometryError,
    HandleRef, HandleStyle, LineShape, MapSurface, MeasurementSystem, Notifier, PlanarProjection,
    Point2D, PointShape, PreviewStyle, Projection, Renderer, Result, ShapeId, ShapeKind,
    SphericalMercator, SubscriptionId,
};

pub use geodraw_settings::{
    CircleSettings, DrawConfig, DrawErrorSettings, DrawStrings, EditSettings, MarkerSettings,
    PolygonSettings, PolylineSettings, RectangleSettings, SettingsError, SizingProfile,
};

pub use geodraw_editor::{
    BoundsSession, DrawEvent, DrawInput, DrawSession, DrawState, DrawStep, EditController,
    EditEvent, HandleVisual, HeadlessMap, Key, LineSession, MarkerSession, PointEditor,
    RadiusSession, SaveReport, ShapeEditor, ShapeModel, ShapePersistence, ShapeStore,
    SimpleShapeEditor, Toolbar, ToolbarAction, ToolbarMode, ToolbarOutcome, Tooltip, VertexEditor,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env()?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
