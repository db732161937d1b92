//! Host map collaborator interface.
//!
//! The editing engine never renders anything itself. It converts between
//! geographic and pixel coordinates through [`Projection`] and drives handle
//! visuals, redraws and previews through [`Renderer`]. A host map implements
//! both and exposes its current zoom through [`MapSurface`].

use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_RADIUS_M, TILE_SIZE_PX};
use crate::geo::{GeoPoint, HandleRef, Point2D, ShapeId};
use crate::shape::Geometry;

/// Visual role of a handle, so the host can pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleStyle {
    /// Real vertex of a line shape
    Vertex,
    /// Midpoint handle that inserts a vertex when dragged
    Ghost,
    /// Handle that translates a whole shape
    Move,
    /// Corner or radius handle
    Resize,
    /// Draggable point shape
    Marker,
    /// Vertex placed during a draw session
    DrawVertex,
}

/// How an in-progress preview should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewStyle {
    #[default]
    Normal,
    /// Error colour, shown while an error indicator is active
    Error,
}

/// Geographic <-> pixel conversion and distance measurement.
pub trait Projection {
    /// Project a geographic point into pixel space at `zoom`.
    fn project(&self, point: GeoPoint, zoom: f64) -> Point2D;

    /// Inverse of [`Projection::project`].
    fn unproject(&self, point: Point2D, zoom: f64) -> GeoPoint;

    /// Distance between two geographic points, in metres.
    fn distance_meters(&self, a: GeoPoint, b: GeoPoint) -> f64;
}

/// Mutation interface for everything the host draws on behalf of the editor.
pub trait Renderer {
    /// The geometry of `id` changed and must be redrawn.
    fn request_redraw(&mut self, id: ShapeId);

    /// Create a handle visual. `owner` is `None` for draw-session handles
    /// that do not belong to a stored shape yet.
    fn add_handle_visual(
        &mut self,
        owner: Option<ShapeId>,
        position: GeoPoint,
        style: HandleStyle,
    ) -> HandleRef;

    fn move_handle_visual(&mut self, handle: HandleRef, position: GeoPoint);

    fn remove_handle_visual(&mut self, handle: HandleRef);

    fn set_handle_opacity(&mut self, handle: HandleRef, opacity: f64);

    /// Replace the in-progress draw preview. `None` clears it.
    fn update_preview(&mut self, preview: Option<&Geometry>, style: PreviewStyle);

    /// Replace the dashed guide from the last placed vertex to the pointer.
    /// An empty slice clears it.
    fn update_guide(&mut self, dashes: &[Point2D], style: PreviewStyle);
}

/// A map the editor is attached to: projection, renderer and current zoom.
pub trait MapSurface: Projection + Renderer {
    fn zoom(&self) -> f64;

    /// Project at the current zoom.
    fn to_pixels(&self, point: GeoPoint) -> Point2D {
        self.project(point, self.zoom())
    }

    /// Unproject at the current zoom.
    fn from_pixels(&self, point: Point2D) -> GeoPoint {
        self.unproject(point, self.zoom())
    }
}

/// Spherical Mercator (EPSG:3857) as used by tiled web maps.
///
/// The world is `256 * 2^zoom` pixels wide with the origin at the
/// north-west corner. Distances use the haversine formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalMercator;

impl SphericalMercator {
    /// Latitude limit of the square Mercator world.
    pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

    fn world_size(zoom: f64) -> f64 {
        TILE_SIZE_PX * 2f64.powf(zoom)
    }
}

impl Projection for SphericalMercator {
    fn project(&self, point: GeoPoint, zoom: f64) -> Point2D {
        let size = Self::world_size(zoom);
        let lat = point
            .lat
            .clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE)
            .to_radians();
        let x = (point.lng + 180.0) / 360.0;
        let y = 0.5 - (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln()
            / (2.0 * std::f64::consts::PI);
        Point2D::new(x * size, y * size)
    }

    fn unproject(&self, point: Point2D, zoom: f64) -> GeoPoint {
        let size = Self::world_size(zoom);
        let lng = point.x / size * 360.0 - 180.0;
        let n = std::f64::consts::PI * (1.0 - 2.0 * point.y / size);
        let lat = n.sinh().atan().to_degrees();
        GeoPoint::new(lat, lng)
    }

    fn distance_meters(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        let lat1 = a.lat.to_radians();
        let lat2 = b.lat.to_radians();
        let sin_dlat = ((b.lat - a.lat).to_radians() / 2.0).sin();
        let sin_dlng = ((b.lng - a.lng).to_radians() / 2.0).sin();
        let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
        2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
    }
}

/// Flat projection treating coordinates as planar metres.
///
/// `x = lng * 2^zoom`, `y = -lat * 2^zoom`, and distances are Euclidean in
/// coordinate units. Useful for floor plans and deterministic tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarProjection;

impl Projection for PlanarProjection {
    fn project(&self, point: GeoPoint, zoom: f64) -> Point2D {
        let scale = 2f64.powf(zoom);
        Point2D::new(point.lng * scale, -point.lat * scale)
    }

    fn unproject(&self, point: Point2D, zoom: f64) -> GeoPoint {
        let scale = 2f64.powf(zoom);
        GeoPoint::new(-point.y / scale, point.x / scale)
    }

    fn distance_meters(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        let dlat = b.lat - a.lat;
        let dlng = b.lng - a.lng;
        (dlat * dlat + dlng * dlng).sqrt()
    }
}
