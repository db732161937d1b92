//! Shape geometry variants.
//!
//! A shape's geometry is a closed set of variants. Editors and draw sessions
//! match on [`Geometry`] rather than on a type hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GeometryError;
use crate::geo::GeoPoint;

/// Kind of a shape, used for dispatch and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Polyline,
    Polygon,
    Rectangle,
    Circle,
    Marker,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polyline => write!(f, "polyline"),
            Self::Polygon => write!(f, "polygon"),
            Self::Rectangle => write!(f, "rectangle"),
            Self::Circle => write!(f, "circle"),
            Self::Marker => write!(f, "marker"),
        }
    }
}

/// Ordered vertex list. `closed` distinguishes a polygon from a polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineShape {
    pub vertices: Vec<GeoPoint>,
    pub closed: bool,
}

impl LineShape {
    pub fn polyline(vertices: Vec<GeoPoint>) -> Self {
        Self {
            vertices,
            closed: false,
        }
    }

    pub fn polygon(vertices: Vec<GeoPoint>) -> Self {
        Self {
            vertices,
            closed: true,
        }
    }

    /// Smallest vertex count an edit may leave behind.
    pub fn min_vertices(&self) -> usize {
        if self.closed {
            3
        } else {
            2
        }
    }
}

/// Circle with a geographic center and a radius in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub center: GeoPoint,
    pub radius: f64,
}

impl CircleShape {
    pub fn new(center: GeoPoint, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Axis-aligned geographic rectangle given by two opposite corners.
///
/// The corners are stored as given; the accessors normalize them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsShape {
    pub corner1: GeoPoint,
    pub corner2: GeoPoint,
}

impl BoundsShape {
    pub fn new(corner1: GeoPoint, corner2: GeoPoint) -> Self {
        Self { corner1, corner2 }
    }

    pub fn north(&self) -> f64 {
        self.corner1.lat.max(self.corner2.lat)
    }

    pub fn south(&self) -> f64 {
        self.corner1.lat.min(self.corner2.lat)
    }

    pub fn east(&self) -> f64 {
        self.corner1.lng.max(self.corner2.lng)
    }

    pub fn west(&self) -> f64 {
        self.corner1.lng.min(self.corner2.lng)
    }

    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::new(self.south(), self.west())
    }

    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::new(self.north(), self.east())
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north() + self.south()) / 2.0,
            (self.east() + self.west()) / 2.0,
        )
    }

    /// Corners in the fixed order north-west, north-east, south-east,
    /// south-west. The corner opposite index `i` is `(i + 2) % 4`.
    pub fn corners(&self) -> [GeoPoint; 4] {
        [
            GeoPoint::new(self.north(), self.west()),
            GeoPoint::new(self.north(), self.east()),
            GeoPoint::new(self.south(), self.east()),
            GeoPoint::new(self.south(), self.west()),
        ]
    }
}

/// Single positioned marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointShape {
    pub position: GeoPoint,
}

impl PointShape {
    pub fn new(position: GeoPoint) -> Self {
        Self { position }
    }
}

/// Geometry of any shape the editor understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Line(LineShape),
    Circle(CircleShape),
    Bounds(BoundsShape),
    Point(PointShape),
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Line(line) if line.closed => ShapeKind::Polygon,
            Self::Line(_) => ShapeKind::Polyline,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Bounds(_) => ShapeKind::Rectangle,
            Self::Point(_) => ShapeKind::Marker,
        }
    }

    pub fn as_line(&self) -> Result<&LineShape, GeometryError> {
        match self {
            Self::Line(line) => Ok(line),
            other => Err(GeometryError::KindMismatch {
                expected: ShapeKind::Polyline,
                actual: other.kind(),
            }),
        }
    }

    pub fn as_line_mut(&mut self) -> Result<&mut LineShape, GeometryError> {
        let actual = self.kind();
        match self {
            Self::Line(line) => Ok(line),
            _ => Err(GeometryError::KindMismatch {
                expected: ShapeKind::Polyline,
                actual,
            }),
        }
    }

    /// Validates the geometry invariants of a finished shape.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Self::Line(line) if line.vertices.len() < line.min_vertices() => {
                Err(GeometryError::TooFewVertices {
                    required: line.min_vertices(),
                    actual: line.vertices.len(),
                })
            }
            _ => Ok(()),
        }
    }
}
