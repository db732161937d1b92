//! In-memory shape model.
//!
//! A [`ShapeModel`] pairs a stable [`ShapeId`] with its [`Geometry`] and the
//! uncommitted-edit flag. It performs no validity checks of its own; the
//! editors and draw sessions decide what a legal mutation is.
//!
//! The model does not notify anyone when it changes. Whoever mutates a
//! shared model owns the change notification: after every geometry
//! mutation it must call
//! [`Renderer::request_redraw`](geodraw_core::Renderer::request_redraw) for
//! the shape's id. The editors and [`EditController`](crate::EditController)
//! follow this for every handle operation, translate, add, remove and
//! cancel.

use geodraw_core::{
    BoundsShape, CircleShape, GeoPoint, Geometry, GeometryError, Result, ShapeId, ShapeKind,
};
use serde::{Deserialize, Serialize};

/// A drawable shape with identity and edit state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeModel {
    id: ShapeId,
    geometry: Geometry,
    #[serde(skip)]
    edited: bool,
}

impl ShapeModel {
    pub fn new(id: ShapeId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            edited: false,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Whether the shape has uncommitted user mutations
    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn mark_edited(&mut self) {
        self.edited = true;
    }

    pub fn clear_edited(&mut self) {
        self.edited = false;
    }

    /// Deep copy of the current geometry, suitable as a backup
    pub fn snapshot(&self) -> Geometry {
        self.geometry.clone()
    }

    /// Replace the geometry with a previously taken snapshot
    pub fn restore(&mut self, snapshot: Geometry) {
        self.geometry = snapshot;
    }

    pub fn vertices(&self) -> Result<&[GeoPoint]> {
        Ok(&self.geometry.as_line()?.vertices)
    }

    pub fn is_closed(&self) -> bool {
        matches!(&self.geometry, Geometry::Line(line) if line.closed)
    }

    pub fn set_vertices(&mut self, vertices: Vec<GeoPoint>) -> Result<()> {
        self.geometry.as_line_mut()?.vertices = vertices;
        Ok(())
    }

    /// Overwrite a single vertex
    pub fn set_vertex(&mut self, index: usize, point: GeoPoint) -> Result<()> {
        let line = self.geometry.as_line_mut()?;
        let len = line.vertices.len();
        let slot = line
            .vertices
            .get_mut(index)
            .ok_or(GeometryError::TooFewVertices {
                required: index + 1,
                actual: len,
            })?;
        *slot = point;
        Ok(())
    }

    /// Remove `remove` vertices at `index` and insert `insert` in their
    /// place. Returns the removed vertices.
    pub fn splice_vertices<I>(
        &mut self,
        index: usize,
        remove: usize,
        insert: I,
    ) -> Result<Vec<GeoPoint>>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let line = self.geometry.as_line_mut()?;
        let len = line.vertices.len();
        if index > len || index + remove > len {
            return Err(GeometryError::TooFewVertices {
                required: index + remove,
                actual: len,
            }
            .into());
        }
        Ok(line
            .vertices
            .splice(index..index + remove, insert)
            .collect())
    }

    /// Center of a circle, or position of a point shape
    pub fn center(&self) -> Result<GeoPoint> {
        match &self.geometry {
            Geometry::Circle(circle) => Ok(circle.center),
            Geometry::Point(point) => Ok(point.position),
            Geometry::Bounds(bounds) => Ok(bounds.center()),
            other => Err(mismatch(ShapeKind::Circle, other)),
        }
    }

    pub fn set_center(&mut self, center: GeoPoint) -> Result<()> {
        match &mut self.geometry {
            Geometry::Circle(circle) => {
                circle.center = center;
                Ok(())
            }
            Geometry::Point(point) => {
                point.position = center;
                Ok(())
            }
            other => Err(mismatch(ShapeKind::Circle, other)),
        }
    }

    pub fn radius(&self) -> Result<f64> {
        Ok(self.circle()?.radius)
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        match &mut self.geometry {
            Geometry::Circle(circle) => {
                circle.radius = radius;
                Ok(())
            }
            other => Err(mismatch(ShapeKind::Circle, other)),
        }
    }

    pub fn circle(&self) -> Result<&CircleShape> {
        match &self.geometry {
            Geometry::Circle(circle) => Ok(circle),
            other => Err(mismatch(ShapeKind::Circle, other)),
        }
    }

    pub fn bounds(&self) -> Result<BoundsShape> {
        match &self.geometry {
            Geometry::Bounds(bounds) => Ok(*bounds),
            other => Err(mismatch(ShapeKind::Rectangle, other)),
        }
    }

    pub fn set_bounds(&mut self, bounds: BoundsShape) -> Result<()> {
        match &mut self.geometry {
            Geometry::Bounds(current) => {
                *current = bounds;
                Ok(())
            }
            other => Err(mismatch(ShapeKind::Rectangle, other)),
        }
    }

    pub fn position(&self) -> Result<GeoPoint> {
        match &self.geometry {
            Geometry::Point(point) => Ok(point.position),
            other => Err(mismatch(ShapeKind::Marker, other)),
        }
    }

    pub fn set_position(&mut self, position: GeoPoint) -> Result<()> {
        match &mut self.geometry {
            Geometry::Point(point) => {
                point.position = position;
                Ok(())
            }
            other => Err(mismatch(ShapeKind::Marker, other)),
        }
    }
}

fn mismatch(expected: ShapeKind, actual: &Geometry) -> geodraw_core::Error {
    GeometryError::KindMismatch {
        expected,
        actual: actual.kind(),
    }
    .into()
}
