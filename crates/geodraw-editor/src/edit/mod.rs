//! Per-shape editing sessions.
//!
//! Each editable shape gets one editor while edit mode is active:
//! - [`VertexEditor`] for polylines and polygons
//! - [`SimpleShapeEditor`] for rectangles and circles
//! - [`PointEditor`] for markers
//!
//! Editors own their handle visuals and mutate the shared [`ShapeModel`]
//! in response to pointer events routed to them by handle reference.
//! They return the [`EditEvent`]s a mutation produced; the
//! [`EditController`](crate::EditController) publishes them.

mod point;
mod simple;
mod vertex;

pub use point::PointEditor;
pub use simple::SimpleShapeEditor;
pub use vertex::{VertexEditor, VertexHandle};

use geodraw_core::{GeoPoint, Geometry, HandleRef, MapSurface, Result, Shared, ShapeId};

use crate::model::ShapeModel;

/// Notification emitted by edit mode
#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    /// A drag that will change the shape has begun
    EditStart(ShapeId),
    /// The shape was changed and is now marked edited
    Edited(ShapeId),
    /// These shapes were persisted and their backups discarded
    Saved(Vec<ShapeId>),
    /// These shapes were permanently deleted
    Deleted(Vec<ShapeId>),
    /// These shapes were restored to their pre-edit state
    Reverted(Vec<ShapeId>),
    /// The host rejected a save or delete for this shape
    PersistenceFailed { id: ShapeId, reason: String },
}

/// Editor attached to one shape, chosen by geometry
#[derive(Debug)]
pub enum ShapeEditor {
    Vertex(VertexEditor),
    Simple(SimpleShapeEditor),
    Point(PointEditor),
}

impl ShapeEditor {
    /// Attach the editor matching the shape's geometry.
    pub fn attach(
        shape: Shared<ShapeModel>,
        surface: &mut dyn MapSurface,
        ghost_opacity: f64,
    ) -> Result<Self> {
        let geometry = shape.borrow().snapshot();
        Ok(match geometry {
            Geometry::Line(_) => Self::Vertex(VertexEditor::attach(shape, surface, ghost_opacity)?),
            Geometry::Circle(_) | Geometry::Bounds(_) => {
                Self::Simple(SimpleShapeEditor::attach(shape, surface)?)
            }
            Geometry::Point(_) => Self::Point(PointEditor::attach(shape, surface)?),
        })
    }

    pub fn shape_id(&self) -> ShapeId {
        match self {
            Self::Vertex(editor) => editor.shape_id(),
            Self::Simple(editor) => editor.shape_id(),
            Self::Point(editor) => editor.shape_id(),
        }
    }

    pub fn owns_handle(&self, handle: HandleRef) -> bool {
        match self {
            Self::Vertex(editor) => editor.owns_handle(handle),
            Self::Simple(editor) => editor.owns_handle(handle),
            Self::Point(editor) => editor.owns_handle(handle),
        }
    }

    pub fn on_drag_start(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        match self {
            Self::Vertex(editor) => editor.on_handle_drag_start(handle, surface),
            Self::Simple(editor) => editor.on_drag_start(handle, surface),
            Self::Point(editor) => editor.on_drag_start(handle),
        }
    }

    /// Pointer movement during a drag. Only a ghost handle's first movement
    /// produces events.
    pub fn on_drag(
        &mut self,
        handle: HandleRef,
        position: GeoPoint,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        match self {
            Self::Vertex(editor) => editor.on_handle_dragged(handle, position, surface),
            Self::Simple(editor) => editor.on_drag(handle, position, surface),
            Self::Point(editor) => editor.on_drag(handle, position, surface),
        }
    }

    pub fn on_drag_end(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        match self {
            Self::Vertex(editor) => editor.on_handle_drag_end(handle),
            Self::Simple(editor) => editor.on_drag_end(handle, surface),
            Self::Point(editor) => editor.on_drag_end(handle),
        }
    }

    /// Clicks only mean something to line editors: delete a vertex or
    /// insert one at a ghost.
    pub fn on_click(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        match self {
            Self::Vertex(editor) => editor.on_handle_clicked(handle, surface),
            Self::Simple(_) | Self::Point(_) => Ok(Vec::new()),
        }
    }

    /// Recreate all handles from the current geometry.
    pub fn rebuild(&mut self, surface: &mut dyn MapSurface) -> Result<()> {
        match self {
            Self::Vertex(editor) => editor.rebuild(surface),
            Self::Simple(editor) => editor.rebuild(surface),
            Self::Point(editor) => editor.rebuild(surface),
        }
    }

    pub fn detach(self, surface: &mut dyn MapSurface) {
        match self {
            Self::Vertex(editor) => editor.detach(surface),
            Self::Simple(editor) => editor.detach(surface),
            Self::Point(editor) => editor.detach(surface),
        }
    }
}
