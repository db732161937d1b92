//! Vertex editing for polylines and polygons.
//!
//! Every vertex gets a draggable handle. Every segment gets a ghost handle at
//! its projected midpoint; dragging or clicking a ghost inserts a vertex
//! there. Clicking a vertex deletes it unless the shape would drop below its
//! minimum vertex count.
//!
//! Handles are kept in vertex order, so `handles[i].index == i` after every
//! mutation. Ghosts are keyed by the pair of vertex handles they sit
//! between; after a structural change, ghosts whose pair no longer forms a
//! segment are removed and missing ones are created.

use geodraw_core::{
    Error, GeoPoint, HandleRef, HandleStyle, MapSurface, Point2D, Result, Shared, ShapeId,
};

use super::EditEvent;
use crate::model::ShapeModel;

/// A real vertex handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexHandle {
    pub visual: HandleRef,
    /// Index of the vertex this handle controls
    pub index: usize,
}

#[derive(Debug, Clone, Copy)]
struct GhostHandle {
    visual: HandleRef,
    left: HandleRef,
    right: HandleRef,
}

/// Editing session for one line shape
#[derive(Debug)]
pub struct VertexEditor {
    shape: Shared<ShapeModel>,
    id: ShapeId,
    closed: bool,
    handles: Vec<VertexHandle>,
    ghosts: Vec<GhostHandle>,
    ghost_opacity: f64,
}

impl VertexEditor {
    /// Build vertex and ghost handles for the shape's current vertices.
    pub fn attach(
        shape: Shared<ShapeModel>,
        surface: &mut dyn MapSurface,
        ghost_opacity: f64,
    ) -> Result<Self> {
        let (id, closed) = {
            let model = shape.borrow();
            model.vertices()?;
            (model.id(), model.is_closed())
        };

        let mut editor = Self {
            shape,
            id,
            closed,
            handles: Vec::new(),
            ghosts: Vec::new(),
            ghost_opacity,
        };
        editor.create_handles(surface)?;
        tracing::debug!(
            "Vertex editor attached to shape {} ({} vertices)",
            id,
            editor.handles.len()
        );
        Ok(editor)
    }

    pub fn shape_id(&self) -> ShapeId {
        self.id
    }

    /// Vertex handles in vertex order
    pub fn handles(&self) -> &[VertexHandle] {
        &self.handles
    }

    /// Ghost handles in segment order: ghost `i` sits between vertex `i`
    /// and vertex `i + 1` (wrapping to vertex 0 for closed shapes).
    pub fn ghost_handles(&self) -> Vec<HandleRef> {
        self.ghosts.iter().map(|ghost| ghost.visual).collect()
    }

    pub fn is_ghost(&self, handle: HandleRef) -> bool {
        self.ghosts.iter().any(|ghost| ghost.visual == handle)
    }

    pub fn owns_handle(&self, handle: HandleRef) -> bool {
        self.position_of(handle).is_some() || self.is_ghost(handle)
    }

    /// A ghost drag promotes it to a real vertex before the pointer moves.
    pub fn on_handle_drag_start(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        if self.is_ghost(handle) {
            self.promote_ghost(handle, surface)?;
            return Ok(vec![EditEvent::EditStart(self.id)]);
        }
        self.require_vertex(handle)?;
        Ok(Vec::new())
    }

    /// Move a vertex to `position`. Edit notification is deferred to drag
    /// end so a drag produces a single edit.
    pub fn on_handle_dragged(
        &mut self,
        handle: HandleRef,
        position: GeoPoint,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        let mut events = Vec::new();
        if self.is_ghost(handle) {
            self.promote_ghost(handle, surface)?;
            events.push(EditEvent::EditStart(self.id));
        }

        let index = self.require_vertex(handle)?;
        self.shape.borrow_mut().set_vertex(index, position)?;
        surface.move_handle_visual(handle, position);
        self.reposition_ghosts_around(handle, surface)?;
        surface.request_redraw(self.id);
        Ok(events)
    }

    pub fn on_handle_drag_end(&mut self, handle: HandleRef) -> Result<Vec<EditEvent>> {
        self.require_vertex(handle)?;
        self.shape.borrow_mut().mark_edited();
        Ok(vec![EditEvent::Edited(self.id)])
    }

    /// Clicking a vertex deletes it; clicking a ghost inserts it.
    pub fn on_handle_clicked(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        if self.is_ghost(handle) {
            self.promote_ghost(handle, surface)?;
            self.shape.borrow_mut().mark_edited();
            return Ok(vec![EditEvent::EditStart(self.id), EditEvent::Edited(self.id)]);
        }

        let position = self.require_vertex(handle)?;
        self.remove_vertex(position, surface)
    }

    /// Insert the ghost as a real vertex between its two neighbours and
    /// derive new ghosts on either side. Returns the new vertex index.
    pub fn promote_ghost(
        &mut self,
        ghost: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<usize> {
        let at = self
            .ghosts
            .iter()
            .position(|g| g.visual == ghost)
            .ok_or(Error::UnknownHandle(ghost))?;
        let promoted = self.ghosts.remove(at);

        let right = self
            .position_of(promoted.right)
            .ok_or(Error::UnknownHandle(promoted.right))?;
        // The closing segment of a polygon ends at vertex 0; its midpoint
        // goes after the last vertex.
        let index = if right == 0 { self.handles.len() } else { right };

        let position = self.midpoint_between(promoted.left, promoted.right, surface)?;
        self.shape
            .borrow_mut()
            .splice_vertices(index, 0, [position])?;
        self.handles.insert(
            index,
            VertexHandle {
                visual: promoted.visual,
                index,
            },
        );
        self.update_indexes(index + 1, 1);

        surface.move_handle_visual(promoted.visual, position);
        surface.set_handle_opacity(promoted.visual, 1.0);
        self.sync_ghosts(surface)?;
        surface.request_redraw(self.id);
        tracing::debug!("Inserted vertex {} into shape {}", index, self.id);
        Ok(index)
    }

    /// Shift the `index` of every handle from position `from` onwards.
    pub fn update_indexes(&mut self, from: usize, delta: isize) {
        for handle in self.handles.iter_mut().skip(from) {
            handle.index = handle.index.saturating_add_signed(delta);
        }
    }

    /// Translate every vertex by a pixel offset (whole-shape drag).
    pub fn translate_pixels(
        &mut self,
        delta: Point2D,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        let moved: Vec<GeoPoint> = self
            .shape
            .borrow()
            .vertices()?
            .iter()
            .map(|vertex| surface.from_pixels(surface.to_pixels(*vertex) + delta))
            .collect();

        for (handle, position) in self.handles.iter().zip(&moved) {
            surface.move_handle_visual(handle.visual, *position);
        }
        {
            let mut model = self.shape.borrow_mut();
            model.set_vertices(moved)?;
            model.mark_edited();
        }
        self.sync_ghosts(surface)?;
        surface.request_redraw(self.id);
        Ok(vec![EditEvent::Edited(self.id)])
    }

    /// Drop all handles and recreate them from the current vertices.
    pub fn rebuild(&mut self, surface: &mut dyn MapSurface) -> Result<()> {
        self.remove_visuals(surface);
        self.create_handles(surface)
    }

    pub fn detach(mut self, surface: &mut dyn MapSurface) {
        self.remove_visuals(surface);
        tracing::debug!("Vertex editor detached from shape {}", self.id);
    }

    fn create_handles(&mut self, surface: &mut dyn MapSurface) -> Result<()> {
        let vertices = self.shape.borrow().vertices()?.to_vec();
        self.handles = vertices
            .into_iter()
            .enumerate()
            .map(|(index, vertex)| VertexHandle {
                visual: surface.add_handle_visual(Some(self.id), vertex, HandleStyle::Vertex),
                index,
            })
            .collect();
        self.sync_ghosts(surface)
    }

    fn remove_visuals(&mut self, surface: &mut dyn MapSurface) {
        for handle in self.handles.drain(..) {
            surface.remove_handle_visual(handle.visual);
        }
        for ghost in self.ghosts.drain(..) {
            surface.remove_handle_visual(ghost.visual);
        }
    }

    fn remove_vertex(
        &mut self,
        position: usize,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        let (count, minimum) = {
            let model = self.shape.borrow();
            let line = model.geometry().as_line()?;
            (line.vertices.len(), line.min_vertices())
        };
        if count <= minimum {
            tracing::debug!(
                "Refusing to delete vertex {} of shape {}: {} vertices is the minimum",
                position,
                self.id,
                minimum
            );
            return Ok(Vec::new());
        }

        self.shape.borrow_mut().splice_vertices(position, 1, [])?;
        let removed = self.handles.remove(position);
        surface.remove_handle_visual(removed.visual);
        self.update_indexes(position, -1);
        self.sync_ghosts(surface)?;

        self.shape.borrow_mut().mark_edited();
        surface.request_redraw(self.id);
        tracing::debug!("Deleted vertex {} of shape {}", position, self.id);
        Ok(vec![EditEvent::Edited(self.id)])
    }

    fn position_of(&self, handle: HandleRef) -> Option<usize> {
        self.handles.iter().position(|h| h.visual == handle)
    }

    fn require_vertex(&self, handle: HandleRef) -> Result<usize> {
        self.position_of(handle).ok_or(Error::UnknownHandle(handle))
    }

    fn segments(&self) -> Vec<(HandleRef, HandleRef)> {
        let mut segments: Vec<(HandleRef, HandleRef)> = self
            .handles
            .windows(2)
            .map(|pair| (pair[0].visual, pair[1].visual))
            .collect();
        if self.closed && self.handles.len() > 2 {
            if let (Some(last), Some(first)) = (self.handles.last(), self.handles.first()) {
                segments.push((last.visual, first.visual));
            }
        }
        segments
    }

    fn midpoint_between(
        &self,
        left: HandleRef,
        right: HandleRef,
        surface: &dyn MapSurface,
    ) -> Result<GeoPoint> {
        let model = self.shape.borrow();
        let vertices = model.vertices()?;
        let vertex = |handle: HandleRef| {
            self.position_of(handle)
                .and_then(|at| vertices.get(at).copied())
                .ok_or(Error::UnknownHandle(handle))
        };
        let a = surface.to_pixels(vertex(left)?);
        let b = surface.to_pixels(vertex(right)?);
        Ok(surface.from_pixels(a.midpoint(&b)))
    }

    /// Make the ghost set match the current segments, reusing ghosts whose
    /// segment survived.
    fn sync_ghosts(&mut self, surface: &mut dyn MapSurface) -> Result<()> {
        let mut previous = std::mem::take(&mut self.ghosts);

        for (left, right) in self.segments() {
            let position = self.midpoint_between(left, right, surface)?;
            match previous
                .iter()
                .position(|g| g.left == left && g.right == right)
            {
                Some(at) => {
                    let ghost = previous.swap_remove(at);
                    surface.move_handle_visual(ghost.visual, position);
                    self.ghosts.push(ghost);
                }
                None => {
                    let visual =
                        surface.add_handle_visual(Some(self.id), position, HandleStyle::Ghost);
                    surface.set_handle_opacity(visual, self.ghost_opacity);
                    self.ghosts.push(GhostHandle {
                        visual,
                        left,
                        right,
                    });
                }
            }
        }

        for orphan in previous {
            surface.remove_handle_visual(orphan.visual);
        }
        Ok(())
    }

    fn reposition_ghosts_around(
        &self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<()> {
        for ghost in self
            .ghosts
            .iter()
            .filter(|g| g.left == handle || g.right == handle)
        {
            let position = self.midpoint_between(ghost.left, ghost.right, surface)?;
            surface.move_handle_visual(ghost.visual, position);
        }
        Ok(())
    }
}
