//! In-memory map surface.
//!
//! [`HeadlessMap`] implements the whole collaborator interface without
//! drawing anything: it records handle visuals, redraw requests, the draw
//! preview and the guide, so a host can mirror them into its own renderer
//! or a test can assert on them.

use std::collections::BTreeMap;

use geodraw_core::{
    GeoPoint, Geometry, HandleRef, HandleStyle, MapSurface, Point2D, PreviewStyle, Projection,
    Renderer, ShapeId,
};

/// A handle visual as last set by the editor
#[derive(Debug, Clone, PartialEq)]
pub struct HandleVisual {
    pub owner: Option<ShapeId>,
    pub position: GeoPoint,
    pub style: HandleStyle,
    pub opacity: f64,
}

/// Map surface that keeps all rendering state in memory
#[derive(Debug, Clone)]
pub struct HeadlessMap<P: Projection> {
    projection: P,
    zoom: f64,
    handles: BTreeMap<HandleRef, HandleVisual>,
    next_handle: u64,
    redraws: Vec<ShapeId>,
    preview: Option<(Geometry, PreviewStyle)>,
    guide: Vec<Point2D>,
    guide_style: PreviewStyle,
}

impl<P: Projection> HeadlessMap<P> {
    pub fn new(projection: P, zoom: f64) -> Self {
        Self {
            projection,
            zoom,
            handles: BTreeMap::new(),
            next_handle: 1,
            redraws: Vec::new(),
            preview: None,
            guide: Vec::new(),
            guide_style: PreviewStyle::Normal,
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn handle(&self, handle: HandleRef) -> Option<&HandleVisual> {
        self.handles.get(&handle)
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Handles belonging to `owner`, in creation order
    pub fn handles_of(&self, owner: Option<ShapeId>) -> Vec<HandleRef> {
        self.handles
            .iter()
            .filter(|(_, visual)| visual.owner == owner)
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Shapes that requested a redraw, oldest first
    pub fn redraws(&self) -> &[ShapeId] {
        &self.redraws
    }

    pub fn take_redraws(&mut self) -> Vec<ShapeId> {
        std::mem::take(&mut self.redraws)
    }

    pub fn preview(&self) -> Option<(&Geometry, PreviewStyle)> {
        self.preview.as_ref().map(|(geometry, style)| (geometry, *style))
    }

    pub fn guide(&self) -> &[Point2D] {
        &self.guide
    }

    pub fn guide_style(&self) -> PreviewStyle {
        self.guide_style
    }
}

impl<P: Projection> Projection for HeadlessMap<P> {
    fn project(&self, point: GeoPoint, zoom: f64) -> Point2D {
        self.projection.project(point, zoom)
    }

    fn unproject(&self, point: Point2D, zoom: f64) -> GeoPoint {
        self.projection.unproject(point, zoom)
    }

    fn distance_meters(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        self.projection.distance_meters(a, b)
    }
}

impl<P: Projection> Renderer for HeadlessMap<P> {
    fn request_redraw(&mut self, id: ShapeId) {
        self.redraws.push(id);
    }

    fn add_handle_visual(
        &mut self,
        owner: Option<ShapeId>,
        position: GeoPoint,
        style: HandleStyle,
    ) -> HandleRef {
        let handle = HandleRef(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(
            handle,
            HandleVisual {
                owner,
                position,
                style,
                opacity: 1.0,
            },
        );
        handle
    }

    fn move_handle_visual(&mut self, handle: HandleRef, position: GeoPoint) {
        if let Some(visual) = self.handles.get_mut(&handle) {
            visual.position = position;
        } else {
            tracing::warn!("Move of unknown {}", handle);
        }
    }

    fn remove_handle_visual(&mut self, handle: HandleRef) {
        if self.handles.remove(&handle).is_none() {
            tracing::warn!("Removal of unknown {}", handle);
        }
    }

    fn set_handle_opacity(&mut self, handle: HandleRef, opacity: f64) {
        if let Some(visual) = self.handles.get_mut(&handle) {
            visual.opacity = opacity;
        }
    }

    fn update_preview(&mut self, preview: Option<&Geometry>, style: PreviewStyle) {
        self.preview = preview.map(|geometry| (geometry.clone(), style));
    }

    fn update_guide(&mut self, dashes: &[Point2D], style: PreviewStyle) {
        self.guide = dashes.to_vec();
        self.guide_style = style;
    }
}

impl<P: Projection> MapSurface for HeadlessMap<P> {
    fn zoom(&self) -> f64 {
        self.zoom
    }
}
