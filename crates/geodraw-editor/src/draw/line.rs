//! Click-to-place drawing of polylines and polygons.

use std::time::Instant;

use geodraw_core::{
    geodesic_area, guide_dashes, new_point_intersects, readable_area, readable_distance, GeoPoint,
    Geometry, GeometryError, HandleRef, HandleStyle, LineShape, MapSurface, Notifier, Point2D,
    PreviewStyle, ShapeKind,
};
use geodraw_settings::{DrawConfig, LineStrings, PolylineSettings};

use super::{DrawEvent, DrawInput, DrawSession, DrawState, DrawStep, Key, Tooltip, TransientError};

/// Draw session for a polyline or polygon.
///
/// Each click appends a vertex. A polyline finishes by clicking its last
/// vertex, a polygon by clicking its first one. With intersection checks
/// enabled, a click whose segment would cross an earlier segment is refused
/// and an error indicator is shown.
pub struct LineSession {
    kind: ShapeKind,
    settings: PolylineSettings,
    show_area: bool,
    strings: LineStrings,
    state: DrawState,
    vertices: Vec<GeoPoint>,
    handles: Vec<HandleRef>,
    /// Length of the placed path, in metres
    running_length: f64,
    cursor: Option<GeoPoint>,
    /// Distance from the last vertex to the pointer, in metres
    cursor_distance: f64,
    suppress_click: bool,
    error: TransientError,
    events: Notifier<DrawEvent>,
}

impl LineSession {
    pub fn polyline(config: &DrawConfig) -> Self {
        Self::new(
            ShapeKind::Polyline,
            config.polyline.clone(),
            false,
            config.strings.polyline.clone(),
        )
    }

    pub fn polygon(config: &DrawConfig) -> Self {
        Self::new(
            ShapeKind::Polygon,
            config.polygon.line.clone(),
            config.polygon.show_area,
            config.strings.polygon.clone(),
        )
    }

    fn new(
        kind: ShapeKind,
        settings: PolylineSettings,
        show_area: bool,
        strings: LineStrings,
    ) -> Self {
        let error = TransientError::new(settings.error.timeout());
        Self {
            kind,
            settings,
            show_area,
            strings,
            state: DrawState::Inactive,
            vertices: Vec::new(),
            handles: Vec::new(),
            running_length: 0.0,
            cursor: None,
            cursor_distance: 0.0,
            suppress_click: false,
            error,
            events: Notifier::new(),
        }
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Vertex handles placed so far, in order
    pub fn handles(&self) -> &[HandleRef] {
        &self.handles
    }

    /// Length of the placed path in metres, excluding the segment to the
    /// pointer
    pub fn running_length(&self) -> f64 {
        self.running_length
    }

    /// Area enclosed by the placed vertices, in square metres
    pub fn area(&self) -> f64 {
        geodesic_area(&self.vertices)
    }

    pub fn is_error_visible(&self) -> bool {
        self.error.is_visible()
    }

    /// The handle that completes the shape when clicked
    pub fn finish_handle(&self) -> Option<HandleRef> {
        match self.kind {
            ShapeKind::Polygon => self.handles.first().copied(),
            _ if self.handles.len() > 1 => self.handles.last().copied(),
            _ => None,
        }
    }

    /// Append a vertex unless it would make the path cross itself.
    pub fn add_vertex(
        &mut self,
        point: GeoPoint,
        surface: &mut dyn MapSurface,
        now: Instant,
    ) -> DrawStep {
        if !self.settings.allow_intersection && !self.vertices.is_empty() {
            let pixels = self.pixels(surface);
            if new_point_intersects(&pixels, surface.to_pixels(point), false) {
                let message = self.settings.error.message.clone();
                return self.reject(GeometryError::SelfIntersection, message, surface, now);
            }
        }

        if self.error.is_visible() {
            self.error.hide();
            self.events.publish(&DrawEvent::ErrorCleared);
        }

        self.vertices.push(point);
        self.handles
            .push(surface.add_handle_visual(None, point, HandleStyle::DrawVertex));
        self.update_running_length(point, true, surface);
        self.update_cursor_distance(surface);

        let index = self.vertices.len() - 1;
        self.state = DrawState::Placing(self.vertices.len());
        self.events.publish(&DrawEvent::VertexAdded {
            index,
            position: point,
        });
        self.redraw(surface);
        DrawStep::Updated
    }

    fn closed(&self) -> bool {
        self.kind == ShapeKind::Polygon
    }

    fn min_vertices(&self) -> usize {
        if self.closed() {
            3
        } else {
            2
        }
    }

    fn pixels(&self, surface: &dyn MapSurface) -> Vec<Point2D> {
        self.vertices.iter().map(|v| surface.to_pixels(*v)).collect()
    }

    fn preview_style(&self) -> PreviewStyle {
        if self.error.is_visible() {
            PreviewStyle::Error
        } else {
            PreviewStyle::Normal
        }
    }

    /// Adjust the running length by the segment ending at (added) or
    /// starting from (removed) `point`.
    fn update_running_length(&mut self, point: GeoPoint, added: bool, surface: &dyn MapSurface) {
        let count = self.vertices.len();
        if count <= 1 {
            self.running_length = 0.0;
            return;
        }

        let previous = if added { count - 2 } else { count - 1 };
        let distance = surface.distance_meters(point, self.vertices[previous]);
        if added {
            self.running_length += distance;
        } else {
            self.running_length -= distance;
        }
    }

    fn update_cursor_distance(&mut self, surface: &dyn MapSurface) {
        self.cursor_distance = match (self.vertices.last(), self.cursor) {
            (Some(last), Some(cursor)) => surface.distance_meters(*last, cursor),
            _ => 0.0,
        };
    }

    fn reject(
        &mut self,
        error: GeometryError,
        message: String,
        surface: &mut dyn MapSurface,
        now: Instant,
    ) -> DrawStep {
        tracing::debug!("{} draw rejected: {}", self.kind, error);
        self.error.show(message, now);
        self.events.publish(&DrawEvent::Error(error.clone()));
        self.redraw(surface);
        DrawStep::Rejected(error)
    }

    fn redraw(&self, surface: &mut dyn MapSurface) {
        let style = self.preview_style();
        if self.vertices.is_empty() {
            surface.update_preview(None, style);
        } else {
            let preview = Geometry::Line(LineShape {
                vertices: self.vertices.clone(),
                closed: self.closed(),
            });
            surface.update_preview(Some(&preview), style);
        }
        self.redraw_guide(surface);
    }

    fn redraw_guide(&self, surface: &mut dyn MapSurface) {
        let dashes = match (self.vertices.last(), self.cursor) {
            (Some(last), Some(cursor)) => guide_dashes(
                surface.to_pixels(*last),
                surface.to_pixels(cursor),
                self.settings.guideline_distance,
            ),
            _ => Vec::new(),
        };
        surface.update_guide(&dashes, self.preview_style());
    }

    /// Remove every visual and forget all placed vertices.
    fn clear(&mut self, surface: &mut dyn MapSurface) {
        for handle in self.handles.drain(..) {
            surface.remove_handle_visual(handle);
        }
        self.vertices.clear();
        self.running_length = 0.0;
        self.cursor_distance = 0.0;
        self.suppress_click = false;
        self.error.hide();
        surface.update_preview(None, PreviewStyle::Normal);
        surface.update_guide(&[], PreviewStyle::Normal);
    }

    fn stop(&mut self, surface: &mut dyn MapSurface, state: DrawState) {
        self.clear(surface);
        self.cursor = None;
        self.state = state;
        self.events.publish(&DrawEvent::DrawStop(self.kind));
        tracing::debug!("{} draw session stopped ({})", self.kind, state);
    }
}

impl DrawSession for LineSession {
    fn kind(&self) -> ShapeKind {
        self.kind
    }

    fn state(&self) -> DrawState {
        self.state
    }

    fn start(&mut self, surface: &mut dyn MapSurface) {
        self.clear(surface);
        self.state = DrawState::Placing(0);
        self.events.publish(&DrawEvent::DrawStart(self.kind));
        tracing::debug!("{} draw session started", self.kind);
    }

    fn on_input(
        &mut self,
        input: DrawInput,
        surface: &mut dyn MapSurface,
        now: Instant,
    ) -> DrawStep {
        if !self.state.is_active() {
            return DrawStep::Ignored;
        }

        match input {
            DrawInput::Click(point) => {
                if self.suppress_click {
                    self.suppress_click = false;
                    return DrawStep::Ignored;
                }
                self.add_vertex(point, surface, now)
            }
            DrawInput::HandleClicked(handle) if Some(handle) == self.finish_handle() => {
                self.finish(surface, now)
            }
            DrawInput::PointerMove(point) => {
                self.cursor = Some(point);
                self.update_cursor_distance(surface);
                self.redraw_guide(surface);
                DrawStep::Updated
            }
            DrawInput::Key(Key::Escape) => {
                self.cancel(surface);
                DrawStep::Cancelled
            }
            _ => DrawStep::Ignored,
        }
    }

    fn finish(&mut self, surface: &mut dyn MapSurface, now: Instant) -> DrawStep {
        if !self.state.is_active() {
            return DrawStep::Ignored;
        }

        let required = self.min_vertices();
        if self.vertices.len() < required {
            let error = GeometryError::TooFewVertices {
                required,
                actual: self.vertices.len(),
            };
            let message = error.to_string();
            return self.reject(error, message, surface, now);
        }

        if self.closed() && !self.settings.allow_intersection {
            let pixels = self.pixels(surface);
            if new_point_intersects(&pixels, pixels[0], true) {
                let message = self.settings.error.message.clone();
                return self.reject(GeometryError::SelfIntersection, message, surface, now);
            }
        }

        let geometry = Geometry::Line(LineShape {
            vertices: std::mem::take(&mut self.vertices),
            closed: self.closed(),
        });
        tracing::info!(
            "Finished {} with {} vertices",
            self.kind,
            self.handles.len()
        );
        self.events.publish(&DrawEvent::Created(geometry.clone()));

        if self.settings.repeat_mode {
            self.clear(surface);
            self.state = DrawState::Placing(0);
        } else {
            self.stop(surface, DrawState::Finished);
        }
        DrawStep::Finished(geometry)
    }

    fn cancel(&mut self, surface: &mut dyn MapSurface) {
        if self.state.is_active() {
            self.stop(surface, DrawState::Cancelled);
        }
    }

    fn delete_last_vertex(&mut self, surface: &mut dyn MapSurface) -> DrawStep {
        if !self.state.is_active() || self.vertices.is_empty() {
            return DrawStep::Ignored;
        }

        if self.vertices.len() == 1 {
            // Start over rather than keep an empty line around.
            self.clear(surface);
            self.state = DrawState::Placing(0);
            self.events.publish(&DrawEvent::VertexRemoved { index: 0 });
            return DrawStep::Updated;
        }

        let Some(removed) = self.vertices.pop() else {
            return DrawStep::Ignored;
        };
        if let Some(handle) = self.handles.pop() {
            surface.remove_handle_visual(handle);
        }
        self.update_running_length(removed, false, surface);
        self.update_cursor_distance(surface);

        let index = self.vertices.len();
        self.state = DrawState::Placing(index);
        self.events.publish(&DrawEvent::VertexRemoved { index });
        self.redraw(surface);
        DrawStep::Updated
    }

    fn tick(&mut self, surface: &mut dyn MapSurface, now: Instant) {
        if self.error.expire(now) {
            self.events.publish(&DrawEvent::ErrorCleared);
            self.redraw(surface);
        }
    }

    fn tooltip(&self) -> Tooltip {
        if let Some(message) = self.error.message() {
            return Tooltip::error(message);
        }

        let count = self.vertices.len();
        if count == 0 {
            return Tooltip::new(self.strings.start.clone());
        }

        match self.kind {
            ShapeKind::Polygon => {
                if count < 3 {
                    Tooltip::new(self.strings.cont.clone())
                } else {
                    let subtext = self
                        .show_area
                        .then(|| readable_area(self.area(), self.settings.units));
                    Tooltip::new(self.strings.end.clone()).with_subtext(subtext)
                }
            }
            _ => {
                let text = if count == 1 {
                    &self.strings.cont
                } else {
                    &self.strings.end
                };
                let subtext = self.settings.show_length.then(|| {
                    readable_distance(
                        self.running_length + self.cursor_distance,
                        self.settings.units,
                    )
                });
                Tooltip::new(text.clone()).with_subtext(subtext)
            }
        }
    }

    fn events_mut(&mut self) -> &mut Notifier<DrawEvent> {
        &mut self.events
    }

    fn suppress_next_click(&mut self) {
        self.suppress_click = true;
    }
}
