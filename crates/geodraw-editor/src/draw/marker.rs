use std::time::Instant;

use geodraw_core::{GeoPoint, Geometry, MapSurface, Notifier, PointShape, PreviewStyle, ShapeKind};
use geodraw_settings::DrawConfig;

use super::{DrawEvent, DrawInput, DrawSession, DrawState, DrawStep, Key, Tooltip};

/// Draw session that places a single point on click.
///
/// The preview follows the pointer until the click.
pub struct MarkerSession {
    repeat_mode: bool,
    start_text: String,
    state: DrawState,
    cursor: Option<GeoPoint>,
    suppress_click: bool,
    events: Notifier<DrawEvent>,
}

impl MarkerSession {
    pub fn new(config: &DrawConfig) -> Self {
        Self {
            repeat_mode: config.marker.repeat_mode,
            start_text: config.strings.marker_start.clone(),
            state: DrawState::Inactive,
            cursor: None,
            suppress_click: false,
            events: Notifier::new(),
        }
    }

    fn place(&mut self, position: GeoPoint, surface: &mut dyn MapSurface) -> DrawStep {
        let geometry = Geometry::Point(PointShape::new(position));
        tracing::info!("Placed marker at {}", position);
        self.events.publish(&DrawEvent::Created(geometry.clone()));

        if !self.repeat_mode {
            self.stop(surface, DrawState::Finished);
        }
        DrawStep::Finished(geometry)
    }

    fn stop(&mut self, surface: &mut dyn MapSurface, state: DrawState) {
        self.cursor = None;
        self.state = state;
        surface.update_preview(None, PreviewStyle::Normal);
        self.events.publish(&DrawEvent::DrawStop(ShapeKind::Marker));
    }
}

impl DrawSession for MarkerSession {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Marker
    }

    fn state(&self) -> DrawState {
        self.state
    }

    fn start(&mut self, surface: &mut dyn MapSurface) {
        self.cursor = None;
        self.suppress_click = false;
        self.state = DrawState::Idle;
        surface.update_preview(None, PreviewStyle::Normal);
        self.events.publish(&DrawEvent::DrawStart(ShapeKind::Marker));
        tracing::debug!("marker draw session started");
    }

    fn on_input(
        &mut self,
        input: DrawInput,
        surface: &mut dyn MapSurface,
        _now: Instant,
    ) -> DrawStep {
        if !self.state.is_active() {
            return DrawStep::Ignored;
        }

        match input {
            DrawInput::PointerMove(point) => {
                self.cursor = Some(point);
                let preview = Geometry::Point(PointShape::new(point));
                surface.update_preview(Some(&preview), PreviewStyle::Normal);
                DrawStep::Updated
            }
            DrawInput::Click(_) if self.suppress_click => {
                self.suppress_click = false;
                DrawStep::Ignored
            }
            DrawInput::Click(point) => self.place(point, surface),
            DrawInput::Key(Key::Escape) => {
                self.cancel(surface);
                DrawStep::Cancelled
            }
            _ => DrawStep::Ignored,
        }
    }

    /// Place the marker at the last pointer position, if any.
    fn finish(&mut self, surface: &mut dyn MapSurface, _now: Instant) -> DrawStep {
        match (self.state.is_active(), self.cursor) {
            (true, Some(point)) => self.place(point, surface),
            _ => DrawStep::Ignored,
        }
    }

    fn cancel(&mut self, surface: &mut dyn MapSurface) {
        if self.state.is_active() {
            self.stop(surface, DrawState::Cancelled);
        }
    }

    fn delete_last_vertex(&mut self, _surface: &mut dyn MapSurface) -> DrawStep {
        DrawStep::Ignored
    }

    fn tick(&mut self, _surface: &mut dyn MapSurface, _now: Instant) {}

    fn tooltip(&self) -> Tooltip {
        Tooltip::new(self.start_text.clone())
    }

    fn events_mut(&mut self) -> &mut Notifier<DrawEvent> {
        &mut self.events
    }

    fn suppress_next_click(&mut self) {
        self.suppress_click = true;
    }
}
