//! Anchor-and-size drawing of rectangles and circles.
//!
//! Two interaction profiles are supported, chosen per tool in the
//! configuration:
//! - [`SizingProfile::TwoClick`]: click to anchor, move, click again to finish
//! - [`SizingProfile::Drag`]: press to anchor, drag, release to finish

use std::time::Instant;

use geodraw_core::{
    readable_distance, BoundsShape, CircleShape, GeoPoint, Geometry, MapSurface,
    MeasurementSystem, Notifier, PreviewStyle, ShapeKind,
};
use geodraw_settings::{DrawConfig, SizingProfile};

use super::{DrawEvent, DrawInput, DrawSession, DrawState, DrawStep, Key, Tooltip};

/// How a sized shape is derived from its anchor and the pointer
pub trait Sizing {
    fn kind(&self) -> ShapeKind;

    fn preview(&self, anchor: GeoPoint, point: GeoPoint, surface: &dyn MapSurface) -> Geometry;

    /// Measurement shown under the tooltip while sizing
    fn subtext(&self, _preview: &Geometry) -> Option<String> {
        None
    }
}

/// Rectangle spanned by the anchor and the pointer
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsSizing;

impl Sizing for BoundsSizing {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
    }

    fn preview(&self, anchor: GeoPoint, point: GeoPoint, _surface: &dyn MapSurface) -> Geometry {
        Geometry::Bounds(BoundsShape::new(anchor, point))
    }
}

/// Circle centred on the anchor, passing through the pointer
#[derive(Debug, Clone)]
pub struct RadiusSizing {
    pub show_radius: bool,
    pub units: MeasurementSystem,
    pub label: String,
}

impl Sizing for RadiusSizing {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn preview(&self, anchor: GeoPoint, point: GeoPoint, surface: &dyn MapSurface) -> Geometry {
        Geometry::Circle(CircleShape::new(anchor, surface.distance_meters(anchor, point)))
    }

    fn subtext(&self, preview: &Geometry) -> Option<String> {
        match preview {
            Geometry::Circle(circle) if self.show_radius => Some(format!(
                "{}: {}",
                self.label,
                readable_distance(circle.radius, self.units)
            )),
            _ => None,
        }
    }
}

/// Draw session for a shape sized from an anchor point
pub struct SizingSession<S: Sizing> {
    sizing: S,
    profile: SizingProfile,
    repeat_mode: bool,
    start_text: String,
    end_text: String,
    state: DrawState,
    anchor: Option<GeoPoint>,
    preview: Option<Geometry>,
    events: Notifier<DrawEvent>,
}

pub type BoundsSession = SizingSession<BoundsSizing>;
pub type RadiusSession = SizingSession<RadiusSizing>;

impl SizingSession<BoundsSizing> {
    pub fn rectangle(config: &DrawConfig) -> Self {
        Self::new(
            BoundsSizing,
            config.rectangle.profile,
            config.rectangle.repeat_mode,
            config.strings.rectangle_start.clone(),
            config.strings.simple_shape_end.clone(),
        )
    }
}

impl SizingSession<RadiusSizing> {
    pub fn circle(config: &DrawConfig) -> Self {
        let sizing = RadiusSizing {
            show_radius: config.circle.show_radius,
            units: config.circle.units,
            label: config.strings.radius_label.clone(),
        };
        Self::new(
            sizing,
            config.circle.profile,
            config.circle.repeat_mode,
            config.strings.circle_start.clone(),
            config.strings.simple_shape_end.clone(),
        )
    }
}

impl<S: Sizing> SizingSession<S> {
    pub fn new(
        sizing: S,
        profile: SizingProfile,
        repeat_mode: bool,
        start_text: String,
        end_text: String,
    ) -> Self {
        Self {
            sizing,
            profile,
            repeat_mode,
            start_text,
            end_text,
            state: DrawState::Inactive,
            anchor: None,
            preview: None,
            events: Notifier::new(),
        }
    }

    pub fn profile(&self) -> SizingProfile {
        self.profile
    }

    pub fn anchor(&self) -> Option<GeoPoint> {
        self.anchor
    }

    /// The shape that would be created right now
    pub fn preview(&self) -> Option<&Geometry> {
        self.preview.as_ref()
    }

    fn begin(&mut self, anchor: GeoPoint) -> DrawStep {
        self.anchor = Some(anchor);
        self.preview = None;
        self.state = DrawState::Dragging;
        DrawStep::Updated
    }

    fn resize(&mut self, point: GeoPoint, surface: &mut dyn MapSurface) -> DrawStep {
        let Some(anchor) = self.anchor else {
            return DrawStep::Ignored;
        };
        let preview = self.sizing.preview(anchor, point, surface);
        surface.update_preview(Some(&preview), PreviewStyle::Normal);
        self.preview = Some(preview);
        DrawStep::Updated
    }

    /// Complete the shape at `point` if a preview exists; otherwise drop the
    /// anchor. In the two-click profile a second click without any movement
    /// ends the session.
    fn complete_at(&mut self, point: GeoPoint, surface: &mut dyn MapSurface) -> DrawStep {
        if self.preview.is_some() {
            self.resize(point, surface);
            return self.create(surface);
        }

        match self.profile {
            SizingProfile::Drag => {
                self.reset(surface);
                DrawStep::Updated
            }
            SizingProfile::TwoClick if self.repeat_mode => {
                self.reset(surface);
                DrawStep::Updated
            }
            SizingProfile::TwoClick => {
                self.cancel(surface);
                DrawStep::Cancelled
            }
        }
    }

    fn create(&mut self, surface: &mut dyn MapSurface) -> DrawStep {
        let Some(geometry) = self.preview.take() else {
            return DrawStep::Ignored;
        };
        tracing::info!("Finished {}", self.sizing.kind());
        self.events.publish(&DrawEvent::Created(geometry.clone()));

        if self.repeat_mode {
            self.reset(surface);
        } else {
            self.stop(surface, DrawState::Finished);
        }
        DrawStep::Finished(geometry)
    }

    /// Back to waiting for an anchor.
    fn reset(&mut self, surface: &mut dyn MapSurface) {
        self.anchor = None;
        self.preview = None;
        self.state = DrawState::Idle;
        surface.update_preview(None, PreviewStyle::Normal);
    }

    fn stop(&mut self, surface: &mut dyn MapSurface, state: DrawState) {
        self.reset(surface);
        self.state = state;
        self.events.publish(&DrawEvent::DrawStop(self.sizing.kind()));
        tracing::debug!("{} draw session stopped ({})", self.sizing.kind(), state);
    }
}

impl<S: Sizing> DrawSession for SizingSession<S> {
    fn kind(&self) -> ShapeKind {
        self.sizing.kind()
    }

    fn state(&self) -> DrawState {
        self.state
    }

    fn start(&mut self, surface: &mut dyn MapSurface) {
        self.reset(surface);
        self.events.publish(&DrawEvent::DrawStart(self.sizing.kind()));
        tracing::debug!(
            "{} draw session started ({} profile)",
            self.sizing.kind(),
            self.profile
        );
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

        let dragging = self.state == DrawState::Dragging;
        match (self.profile, input) {
            (_, DrawInput::Key(Key::Escape)) => {
                self.cancel(surface);
                DrawStep::Cancelled
            }
            (_, DrawInput::PointerMove(point)) if dragging => self.resize(point, surface),

            (SizingProfile::TwoClick, DrawInput::Click(point)) if dragging => {
                self.complete_at(point, surface)
            }
            (SizingProfile::TwoClick, DrawInput::Click(point)) => self.begin(point),

            (SizingProfile::Drag, DrawInput::PointerDown(point)) if dragging => {
                if self.preview.is_some() {
                    self.complete_at(point, surface)
                } else {
                    DrawStep::Ignored
                }
            }
            (SizingProfile::Drag, DrawInput::PointerDown(point)) => self.begin(point),
            (SizingProfile::Drag, DrawInput::PointerUp(point)) if dragging => {
                self.complete_at(point, surface)
            }

            _ => DrawStep::Ignored,
        }
    }

    fn finish(&mut self, surface: &mut dyn MapSurface, _now: Instant) -> DrawStep {
        if self.state == DrawState::Dragging {
            self.create(surface)
        } else {
            DrawStep::Ignored
        }
    }

    fn cancel(&mut self, surface: &mut dyn MapSurface) {
        if self.state.is_active() {
            self.stop(surface, DrawState::Cancelled);
        }
    }

    /// Abort the shape being sized and wait for a new anchor.
    fn delete_last_vertex(&mut self, surface: &mut dyn MapSurface) -> DrawStep {
        if self.state == DrawState::Dragging {
            self.reset(surface);
            DrawStep::Updated
        } else {
            DrawStep::Ignored
        }
    }

    fn tick(&mut self, _surface: &mut dyn MapSurface, _now: Instant) {}

    fn tooltip(&self) -> Tooltip {
        match (&self.state, &self.preview) {
            (DrawState::Dragging, Some(preview)) => {
                Tooltip::new(self.end_text.clone()).with_subtext(self.sizing.subtext(preview))
            }
            (DrawState::Dragging, None) => Tooltip::new(self.end_text.clone()),
            _ => Tooltip::new(self.start_text.clone()),
        }
    }

    fn events_mut(&mut self) -> &mut Notifier<DrawEvent> {
        &mut self.events
    }
}
