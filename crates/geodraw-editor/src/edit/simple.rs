//! Move/resize editing for rectangles and circles.

use geodraw_core::{
    BoundsShape, Error, GeoPoint, Geometry, GeometryError, HandleRef, HandleStyle, MapSurface,
    Point2D, Result, Shared, ShapeId, ShapeKind,
};

use super::EditEvent;
use crate::model::ShapeModel;

/// Editing session for one rectangle or circle.
///
/// A move handle sits at the shape's center. Rectangles get one resize
/// handle per corner, in `[nw, ne, se, sw]` order; circles get a single
/// resize handle on the rim at 45 degrees.
#[derive(Debug)]
pub struct SimpleShapeEditor {
    shape: Shared<ShapeModel>,
    id: ShapeId,
    rectangle: bool,
    move_handle: HandleRef,
    resize_handles: Vec<HandleRef>,
    /// Fixed corner while a rectangle corner is dragged
    opposite_corner: Option<GeoPoint>,
}

impl SimpleShapeEditor {
    pub fn attach(shape: Shared<ShapeModel>, surface: &mut dyn MapSurface) -> Result<Self> {
        let (id, rectangle) = {
            let model = shape.borrow();
            let rectangle = match model.geometry() {
                Geometry::Bounds(_) => true,
                Geometry::Circle(_) => false,
                other => {
                    return Err(GeometryError::KindMismatch {
                        expected: ShapeKind::Rectangle,
                        actual: other.kind(),
                    }
                    .into())
                }
            };
            (model.id(), rectangle)
        };

        let center = shape.borrow().center()?;
        let move_handle = surface.add_handle_visual(Some(id), center, HandleStyle::Move);
        let mut editor = Self {
            shape,
            id,
            rectangle,
            move_handle,
            resize_handles: Vec::new(),
            opposite_corner: None,
        };
        editor.create_resize_handles(surface)?;
        tracing::debug!("Shape editor attached to shape {}", id);
        Ok(editor)
    }

    pub fn shape_id(&self) -> ShapeId {
        self.id
    }

    pub fn move_handle(&self) -> HandleRef {
        self.move_handle
    }

    pub fn resize_handles(&self) -> &[HandleRef] {
        &self.resize_handles
    }

    pub fn owns_handle(&self, handle: HandleRef) -> bool {
        handle == self.move_handle || self.resize_handles.contains(&handle)
    }

    pub fn on_drag_start(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        if handle == self.move_handle {
            return Ok(vec![EditEvent::EditStart(self.id)]);
        }

        let corner = self.resize_index(handle)?;
        if self.rectangle {
            let corners = self.shape.borrow().bounds()?.corners();
            self.opposite_corner = Some(corners[(corner + 2) % 4]);
            for other in self.resize_handles.iter().filter(|h| **h != handle) {
                surface.set_handle_opacity(*other, 0.0);
            }
        }
        Ok(vec![EditEvent::EditStart(self.id)])
    }

    pub fn on_drag(
        &mut self,
        handle: HandleRef,
        position: GeoPoint,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        if handle == self.move_handle {
            self.move_to(position, surface)?;
        } else {
            let corner = self.resize_index(handle)?;
            self.resize_to(corner, position, surface)?;
            surface.move_handle_visual(handle, position);
        }
        surface.request_redraw(self.id);
        Ok(Vec::new())
    }

    pub fn on_drag_end(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        if handle != self.move_handle {
            self.resize_index(handle)?;
            self.opposite_corner = None;
            for resize in &self.resize_handles {
                surface.set_handle_opacity(*resize, 1.0);
            }
            self.reposition_resize_handles(surface)?;
        }

        self.shape.borrow_mut().mark_edited();
        Ok(vec![EditEvent::Edited(self.id)])
    }

    pub fn rebuild(&mut self, surface: &mut dyn MapSurface) -> Result<()> {
        let center = self.shape.borrow().center()?;
        surface.move_handle_visual(self.move_handle, center);
        for handle in self.resize_handles.drain(..) {
            surface.remove_handle_visual(handle);
        }
        self.opposite_corner = None;
        self.create_resize_handles(surface)
    }

    pub fn detach(mut self, surface: &mut dyn MapSurface) {
        surface.remove_handle_visual(self.move_handle);
        for handle in self.resize_handles.drain(..) {
            surface.remove_handle_visual(handle);
        }
        tracing::debug!("Shape editor detached from shape {}", self.id);
    }

    fn resize_index(&self, handle: HandleRef) -> Result<usize> {
        self.resize_handles
            .iter()
            .position(|h| *h == handle)
            .ok_or(Error::UnknownHandle(handle))
    }

    fn create_resize_handles(&mut self, surface: &mut dyn MapSurface) -> Result<()> {
        self.resize_handles = self
            .resize_points(surface)?
            .into_iter()
            .map(|point| surface.add_handle_visual(Some(self.id), point, HandleStyle::Resize))
            .collect();
        Ok(())
    }

    fn reposition_resize_handles(&self, surface: &mut dyn MapSurface) -> Result<()> {
        for (handle, point) in self.resize_handles.iter().zip(self.resize_points(surface)?) {
            surface.move_handle_visual(*handle, point);
        }
        Ok(())
    }

    fn resize_points(&self, surface: &dyn MapSurface) -> Result<Vec<GeoPoint>> {
        let model = self.shape.borrow();
        if self.rectangle {
            return Ok(model.bounds()?.corners().to_vec());
        }

        let circle = model.circle()?;
        let center_px = surface.to_pixels(circle.center);
        let meters_per_pixel = surface.distance_meters(
            circle.center,
            surface.from_pixels(center_px + Point2D::new(1.0, 0.0)),
        );
        let radius_px = if meters_per_pixel > 0.0 {
            circle.radius / meters_per_pixel
        } else {
            0.0
        };
        let delta = radius_px * std::f64::consts::FRAC_PI_4.cos();
        Ok(vec![surface.from_pixels(center_px + Point2D::new(delta, -delta))])
    }

    fn move_to(&mut self, position: GeoPoint, surface: &mut dyn MapSurface) -> Result<()> {
        if self.rectangle {
            let bounds = self.shape.borrow().bounds()?;
            let offset = surface.to_pixels(position) - surface.to_pixels(bounds.center());
            let shift = |corner: GeoPoint| surface.from_pixels(surface.to_pixels(corner) + offset);
            let moved = BoundsShape::new(shift(bounds.south_west()), shift(bounds.north_east()));
            self.shape.borrow_mut().set_bounds(moved)?;
        } else {
            self.shape.borrow_mut().set_center(position)?;
        }

        surface.move_handle_visual(self.move_handle, position);
        self.reposition_resize_handles(surface)
    }

    fn resize_to(
        &mut self,
        corner: usize,
        position: GeoPoint,
        surface: &mut dyn MapSurface,
    ) -> Result<()> {
        if self.rectangle {
            let opposite = match self.opposite_corner {
                Some(opposite) => opposite,
                None => self.shape.borrow().bounds()?.corners()[(corner + 2) % 4],
            };
            let bounds = BoundsShape::new(position, opposite);
            self.shape.borrow_mut().set_bounds(bounds)?;
            surface.move_handle_visual(self.move_handle, bounds.center());
        } else {
            let center = self.shape.borrow().center()?;
            let radius = surface.distance_meters(center, position);
            self.shape.borrow_mut().set_radius(radius)?;
        }
        Ok(())
    }
}
