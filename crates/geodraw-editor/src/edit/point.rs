use geodraw_core::{Error, GeoPoint, HandleRef, HandleStyle, MapSurface, Result, Shared, ShapeId};

use super::EditEvent;
use crate::model::ShapeModel;

/// Drag editing for a marker
#[derive(Debug)]
pub struct PointEditor {
    shape: Shared<ShapeModel>,
    id: ShapeId,
    handle: HandleRef,
}

impl PointEditor {
    pub fn attach(shape: Shared<ShapeModel>, surface: &mut dyn MapSurface) -> Result<Self> {
        let (id, position) = {
            let model = shape.borrow();
            (model.id(), model.position()?)
        };
        let handle = surface.add_handle_visual(Some(id), position, HandleStyle::Marker);
        Ok(Self { shape, id, handle })
    }

    pub fn shape_id(&self) -> ShapeId {
        self.id
    }

    pub fn handle(&self) -> HandleRef {
        self.handle
    }

    pub fn owns_handle(&self, handle: HandleRef) -> bool {
        handle == self.handle
    }

    pub fn on_drag_start(&mut self, handle: HandleRef) -> Result<Vec<EditEvent>> {
        self.require(handle)?;
        Ok(vec![EditEvent::EditStart(self.id)])
    }

    pub fn on_drag(
        &mut self,
        handle: HandleRef,
        position: GeoPoint,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        self.require(handle)?;
        self.shape.borrow_mut().set_position(position)?;
        surface.move_handle_visual(self.handle, position);
        surface.request_redraw(self.id);
        Ok(Vec::new())
    }

    pub fn on_drag_end(&mut self, handle: HandleRef) -> Result<Vec<EditEvent>> {
        self.require(handle)?;
        self.shape.borrow_mut().mark_edited();
        Ok(vec![EditEvent::Edited(self.id)])
    }

    pub fn rebuild(&mut self, surface: &mut dyn MapSurface) -> Result<()> {
        let position = self.shape.borrow().position()?;
        surface.move_handle_visual(self.handle, position);
        Ok(())
    }

    pub fn detach(self, surface: &mut dyn MapSurface) {
        surface.remove_handle_visual(self.handle);
    }

    fn require(&self, handle: HandleRef) -> Result<()> {
        if handle == self.handle {
            Ok(())
        } else {
            Err(Error::UnknownHandle(handle))
        }
    }
}
