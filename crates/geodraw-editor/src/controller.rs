//! Edit mode across a whole shape collection.
//!
//! The [`EditController`] attaches one editor per shape while edit mode is
//! enabled, keeps the pre-edit snapshot of every shape it lets the user
//! touch, and commits or reverts all of them as one batch.
//!
//! Backups are taken lazily, at most once per shape between a save or
//! cancel: the first snapshot wins, so a revert always returns to the state
//! before the first edit no matter how many edits followed.

use std::collections::{HashMap, HashSet};

use geodraw_core::{
    Error, GeoPoint, Geometry, GeometryError, HandleRef, MapSurface, Notifier, Point2D, Result,
    Shared, ShapeId, ShapeKind,
};
use geodraw_settings::EditSettings;

use crate::edit::{EditEvent, ShapeEditor};
use crate::model::ShapeModel;
use crate::shape_store::ShapeStore;

/// Host-side storage for shapes.
///
/// Each method is called at most once per shape per save attempt. An `Err`
/// carries a reason shown to the user; it fails only that shape.
pub trait ShapePersistence {
    /// Persist a shape drawn during this session
    fn create(&mut self, shape: &ShapeModel) -> std::result::Result<(), String>;

    /// Persist edits to a shape that existed before
    fn update(&mut self, shape: &ShapeModel) -> std::result::Result<(), String>;

    /// Permanently delete a shape
    fn delete(&mut self, shape: &ShapeModel) -> std::result::Result<(), String>;
}

/// Outcome of one save batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    pub saved: Vec<ShapeId>,
    pub deleted: Vec<ShapeId>,
    /// One [`Error::PersistenceFailure`] per shape the host rejected
    pub failed: Vec<Error>,
}

impl SaveReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Coordinates editing, backups and save/cancel for a [`ShapeStore`]
pub struct EditController {
    store: ShapeStore,
    editors: HashMap<ShapeId, ShapeEditor>,
    backups: HashMap<ShapeId, Geometry>,
    /// Removed shapes with the draw position they were removed from
    pending_deletion: Vec<(usize, Shared<ShapeModel>)>,
    /// Shapes drawn since the last save; persisted with `create`
    created: HashSet<ShapeId>,
    enabled: bool,
    ghost_opacity: f64,
    events: Notifier<EditEvent>,
}

impl EditController {
    pub fn new(store: ShapeStore, settings: &EditSettings) -> Self {
        Self {
            store,
            editors: HashMap::new(),
            backups: HashMap::new(),
            pending_deletion: Vec::new(),
            created: HashSet::new(),
            enabled: false,
            ghost_opacity: settings.ghost_opacity,
            events: Notifier::new(),
        }
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn events_mut(&mut self) -> &mut Notifier<EditEvent> {
        &mut self.events
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn editor(&self, id: ShapeId) -> Option<&ShapeEditor> {
        self.editors.get(&id)
    }

    pub fn backup(&self, id: ShapeId) -> Option<&Geometry> {
        self.backups.get(&id)
    }

    /// Ids of removed shapes awaiting save or cancel
    pub fn pending_deletions(&self) -> Vec<ShapeId> {
        self.pending_deletion
            .iter()
            .map(|(_, shape)| shape.borrow().id())
            .collect()
    }

    /// Ids of shapes with uncommitted edits, in draw order
    pub fn edited_shapes(&self) -> Vec<ShapeId> {
        self.store
            .iter()
            .filter(|shape| shape.borrow().is_edited())
            .map(|shape| shape.borrow().id())
            .collect()
    }

    /// Attach an editor to every shape and back up any shape not backed up
    /// since the last save or cancel.
    pub fn enable(&mut self, surface: &mut dyn MapSurface) -> Result<()> {
        if self.enabled {
            return Ok(());
        }
        self.enabled = true;

        for id in self.store.ids().to_vec() {
            self.ensure_backup(id);
            self.attach(id, surface)?;
        }
        tracing::info!("Edit mode enabled for {} shapes", self.editors.len());
        Ok(())
    }

    /// Detach all editors. Backups survive until save or cancel.
    pub fn disable(&mut self, surface: &mut dyn MapSurface) {
        if !self.enabled {
            return;
        }
        self.enabled = false;

        for (_, editor) in self.editors.drain() {
            editor.detach(surface);
        }
        tracing::info!("Edit mode disabled");
    }

    /// Add a newly drawn shape. It is persisted with `create` on the next
    /// save and discarded by cancel.
    pub fn add_shape(
        &mut self,
        geometry: Geometry,
        surface: &mut dyn MapSurface,
    ) -> Result<ShapeId> {
        let id = self.store.add(geometry);
        self.created.insert(id);
        if let Some(shape) = self.store.get(id) {
            shape.borrow_mut().mark_edited();
        }
        if self.enabled {
            self.attach(id, surface)?;
        }
        surface.request_redraw(id);
        tracing::debug!("Added shape {}", id);
        Ok(id)
    }

    /// Remove a shape. Shapes that were already persisted wait for the next
    /// save to be deleted and come back on cancel.
    pub fn remove_shape(&mut self, id: ShapeId, surface: &mut dyn MapSurface) -> Result<()> {
        let position = self.store.position(id).ok_or(Error::UnknownShape(id))?;
        let shape = self.store.remove(id).ok_or(Error::UnknownShape(id))?;
        if let Some(editor) = self.editors.remove(&id) {
            editor.detach(surface);
        }

        if self.created.remove(&id) {
            self.backups.remove(&id);
            tracing::debug!("Discarded unsaved shape {}", id);
        } else {
            self.pending_deletion.push((position, shape));
            tracing::debug!("Shape {} pending deletion", id);
        }
        surface.request_redraw(id);
        Ok(())
    }

    pub fn on_handle_drag_start(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        let id = self.owner_of(handle)?;
        self.ensure_backup(id);
        let events = self.editor_mut(id)?.on_drag_start(handle, surface)?;
        Ok(self.publish(events))
    }

    pub fn on_handle_drag(
        &mut self,
        handle: HandleRef,
        position: GeoPoint,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        let id = self.owner_of(handle)?;
        self.ensure_backup(id);
        let events = self.editor_mut(id)?.on_drag(handle, position, surface)?;
        Ok(self.publish(events))
    }

    pub fn on_handle_drag_end(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        let id = self.owner_of(handle)?;
        let events = self.editor_mut(id)?.on_drag_end(handle, surface)?;
        Ok(self.publish(events))
    }

    pub fn on_handle_click(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        let id = self.owner_of(handle)?;
        self.ensure_backup(id);
        let events = self.editor_mut(id)?.on_click(handle, surface)?;
        Ok(self.publish(events))
    }

    /// Drag a whole line shape by a pixel offset.
    pub fn translate_shape(
        &mut self,
        id: ShapeId,
        delta: Point2D,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        let kind = self
            .store
            .get(id)
            .ok_or(Error::UnknownShape(id))?
            .borrow()
            .kind();
        self.ensure_backup(id);
        let events = match self.editor_mut(id)? {
            ShapeEditor::Vertex(editor) => editor.translate_pixels(delta, surface)?,
            _ => {
                return Err(GeometryError::KindMismatch {
                    expected: ShapeKind::Polyline,
                    actual: kind,
                }
                .into())
            }
        };
        Ok(self.publish(events))
    }

    /// Commit every edited shape and every pending deletion.
    ///
    /// A shape the host rejects keeps its backup and edited flag so the user
    /// can retry or cancel; the rest of the batch is still attempted.
    pub fn save(&mut self, persistence: &mut dyn ShapePersistence) -> SaveReport {
        let mut report = SaveReport::default();

        for shape in self.store.iter() {
            let (id, edited) = {
                let model = shape.borrow();
                (model.id(), model.is_edited())
            };
            if !edited {
                continue;
            }

            let result = if self.created.contains(&id) {
                persistence.create(&shape.borrow())
            } else {
                persistence.update(&shape.borrow())
            };
            match result {
                Ok(()) => {
                    shape.borrow_mut().clear_edited();
                    report.saved.push(id);
                }
                Err(reason) => {
                    tracing::warn!("Failed to save shape {}: {}", id, reason);
                    self.events.publish(&EditEvent::PersistenceFailed {
                        id,
                        reason: reason.clone(),
                    });
                    report.failed.push(Error::PersistenceFailure { id, reason });
                }
            }
        }

        let mut retained = Vec::new();
        for (position, shape) in self.pending_deletion.drain(..) {
            let id = shape.borrow().id();
            let result = persistence.delete(&shape.borrow());
            match result {
                Ok(()) => report.deleted.push(id),
                Err(reason) => {
                    tracing::warn!("Failed to delete shape {}: {}", id, reason);
                    self.events.publish(&EditEvent::PersistenceFailed {
                        id,
                        reason: reason.clone(),
                    });
                    report.failed.push(Error::PersistenceFailure { id, reason });
                    retained.push((position, shape));
                }
            }
        }
        self.pending_deletion = retained;

        let failed: HashSet<ShapeId> = report
            .failed
            .iter()
            .filter_map(|err| match err {
                Error::PersistenceFailure { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        self.backups.retain(|id, _| failed.contains(id));
        self.created.retain(|id| failed.contains(id));

        if !report.saved.is_empty() {
            self.events.publish(&EditEvent::Saved(report.saved.clone()));
        }
        if !report.deleted.is_empty() {
            self.events
                .publish(&EditEvent::Deleted(report.deleted.clone()));
        }
        tracing::info!(
            "Saved {} shapes, deleted {}, {} failed",
            report.saved.len(),
            report.deleted.len(),
            report.failed.len()
        );
        report
    }

    /// Revert every shape to its backup, drop shapes drawn since the last
    /// save and bring back pending deletions. Returns the affected ids.
    pub fn cancel(&mut self, surface: &mut dyn MapSurface) -> Result<Vec<ShapeId>> {
        let mut reverted = Vec::new();

        for id in self.created.drain().collect::<Vec<_>>() {
            if let Some(editor) = self.editors.remove(&id) {
                editor.detach(surface);
            }
            self.store.remove(id);
            self.backups.remove(&id);
            surface.request_redraw(id);
            reverted.push(id);
        }

        // Newest removal first, so every recorded position is valid again
        let restored: Vec<ShapeId> = self
            .pending_deletion
            .drain(..)
            .rev()
            .map(|(position, shape)| {
                let id = shape.borrow().id();
                self.store.insert_at(position, shape);
                id
            })
            .collect();

        for (id, backup) in self.backups.drain() {
            let Some(shape) = self.store.get(id) else {
                continue;
            };
            {
                let mut model = shape.borrow_mut();
                model.restore(backup);
                model.clear_edited();
            }
            if let Some(editor) = self.editors.get_mut(&id) {
                editor.rebuild(surface)?;
            }
            surface.request_redraw(id);
            reverted.push(id);
        }

        for id in restored {
            if self.enabled {
                self.attach(id, surface)?;
            }
            surface.request_redraw(id);
            if !reverted.contains(&id) {
                reverted.push(id);
            }
        }

        reverted.sort();
        self.events.publish(&EditEvent::Reverted(reverted.clone()));
        tracing::info!("Reverted {} shapes", reverted.len());
        Ok(reverted)
    }

    fn attach(&mut self, id: ShapeId, surface: &mut dyn MapSurface) -> Result<()> {
        let shape = self.store.get(id).ok_or(Error::UnknownShape(id))?;
        let editor = ShapeEditor::attach(shape, surface, self.ghost_opacity)?;
        if let Some(previous) = self.editors.insert(id, editor) {
            previous.detach(surface);
        }
        Ok(())
    }

    /// First snapshot wins. Shapes drawn this session have nothing to
    /// revert to.
    fn ensure_backup(&mut self, id: ShapeId) {
        if self.created.contains(&id) || self.backups.contains_key(&id) {
            return;
        }
        if let Some(shape) = self.store.get(id) {
            self.backups.insert(id, shape.borrow().snapshot());
        }
    }

    fn owner_of(&self, handle: HandleRef) -> Result<ShapeId> {
        self.editors
            .values()
            .find(|editor| editor.owns_handle(handle))
            .map(ShapeEditor::shape_id)
            .ok_or(Error::UnknownHandle(handle))
    }

    fn editor_mut(&mut self, id: ShapeId) -> Result<&mut ShapeEditor> {
        self.editors.get_mut(&id).ok_or(Error::UnknownShape(id))
    }

    fn publish(&self, events: Vec<EditEvent>) -> Vec<EditEvent> {
        for event in &events {
            self.events.publish(event);
        }
        events
    }
}
