//! Toolbar actions and mode switching.
//!
//! The [`Toolbar`] owns at most one active mode: a draw session, edit mode or
//! remove mode. Activating an action leaves the current mode first. Shapes
//! finished by a draw session are handed to the [`EditController`], so they
//! take part in the next save or cancel.

use std::fmt;
use std::time::Instant;

use geodraw_core::{Error, GeoPoint, HandleRef, MapSurface, Result, ShapeId};
use geodraw_settings::DrawConfig;

use crate::controller::{EditController, SaveReport, ShapePersistence};
use crate::draw::{
    BoundsSession, DrawInput, DrawSession, DrawStep, LineSession, MarkerSession, RadiusSession,
    Tooltip,
};
use crate::edit::EditEvent;
use crate::shape_store::ShapeStore;

/// A toolbar button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarAction {
    DrawPolyline,
    DrawPolygon,
    DrawRectangle,
    DrawCircle,
    DrawMarker,
    Edit,
    Remove,
    Save,
    Cancel,
    DeleteLastPoint,
}

impl ToolbarAction {
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::DrawPolyline
                | Self::DrawPolygon
                | Self::DrawRectangle
                | Self::DrawCircle
                | Self::DrawMarker
        )
    }
}

impl fmt::Display for ToolbarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DrawPolyline => "Draw a polyline",
            Self::DrawPolygon => "Draw a polygon",
            Self::DrawRectangle => "Draw a rectangle",
            Self::DrawCircle => "Draw a circle",
            Self::DrawMarker => "Draw a marker",
            Self::Edit => "Edit layers",
            Self::Remove => "Delete layers",
            Self::Save => "Save",
            Self::Cancel => "Cancel",
            Self::DeleteLastPoint => "Delete last point",
        };
        write!(f, "{}", name)
    }
}

/// The currently active toolbar mode
pub enum ToolbarMode {
    Idle,
    Draw(ToolbarAction, Box<dyn DrawSession>),
    Edit,
    Remove,
}

impl fmt::Debug for ToolbarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Draw(action, session) => write!(f, "Draw({:?}, {})", action, session.state()),
            Self::Edit => write!(f, "Edit"),
            Self::Remove => write!(f, "Remove"),
        }
    }
}

/// Result of activating a toolbar action
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarOutcome {
    /// A mode was entered
    Activated,
    /// The active mode was left, or the action did not apply
    Deactivated,
    /// Output of the active draw session
    Draw(DrawStep),
    Saved(SaveReport),
    Reverted(Vec<ShapeId>),
}

/// Mode switcher wiring draw sessions and edit mode together
pub struct Toolbar {
    config: DrawConfig,
    controller: EditController,
    persistence: Option<Box<dyn ShapePersistence>>,
    mode: ToolbarMode,
}

impl Toolbar {
    /// Fails with [`Error::PreconditionViolation`] when edit or remove is
    /// enabled but no shape collection is supplied.
    pub fn new(
        config: DrawConfig,
        store: Option<ShapeStore>,
        persistence: Option<Box<dyn ShapePersistence>>,
    ) -> Result<Self> {
        let editing = config.edit.enable_edit || config.edit.enable_remove;
        let store = match store {
            Some(store) => store,
            None if editing => {
                return Err(Error::precondition(
                    "edit and remove actions need a shape collection",
                ))
            }
            None => ShapeStore::new(),
        };

        let controller = EditController::new(store, &config.edit);
        Ok(Self {
            config,
            controller,
            persistence,
            mode: ToolbarMode::Idle,
        })
    }

    /// Actions offered by this configuration
    pub fn actions(&self) -> Vec<ToolbarAction> {
        let mut actions = vec![
            ToolbarAction::DrawPolyline,
            ToolbarAction::DrawPolygon,
            ToolbarAction::DrawRectangle,
            ToolbarAction::DrawCircle,
            ToolbarAction::DrawMarker,
        ];
        if self.config.edit.enable_edit {
            actions.push(ToolbarAction::Edit);
        }
        if self.config.edit.enable_remove {
            actions.push(ToolbarAction::Remove);
        }
        actions
    }

    pub fn mode(&self) -> &ToolbarMode {
        &self.mode
    }

    /// The action whose mode is active, if any
    pub fn active_action(&self) -> Option<ToolbarAction> {
        match &self.mode {
            ToolbarMode::Idle => None,
            ToolbarMode::Draw(action, _) => Some(*action),
            ToolbarMode::Edit => Some(ToolbarAction::Edit),
            ToolbarMode::Remove => Some(ToolbarAction::Remove),
        }
    }

    pub fn controller(&self) -> &EditController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut EditController {
        &mut self.controller
    }

    pub fn draw_session_mut(&mut self) -> Option<&mut dyn DrawSession> {
        match &mut self.mode {
            ToolbarMode::Draw(_, session) => Some(session.as_mut()),
            _ => None,
        }
    }

    pub fn activate(
        &mut self,
        action: ToolbarAction,
        surface: &mut dyn MapSurface,
    ) -> Result<ToolbarOutcome> {
        tracing::debug!("Toolbar action: {}", action);
        match action {
            _ if action.is_draw() => {
                let toggled_off = self.active_action() == Some(action);
                self.leave_mode(surface);
                if toggled_off {
                    return Ok(ToolbarOutcome::Deactivated);
                }
                let mut session = self.new_session(action);
                session.start(surface);
                self.mode = ToolbarMode::Draw(action, session);
                Ok(ToolbarOutcome::Activated)
            }
            ToolbarAction::Edit => {
                if !self.config.edit.enable_edit {
                    return Err(Error::precondition("edit action is disabled"));
                }
                self.leave_mode(surface);
                self.controller.enable(surface)?;
                self.mode = ToolbarMode::Edit;
                Ok(ToolbarOutcome::Activated)
            }
            ToolbarAction::Remove => {
                if !self.config.edit.enable_remove {
                    return Err(Error::precondition("remove action is disabled"));
                }
                self.leave_mode(surface);
                self.mode = ToolbarMode::Remove;
                Ok(ToolbarOutcome::Activated)
            }
            ToolbarAction::Save => self.save(surface),
            ToolbarAction::Cancel => self.cancel(surface),
            ToolbarAction::DeleteLastPoint => match &mut self.mode {
                ToolbarMode::Draw(_, session) => {
                    Ok(ToolbarOutcome::Draw(session.delete_last_vertex(surface)))
                }
                _ => Ok(ToolbarOutcome::Deactivated),
            },
            _ => Ok(ToolbarOutcome::Deactivated),
        }
    }

    /// Feed pointer or key input to the active draw session. Finished
    /// shapes are added to the collection.
    pub fn handle_input(
        &mut self,
        input: DrawInput,
        surface: &mut dyn MapSurface,
        now: Instant,
    ) -> Result<DrawStep> {
        let ToolbarMode::Draw(_, session) = &mut self.mode else {
            return Ok(DrawStep::Ignored);
        };

        let step = session.on_input(input, surface, now);
        let still_active = session.state().is_active();
        if let DrawStep::Finished(geometry) = &step {
            self.controller.add_shape(geometry.clone(), surface)?;
        }
        if !still_active {
            self.mode = ToolbarMode::Idle;
        }
        Ok(step)
    }

    pub fn tick(&mut self, surface: &mut dyn MapSurface, now: Instant) {
        if let ToolbarMode::Draw(_, session) = &mut self.mode {
            session.tick(surface, now);
        }
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        let strings = &self.config.strings;
        match &self.mode {
            ToolbarMode::Idle => None,
            ToolbarMode::Draw(_, session) => Some(session.tooltip()),
            ToolbarMode::Edit => Some(
                Tooltip::new(strings.edit_text.clone())
                    .with_subtext(Some(strings.edit_subtext.clone())),
            ),
            ToolbarMode::Remove => Some(Tooltip::new(strings.remove_text.clone())),
        }
    }

    /// In remove mode, remove the clicked shape. Returns whether it was
    /// removed.
    pub fn on_shape_clicked(&mut self, id: ShapeId, surface: &mut dyn MapSurface) -> Result<bool> {
        if !matches!(self.mode, ToolbarMode::Remove) {
            return Ok(false);
        }
        self.controller.remove_shape(id, surface)?;
        Ok(true)
    }

    pub fn on_handle_drag_start(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        self.controller.on_handle_drag_start(handle, surface)
    }

    pub fn on_handle_drag(
        &mut self,
        handle: HandleRef,
        position: GeoPoint,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        self.controller.on_handle_drag(handle, position, surface)
    }

    pub fn on_handle_drag_end(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        self.controller.on_handle_drag_end(handle, surface)
    }

    pub fn on_handle_click(
        &mut self,
        handle: HandleRef,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<EditEvent>> {
        self.controller.on_handle_click(handle, surface)
    }

    fn new_session(&self, action: ToolbarAction) -> Box<dyn DrawSession> {
        match action {
            ToolbarAction::DrawPolygon => Box::new(LineSession::polygon(&self.config)),
            ToolbarAction::DrawRectangle => Box::new(BoundsSession::rectangle(&self.config)),
            ToolbarAction::DrawCircle => Box::new(RadiusSession::circle(&self.config)),
            ToolbarAction::DrawMarker => Box::new(MarkerSession::new(&self.config)),
            _ => Box::new(LineSession::polyline(&self.config)),
        }
    }

    fn leave_mode(&mut self, surface: &mut dyn MapSurface) {
        match std::mem::replace(&mut self.mode, ToolbarMode::Idle) {
            ToolbarMode::Draw(_, mut session) => session.cancel(surface),
            ToolbarMode::Edit => self.controller.disable(surface),
            ToolbarMode::Idle | ToolbarMode::Remove => {}
        }
    }

    /// Persist the batch. On any failure the mode stays active so the user
    /// can retry or cancel.
    fn save(&mut self, surface: &mut dyn MapSurface) -> Result<ToolbarOutcome> {
        let Some(persistence) = self.persistence.as_mut() else {
            return Err(Error::precondition("saving needs a persistence backend"));
        };

        let report = self.controller.save(persistence.as_mut());
        if report.is_success() {
            self.leave_mode(surface);
        }
        Ok(ToolbarOutcome::Saved(report))
    }

    fn cancel(&mut self, surface: &mut dyn MapSurface) -> Result<ToolbarOutcome> {
        match self.mode {
            ToolbarMode::Draw(..) => {
                self.leave_mode(surface);
                Ok(ToolbarOutcome::Deactivated)
            }
            ToolbarMode::Edit | ToolbarMode::Remove => {
                let reverted = self.controller.cancel(surface)?;
                self.leave_mode(surface);
                Ok(ToolbarOutcome::Reverted(reverted))
            }
            ToolbarMode::Idle => Ok(ToolbarOutcome::Deactivated),
        }
    }
}
