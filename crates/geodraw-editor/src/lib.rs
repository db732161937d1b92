//! # GeoDraw Editor
//!
//! Interactive drawing and editing of map shapes on top of the collaborator
//! traits in `geodraw-core`.
//!
//! ## Core Components
//!
//! - **Shape model**: [`ShapeModel`] and the [`ShapeStore`] collection
//! - **Draw sessions**: click-to-place lines, anchor-and-size rectangles and
//!   circles, markers ([`draw`])
//! - **Editors**: vertex and ghost handles for lines, move/resize handles for
//!   rectangles and circles, a drag handle for markers ([`edit`])
//! - **Edit control**: backups, batch save and revert ([`EditController`])
//! - **Toolbar**: mode switching between all of the above ([`Toolbar`])
//!
//! ## Architecture
//!
//! ```text
//! Toolbar
//!   ├── DrawSession (one active at a time)
//!   └── EditController
//!         ├── ShapeStore (Rc<RefCell<ShapeModel>> per shape)
//!         └── ShapeEditor per shape while edit mode is on
//! ```
//!
//! Everything runs on the caller's thread. Pointer input arrives already
//! resolved to geographic coordinates or to the [`HandleRef`] that was hit,
//! and every visual change goes out through the host's
//! [`MapSurface`](geodraw_core::MapSurface).
//!
//! [`HandleRef`]: geodraw_core::HandleRef

pub mod controller;
pub mod draw;
pub mod edit;
pub mod model;
pub mod shape_store;
pub mod surface;
pub mod toolbar;

pub use controller::{EditController, SaveReport, ShapePersistence};
pub use draw::{
    BoundsSession, DrawEvent, DrawInput, DrawSession, DrawState, DrawStep, Key, LineSession,
    MarkerSession, RadiusSession, SizingSession, Tooltip,
};
pub use edit::{EditEvent, PointEditor, ShapeEditor, SimpleShapeEditor, VertexEditor, VertexHandle};
pub use model::ShapeModel;
pub use shape_store::ShapeStore;
pub use surface::{HandleVisual, HeadlessMap};
pub use toolbar::{Toolbar, ToolbarAction, ToolbarMode, ToolbarOutcome};
