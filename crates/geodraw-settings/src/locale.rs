//! Tooltip and label strings.
//!
//! Every user-facing string the draw and edit sessions show lives here so a
//! host can ship a translated [`DrawStrings`] in its configuration file.

use serde::{Deserialize, Serialize};

/// Tooltips for a click-to-place line session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStrings {
    /// Shown before the first vertex
    pub start: String,
    /// Shown while the shape cannot be finished yet
    pub cont: String,
    /// Shown once the shape can be finished
    pub end: String,
}

/// All tooltip strings, English by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawStrings {
    pub rectangle_start: String,
    pub circle_start: String,
    /// Shown while a rectangle or circle is being sized
    pub simple_shape_end: String,
    /// Prefix of the circle radius readout
    pub radius_label: String,
    pub marker_start: String,
    pub edit_text: String,
    pub edit_subtext: String,
    pub remove_text: String,
    pub polyline: LineStrings,
    pub polygon: LineStrings,
}

impl Default for DrawStrings {
    fn default() -> Self {
        Self {
            rectangle_start: "Click and drag to draw rectangle.".to_string(),
            circle_start: "Click and drag to draw circle.".to_string(),
            simple_shape_end: "Release mouse to finish drawing.".to_string(),
            radius_label: "Radius".to_string(),
            marker_start: "Click map to place marker.".to_string(),
            edit_text: "Drag handles, or marker to edit feature.".to_string(),
            edit_subtext: "Click cancel to undo changes.".to_string(),
            remove_text: "Click on a feature to remove".to_string(),
            polyline: LineStrings {
                start: "Click to start drawing line.".to_string(),
                cont: "Click to continue drawing line.".to_string(),
                end: "Click last point to finish line.".to_string(),
            },
            polygon: LineStrings {
                start: "Click to start drawing shape.".to_string(),
                cont: "Click to continue drawing shape.".to_string(),
                end: "Click first point to close this shape.".to_string(),
            },
        }
    }
}
