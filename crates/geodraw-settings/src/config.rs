//! Draw and edit configuration
//!
//! Configuration is organized into one section per draw tool plus the edit
//! mode and the tooltip strings:
//! - Polyline / polygon placement (intersection checks, measurements, guides)
//! - Rectangle / circle sizing profile
//! - Marker placement
//! - Edit handles
//!
//! Files are JSON or TOML, chosen by extension, and stored in the
//! platform configuration directory by default.

pub use geodraw_core::units::MeasurementSystem;
use geodraw_core::constants::{DRAW_ERROR_TIMEOUT_MS, GHOST_OPACITY, MIN_GUIDE_SPACING_PX};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use crate::locale::DrawStrings;

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// How a rectangle or circle is sized with the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingProfile {
    /// Press to anchor, drag, release to finish
    Drag,
    /// Click to anchor, move, click again to finish
    #[default]
    TwoClick,
}

impl fmt::Display for SizingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drag => write!(f, "drag"),
            Self::TwoClick => write!(f, "two_click"),
        }
    }
}

/// Transient error indicator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawErrorSettings {
    /// How long the indicator stays visible, in milliseconds
    pub timeout_ms: u64,
    /// Text shown in place of the tooltip
    pub message: String,
}

impl DrawErrorSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DrawErrorSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DRAW_ERROR_TIMEOUT_MS,
            message: "Error: shape edges cannot cross!".to_string(),
        }
    }
}

/// Polyline drawing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolylineSettings {
    /// Allow new segments to cross earlier ones
    pub allow_intersection: bool,
    /// Start a new shape right after finishing one
    pub repeat_mode: bool,
    /// Show the running length in the tooltip
    pub show_length: bool,
    pub units: MeasurementSystem,
    /// Pixel spacing of the guide dashes
    pub guideline_distance: f64,
    pub error: DrawErrorSettings,
}

impl Default for PolylineSettings {
    fn default() -> Self {
        Self {
            allow_intersection: true,
            repeat_mode: false,
            show_length: true,
            units: MeasurementSystem::Metric,
            guideline_distance: 20.0,
            error: DrawErrorSettings::default(),
        }
    }
}

/// Polygon drawing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonSettings {
    /// Show the running area in the tooltip
    pub show_area: bool,
    /// Placement settings shared with polylines
    pub line: PolylineSettings,
}

impl Default for PolygonSettings {
    fn default() -> Self {
        Self {
            show_area: false,
            line: PolylineSettings::default(),
        }
    }
}

/// Rectangle drawing settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangleSettings {
    pub profile: SizingProfile,
    pub repeat_mode: bool,
}

/// Circle drawing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleSettings {
    pub profile: SizingProfile,
    pub repeat_mode: bool,
    /// Show the radius in the tooltip while sizing
    pub show_radius: bool,
    pub units: MeasurementSystem,
}

impl Default for CircleSettings {
    fn default() -> Self {
        Self {
            profile: SizingProfile::default(),
            repeat_mode: false,
            show_radius: true,
            units: MeasurementSystem::Metric,
        }
    }
}

/// Marker drawing settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    pub repeat_mode: bool,
}

/// Edit mode settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditSettings {
    /// Opacity of midpoint handles before they are dragged
    pub ghost_opacity: f64,
    /// Offer the edit action on the toolbar
    pub enable_edit: bool,
    /// Offer the remove action on the toolbar
    pub enable_remove: bool,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            ghost_opacity: GHOST_OPACITY,
            enable_edit: true,
            enable_remove: true,
        }
    }
}

/// Complete draw/edit configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub polyline: PolylineSettings,
    pub polygon: PolygonSettings,
    pub rectangle: RectangleSettings,
    pub circle: CircleSettings,
    pub marker: MarkerSettings,
    pub edit: EditSettings,
    pub strings: DrawStrings,
}

impl DrawConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        config.validate()?;
        tracing::debug!("Loaded draw config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        std::fs::write(path, content)?;
        tracing::debug!("Saved draw config to {}", path.display());
        Ok(())
    }

    /// Load from the default location, falling back to defaults when no
    /// file exists yet.
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        for (key, line) in [("polyline", &self.polyline), ("polygon.line", &self.polygon.line)] {
            if line.error.timeout_ms == 0 {
                return Err(ConfigError::out_of_range(
                    &format!("{}.error.timeout_ms", key),
                    line.error.timeout_ms,
                ));
            }
            if !line.guideline_distance.is_finite()
                || line.guideline_distance < MIN_GUIDE_SPACING_PX
            {
                return Err(ConfigError::out_of_range(
                    &format!("{}.guideline_distance", key),
                    line.guideline_distance,
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.edit.ghost_opacity) {
            return Err(ConfigError::out_of_range(
                "edit.ghost_opacity",
                self.edit.ghost_opacity,
            ));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Platform configuration directory for GeoDraw
pub fn config_dir() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("geodraw"))
        .ok_or_else(|| SettingsError::ConfigDirectory("no platform config directory".to_string()))
}

/// Default path of the configuration file
pub fn default_config_path() -> SettingsResult<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
