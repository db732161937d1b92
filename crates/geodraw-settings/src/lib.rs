//! GeoDraw Settings Crate
//!
//! Draw and edit configuration with JSON/TOML persistence, validation and
//! localizable tooltip strings.

pub mod config;
pub mod error;
pub mod locale;

pub use config::{
    config_dir, default_config_path, CircleSettings, DrawConfig, DrawErrorSettings, EditSettings,
    MarkerSettings, MeasurementSystem, PolygonSettings, PolylineSettings, RectangleSettings,
    SizingProfile,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use locale::{DrawStrings, LineStrings};
