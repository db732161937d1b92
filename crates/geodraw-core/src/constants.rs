//! Shared numeric constants.

/// Equatorial Earth radius in metres (WGS84 semi-major axis).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Pixel size of the whole world at zoom level 0 for tiled web maps.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Yards in one metre.
pub const YARDS_PER_METER: f64 = 1.09361;

/// Multiplier applied to square metres before imperial area formatting.
pub const SQ_YARDS_PER_SQ_METER: f64 = 0.836127;

/// Yards in one mile.
pub const YARDS_PER_MILE: f64 = 1760.0;

/// Square yards in one square mile.
pub const SQ_YARDS_PER_SQ_MILE: f64 = 3_097_600.0;

/// Square yards in one acre.
pub const SQ_YARDS_PER_ACRE: f64 = 4840.0;

/// Square metres in one hectare.
pub const SQ_METERS_PER_HECTARE: f64 = 10_000.0;

/// Metres in one kilometre.
pub const METERS_PER_KM: f64 = 1000.0;

/// Smallest spacing between guide dashes, in pixels.
pub const MIN_GUIDE_SPACING_PX: f64 = 1.0;

/// Default opacity of a ghost (midpoint) handle.
pub const GHOST_OPACITY: f64 = 0.6;

/// Default time an error indicator stays visible, in milliseconds.
pub const DRAW_ERROR_TIMEOUT_MS: u64 = 2500;
