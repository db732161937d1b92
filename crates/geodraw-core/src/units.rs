//! Measurement formatting
//!
//! Turns raw metre and square-metre values into the short readable labels
//! shown next to the cursor while drawing. Thresholds are fixed:
//! kilometres above 1000 m, hectares from 10 000 m², miles above 1760 yd,
//! acres from 4840 yd² and square miles from 3 097 600 yd².

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    METERS_PER_KM, SQ_METERS_PER_HECTARE, SQ_YARDS_PER_ACRE, SQ_YARDS_PER_SQ_METER,
    SQ_YARDS_PER_SQ_MILE, YARDS_PER_METER, YARDS_PER_MILE,
};

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metres, kilometres and hectares
    #[default]
    Metric,
    /// Yards, miles and acres
    Imperial,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "m" => Ok(Self::Metric),
            "imperial" | "yd" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Format a distance for display
///
/// * `meters` - Distance in metres
/// * `system` - Target measurement system
pub fn readable_distance(meters: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => {
            if meters > METERS_PER_KM {
                format!("{:.2} km", meters / METERS_PER_KM)
            } else {
                format!("{} m", meters.ceil())
            }
        }
        MeasurementSystem::Imperial => {
            let yards = meters * YARDS_PER_METER;
            if yards > YARDS_PER_MILE {
                format!("{:.2} miles", yards / YARDS_PER_MILE)
            } else {
                format!("{} yd", yards.ceil())
            }
        }
    }
}

/// Format an area for display
///
/// * `square_meters` - Area in square metres
/// * `system` - Target measurement system
pub fn readable_area(square_meters: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => {
            if square_meters >= SQ_METERS_PER_HECTARE {
                format!("{:.2} ha", square_meters / SQ_METERS_PER_HECTARE)
            } else {
                format!("{:.2} m²", square_meters)
            }
        }
        MeasurementSystem::Imperial => {
            let square_yards = square_meters * SQ_YARDS_PER_SQ_METER;
            if square_yards >= SQ_YARDS_PER_SQ_MILE {
                format!("{:.2} mi²", square_yards / SQ_YARDS_PER_SQ_MILE)
            } else if square_yards >= SQ_YARDS_PER_ACRE {
                format!("{:.2} acres", square_yards / SQ_YARDS_PER_ACRE)
            } else {
                format!("{} yd²", square_yards.ceil())
            }
        }
    }
}
