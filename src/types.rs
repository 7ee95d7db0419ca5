//! Geometry types shared by widget records and panel surfaces

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::constants::validation::MIN_DIMENSION;

/// Top-left corner of a panel in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(deserialize_with = "clamped_coordinate")]
    pub x: u32,
    #[serde(deserialize_with = "clamped_coordinate")]
    pub y: u32,
}

/// Accept any integer; off-screen negatives are pulled back to 0
fn clamped_coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = i64::deserialize(deserializer)?;
    let clamped = value.clamp(0, i64::from(u32::MAX)) as u32;
    if i64::from(clamped) != value {
        warn!(value, clamped, "coordinate out of range, clamping");
    }
    Ok(clamped)
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Panel size in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both sides meet the minimum panel size
    pub fn meets_minimum(&self) -> bool {
        self.width >= MIN_DIMENSION && self.height >= MIN_DIMENSION
    }
}
