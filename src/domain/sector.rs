// Sector coordinates and straight-line distances between them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in 3D space, used both for sector coordinates and in-sector positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ORIGIN: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Vector3) -> f64 {
        distance(*self, *other)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        [v.x, v.y, v.z]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectorParseError {
    // The identifier did not split into exactly three parts.
    ComponentCount { found: usize },
    // One of the parts is not a number.
    NotNumeric { component: String },
}

impl fmt::Display for SectorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectorParseError::ComponentCount { found } => {
                write!(f, "invalid sector format: expected 3 components, found {found}")
            }
            SectorParseError::NotNumeric { component } => {
                write!(f, "invalid sector format: {component:?} is not a number")
            }
        }
    }
}

impl std::error::Error for SectorParseError {}

/// Parses a dot-delimited `"x.y.z"` sector identifier.
///
/// Malformed identifiers are always an error; there is no fallback coordinate.
pub fn parse(sector: &str) -> Result<Vector3, SectorParseError> {
    let parts: Vec<&str> = sector.split('.').collect();
    if parts.len() != 3 {
        return Err(SectorParseError::ComponentCount { found: parts.len() });
    }

    let mut coords = [0.0_f64; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = parse_component(part)?;
    }
    Ok(Vector3::from(coords))
}

fn parse_component(part: &str) -> Result<f64, SectorParseError> {
    part.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| SectorParseError::NotNumeric {
            component: part.to_string(),
        })
}

/// Euclidean norm of the component-wise difference.
pub fn distance(a: Vector3, b: Vector3) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.z - a.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}
