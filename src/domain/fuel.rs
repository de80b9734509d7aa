// Advisory fuel estimates and gauge banding.
//
// The server owns the real fuel cost; these numbers are only shown before a jump
// and are replaced by the jump outcome once it arrives.

use crate::domain::sector::{self, SectorParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sector environment affecting jump fuel consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorType {
    #[default]
    Normal,
    Nebula,
    Void,
    Hazard,
}

impl SectorType {
    pub fn fuel_multiplier(self) -> f64 {
        match self {
            SectorType::Normal => 1.0,
            SectorType::Nebula => 1.5,
            SectorType::Void => 0.8,
            SectorType::Hazard => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectorType::Normal => "normal",
            SectorType::Nebula => "nebula",
            SectorType::Void => "void",
            SectorType::Hazard => "hazard",
        }
    }
}

impl FromStr for SectorType {
    type Err = UnknownSectorType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(SectorType::Normal),
            "nebula" => Ok(SectorType::Nebula),
            "void" => Ok(SectorType::Void),
            "hazard" => Ok(SectorType::Hazard),
            other => Err(UnknownSectorType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSectorType(pub String);

impl fmt::Display for UnknownSectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sector type {:?}", self.0)
    }
}

impl std::error::Error for UnknownSectorType {}

#[derive(Debug, Clone, PartialEq)]
pub enum FuelEstimateError {
    InvalidSector(SectorParseError),
    // Speed must be a finite value above zero.
    InvalidShipSpeed(f64),
}

impl fmt::Display for FuelEstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelEstimateError::InvalidSector(err) => write!(f, "{err}"),
            FuelEstimateError::InvalidShipSpeed(speed) => {
                write!(f, "ship speed must be positive, got {speed}")
            }
        }
    }
}

impl std::error::Error for FuelEstimateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FuelEstimateError::InvalidSector(err) => Some(err),
            FuelEstimateError::InvalidShipSpeed(_) => None,
        }
    }
}

impl From<SectorParseError> for FuelEstimateError {
    fn from(err: SectorParseError) -> Self {
        FuelEstimateError::InvalidSector(err)
    }
}

/// Estimated fuel for a jump: distance / speed * sector multiplier.
pub fn estimate_fuel_cost(
    from_sector: &str,
    to_sector: &str,
    ship_speed: f64,
    sector_type: SectorType,
) -> Result<f64, FuelEstimateError> {
    if !ship_speed.is_finite() || ship_speed <= 0.0 {
        return Err(FuelEstimateError::InvalidShipSpeed(ship_speed));
    }

    let from = sector::parse(from_sector)?;
    let to = sector::parse(to_sector)?;
    let distance = sector::distance(from, to);

    Ok(distance * (1.0 / ship_speed) * sector_type.fuel_multiplier())
}

/// Display band for a fuel gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelLevel {
    High,
    Medium,
    Low,
}

/// Fuel percentage below which a low-fuel warning is shown.
pub const LOW_FUEL_WARNING_PERCENT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelGauge {
    pub current: f64,
    pub capacity: f64,
}

impl FuelGauge {
    pub fn new(current: f64, capacity: f64) -> Self {
        Self { current, capacity }
    }

    pub fn percentage(&self) -> f64 {
        if self.capacity > 0.0 {
            self.current / self.capacity * 100.0
        } else {
            0.0
        }
    }

    pub fn level(&self) -> FuelLevel {
        let pct = self.percentage();
        if pct > 50.0 {
            FuelLevel::High
        } else if pct > 20.0 {
            FuelLevel::Medium
        } else {
            FuelLevel::Low
        }
    }

    pub fn low_fuel_warning(&self) -> bool {
        self.percentage() < LOW_FUEL_WARNING_PERCENT
    }
}
