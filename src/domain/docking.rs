// Station records and docking eligibility.

use crate::domain::sector::{Vector3, distance};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    Trade,
    Military,
    Research,
    Mining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationService {
    Market,
    Refuel,
    Repair,
    Missions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub sector: String,
    pub station_type: StationType,
    pub position: Vector3,
    pub services: Vec<StationService>,
    pub docking_capacity: u32,
    // Server-authoritative; not clamped to capacity here.
    pub docked_ships_count: u32,
}

impl Station {
    pub fn has_free_berth(&self) -> bool {
        self.docked_ships_count < self.docking_capacity
    }

    pub fn offers(&self, service: StationService) -> bool {
        self.services.contains(&service)
    }
}

/// Eligibility of one station for the ship's current position.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingAssessment {
    pub station_id: String,
    pub distance: f64,
    pub in_range: bool,
    pub has_capacity: bool,
    pub can_dock: bool,
}

/// Evaluates a single station. Pure: identical inputs always give identical results.
pub fn assess_station(ship_position: Vector3, station: &Station, max_range: f64) -> DockingAssessment {
    let distance = distance(ship_position, station.position);
    let in_range = distance <= max_range;
    let has_capacity = station.has_free_berth();

    DockingAssessment {
        station_id: station.id.clone(),
        distance,
        in_range,
        has_capacity,
        can_dock: in_range && has_capacity,
    }
}

pub fn assess_stations(
    ship_position: Vector3,
    stations: &[Station],
    max_range: f64,
) -> Vec<DockingAssessment> {
    stations
        .iter()
        .map(|station| assess_station(ship_position, station, max_range))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum DockingRejection {
    UnknownStation { station_id: String },
    OutOfRange {
        station_id: String,
        distance: f64,
        max_range: f64,
    },
    StationFull { station_id: String },
    NothingSelected,
}

impl DockingRejection {
    /// Human-readable reason shown next to the docking controls.
    pub fn user_message(&self) -> String {
        match self {
            DockingRejection::UnknownStation { .. } => "Station not found in this sector.".to_string(),
            DockingRejection::OutOfRange { max_range, .. } => {
                format!("Too far from station. Must be within {max_range:.0} units.")
            }
            DockingRejection::StationFull { .. } => {
                "Station is at maximum capacity. Try another station.".to_string()
            }
            DockingRejection::NothingSelected => "Select a station to dock at.".to_string(),
        }
    }
}

impl fmt::Display for DockingRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockingRejection::UnknownStation { station_id } => {
                write!(f, "station {station_id} is not in the current sector listing")
            }
            DockingRejection::OutOfRange {
                station_id,
                distance,
                ..
            } => write!(f, "station {station_id} is out of range ({distance:.0} units)"),
            DockingRejection::StationFull { station_id } => {
                write!(f, "station {station_id} has no free docking slots")
            }
            DockingRejection::NothingSelected => write!(f, "no station selected"),
        }
    }
}

impl std::error::Error for DockingRejection {}

/// Single-select station choice. Ineligible stations can never become selected.
#[derive(Debug, Clone, Default)]
pub struct DockingSelection {
    selected: Option<String>,
}

impl DockingSelection {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Selects `station_id`, replacing any previous choice.
    ///
    /// A rejected attempt leaves the previous selection untouched.
    pub fn select(
        &mut self,
        station_id: &str,
        ship_position: Vector3,
        stations: &[Station],
        max_range: f64,
    ) -> Result<DockingAssessment, DockingRejection> {
        let assessment = eligible_station(station_id, ship_position, stations, max_range)?;
        self.selected = Some(assessment.station_id.clone());
        Ok(assessment)
    }

    /// Re-checks the current selection right before a dock command is issued.
    pub fn confirm(
        &self,
        ship_position: Vector3,
        stations: &[Station],
        max_range: f64,
    ) -> Result<DockingAssessment, DockingRejection> {
        let station_id = self
            .selected
            .as_deref()
            .ok_or(DockingRejection::NothingSelected)?;
        eligible_station(station_id, ship_position, stations, max_range)
    }
}

fn eligible_station(
    station_id: &str,
    ship_position: Vector3,
    stations: &[Station],
    max_range: f64,
) -> Result<DockingAssessment, DockingRejection> {
    let station = stations
        .iter()
        .find(|station| station.id == station_id)
        .ok_or_else(|| DockingRejection::UnknownStation {
            station_id: station_id.to_string(),
        })?;

    let assessment = assess_station(ship_position, station, max_range);
    if !assessment.in_range {
        return Err(DockingRejection::OutOfRange {
            station_id: assessment.station_id,
            distance: assessment.distance,
            max_range,
        });
    }
    if !assessment.has_capacity {
        return Err(DockingRejection::StationFull {
            station_id: assessment.station_id,
        });
    }
    Ok(assessment)
}
