// Cached ship movement state and the control affordances derived from it.

use crate::domain::fuel::FuelGauge;
use crate::domain::sector::Vector3;
use crate::domain::tuning::MovementTuning;
use chrono::{DateTime, Utc};

/// Ship record as reported by the server; older servers omit the movement fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipSnapshot {
    pub id: String,
    pub name: Option<String>,
    pub location_sector: String,
    pub position: Option<Vector3>,
    pub docked_at: Option<String>,
    pub last_jump_at: Option<DateTime<Utc>>,
    pub fuel_current: Option<f64>,
    pub fuel_capacity: Option<f64>,
    pub in_combat: Option<bool>,
    pub speed: Option<f64>,
}

/// Fields the server left out and that were filled from tuning defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MissingMovementFields {
    pub fuel_current: bool,
    pub fuel_capacity: bool,
    pub position: bool,
}

impl MissingMovementFields {
    pub fn any(&self) -> bool {
        self.fuel_current || self.fuel_capacity || self.position
    }
}

/// Whether movement figures came from the server or from defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDataStatus {
    Reported,
    Defaulted(MissingMovementFields),
}

impl MovementDataStatus {
    pub fn is_defaulted(&self) -> bool {
        matches!(self, MovementDataStatus::Defaulted(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockStatus {
    Docked,
    FreeFlight,
}

/// Client-side copy of the ship's movement state. The server stays authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipMovementState {
    pub ship_id: String,
    pub name: Option<String>,
    pub sector: String,
    pub position: Vector3,
    pub fuel_current: f64,
    pub fuel_capacity: f64,
    pub docked_at: Option<String>,
    pub last_jump_at: Option<DateTime<Utc>>,
    pub in_combat: bool,
    pub speed: f64,
    pub data_status: MovementDataStatus,
}

impl ShipMovementState {
    pub fn from_snapshot(snapshot: ShipSnapshot, tuning: &MovementTuning) -> Self {
        let missing = MissingMovementFields {
            fuel_current: snapshot.fuel_current.is_none(),
            fuel_capacity: snapshot.fuel_capacity.is_none(),
            position: snapshot.position.is_none(),
        };
        let data_status = if missing.any() {
            MovementDataStatus::Defaulted(missing)
        } else {
            MovementDataStatus::Reported
        };

        Self {
            ship_id: snapshot.id,
            name: snapshot.name,
            sector: snapshot.location_sector,
            position: snapshot.position.unwrap_or(Vector3::ORIGIN),
            fuel_current: snapshot.fuel_current.unwrap_or(tuning.default_fuel_current),
            fuel_capacity: snapshot
                .fuel_capacity
                .unwrap_or(tuning.default_fuel_capacity),
            docked_at: snapshot.docked_at.filter(|id| !id.is_empty()),
            last_jump_at: snapshot.last_jump_at,
            in_combat: snapshot.in_combat.unwrap_or(false),
            speed: snapshot.speed.unwrap_or(tuning.default_ship_speed),
            data_status,
        }
    }

    pub fn dock_status(&self) -> DockStatus {
        if self.docked_at.is_some() {
            DockStatus::Docked
        } else {
            DockStatus::FreeFlight
        }
    }

    pub fn is_docked(&self) -> bool {
        self.docked_at.is_some()
    }

    pub fn fuel_gauge(&self) -> FuelGauge {
        FuelGauge::new(self.fuel_current, self.fuel_capacity)
    }

    /// Which movement actions the controls should offer right now.
    pub fn controls(&self, jump_recharging: bool) -> ShipControls {
        let docked = self.is_docked();
        ShipControls {
            status: self.dock_status(),
            jump_enabled: !docked && !self.in_combat && !jump_recharging,
            dock_enabled: !docked && !self.in_combat,
            undock_enabled: docked,
            using_default_movement_data: self.data_status.is_defaulted(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipControls {
    pub status: DockStatus,
    pub jump_enabled: bool,
    pub dock_enabled: bool,
    pub undock_enabled: bool,
    pub using_default_movement_data: bool,
}
