// Movement facts pushed by the server to every interested observer.

use crate::domain::sector::Vector3;

#[derive(Debug, Clone, PartialEq)]
pub struct ShipJumped {
    pub ship_id: String,
    pub player_id: String,
    pub from_sector: String,
    pub to_sector: String,
    pub fuel_consumed: f64,
    pub fuel_remaining: f64,
    pub position: Vector3,
}

/// Shared shape of dock and undock notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct StationVisit {
    pub ship_id: String,
    pub player_id: String,
    pub station_id: String,
    pub station_name: String,
    pub sector: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MovementEvent {
    ShipJumped(ShipJumped),
    ShipDocked(StationVisit),
    ShipUndocked(StationVisit),
}

impl MovementEvent {
    /// Server-side event name used on the push stream.
    pub fn kind(&self) -> MovementEventKind {
        match self {
            MovementEvent::ShipJumped(_) => MovementEventKind::ShipJumped,
            MovementEvent::ShipDocked(_) => MovementEventKind::ShipDocked,
            MovementEvent::ShipUndocked(_) => MovementEventKind::ShipUndocked,
        }
    }

    pub fn ship_id(&self) -> &str {
        match self {
            MovementEvent::ShipJumped(event) => &event.ship_id,
            MovementEvent::ShipDocked(event) | MovementEvent::ShipUndocked(event) => {
                &event.ship_id
            }
        }
    }

    pub fn player_id(&self) -> &str {
        match self {
            MovementEvent::ShipJumped(event) => &event.player_id,
            MovementEvent::ShipDocked(event) | MovementEvent::ShipUndocked(event) => {
                &event.player_id
            }
        }
    }

    pub fn is_for_ship(&self, ship_id: &str) -> bool {
        self.ship_id() == ship_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementEventKind {
    ShipJumped,
    ShipDocked,
    ShipUndocked,
}

impl MovementEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementEventKind::ShipJumped => "SHIP_JUMPED",
            MovementEventKind::ShipDocked => "SHIP_DOCKED",
            MovementEventKind::ShipUndocked => "SHIP_UNDOCKED",
        }
    }

    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "SHIP_JUMPED" => Some(MovementEventKind::ShipJumped),
            "SHIP_DOCKED" => Some(MovementEventKind::ShipDocked),
            "SHIP_UNDOCKED" => Some(MovementEventKind::ShipUndocked),
            _ => None,
        }
    }
}
