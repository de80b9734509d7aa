// Movement error codes reported by the game server and their user-facing text.

use std::fmt;
use std::str::FromStr;

/// Last resort when neither the code nor the payload carries a message.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementErrorCode {
    InsufficientFuel,
    ShipDocked,
    ShipInCombat,
    JumpOnCooldown,
    InvalidSector,
    StationNotFound,
    NotInRange,
    StationFull,
    ShipNotDocked,
    ShipNotFound,
    ValidationError,
}

impl MovementErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementErrorCode::InsufficientFuel => "INSUFFICIENT_FUEL",
            MovementErrorCode::ShipDocked => "SHIP_DOCKED",
            MovementErrorCode::ShipInCombat => "SHIP_IN_COMBAT",
            MovementErrorCode::JumpOnCooldown => "JUMP_ON_COOLDOWN",
            MovementErrorCode::InvalidSector => "INVALID_SECTOR",
            MovementErrorCode::StationNotFound => "STATION_NOT_FOUND",
            MovementErrorCode::NotInRange => "NOT_IN_RANGE",
            MovementErrorCode::StationFull => "STATION_FULL",
            MovementErrorCode::ShipNotDocked => "SHIP_NOT_DOCKED",
            MovementErrorCode::ShipNotFound => "SHIP_NOT_FOUND",
            MovementErrorCode::ValidationError => "VALIDATION_ERROR",
        }
    }

    /// Fixed sentence for this code. `ValidationError` has none and defers to the server.
    pub fn user_message(self) -> Option<&'static str> {
        let message = match self {
            MovementErrorCode::InsufficientFuel => {
                "Not enough fuel for this jump. Find a station to refuel."
            }
            MovementErrorCode::ShipDocked => "You must undock from the station before jumping.",
            MovementErrorCode::ShipInCombat => "Cannot jump or dock while in combat!",
            MovementErrorCode::JumpOnCooldown => "Jump drive is recharging. Wait 10 seconds.",
            MovementErrorCode::InvalidSector => "Invalid sector coordinates. Use format: x.y.z",
            MovementErrorCode::StationNotFound => "Station not found in this sector.",
            MovementErrorCode::NotInRange => "Too far from station. Must be within 5000 units.",
            MovementErrorCode::StationFull => {
                "Station is at maximum capacity. Try another station."
            }
            MovementErrorCode::ShipNotDocked => "Ship is not currently docked at a station.",
            MovementErrorCode::ShipNotFound => "Ship not found.",
            MovementErrorCode::ValidationError => return None,
        };
        Some(message)
    }
}

impl FromStr for MovementErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "INSUFFICIENT_FUEL" => MovementErrorCode::InsufficientFuel,
            "SHIP_DOCKED" => MovementErrorCode::ShipDocked,
            "SHIP_IN_COMBAT" => MovementErrorCode::ShipInCombat,
            "JUMP_ON_COOLDOWN" => MovementErrorCode::JumpOnCooldown,
            "INVALID_SECTOR" => MovementErrorCode::InvalidSector,
            "STATION_NOT_FOUND" => MovementErrorCode::StationNotFound,
            "NOT_IN_RANGE" => MovementErrorCode::NotInRange,
            "STATION_FULL" => MovementErrorCode::StationFull,
            "SHIP_NOT_DOCKED" => MovementErrorCode::ShipNotDocked,
            "SHIP_NOT_FOUND" => MovementErrorCode::ShipNotFound,
            "VALIDATION_ERROR" => MovementErrorCode::ValidationError,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for MovementErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload as returned by the server, with every field optional.
///
/// `code` and `message` come from the nested `error` object; `generic_message`
/// is a top-level `message` some failures carry instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerErrorReport {
    pub code: Option<String>,
    pub message: Option<String>,
    pub generic_message: Option<String>,
}

impl ServerErrorReport {
    pub fn known_code(&self) -> Option<MovementErrorCode> {
        self.code.as_deref().and_then(|code| code.parse().ok())
    }

    /// Message to show the player: code sentence, then server message, then the
    /// generic message, then [`GENERIC_ERROR_MESSAGE`]. Never empty.
    pub fn user_message(&self) -> String {
        self.known_code()
            .and_then(MovementErrorCode::user_message)
            .map(str::to_string)
            .or_else(|| non_empty(self.message.as_deref()))
            .or_else(|| non_empty(self.generic_message.as_deref()))
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
