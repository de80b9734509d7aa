// Immutable results of movement commands, returned once per command.

use crate::domain::docking::Station;
use crate::domain::sector::Vector3;

#[derive(Debug, Clone, PartialEq)]
pub struct JumpOutcome {
    pub success: bool,
    pub ship_id: String,
    pub from_sector: String,
    pub to_sector: String,
    pub fuel_consumed: f64,
    pub fuel_remaining: f64,
    pub position: Vector3,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DockOutcome {
    pub success: bool,
    pub ship_id: String,
    pub station: Station,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndockOutcome {
    pub success: bool,
    pub ship_id: String,
    pub message: Option<String>,
}
