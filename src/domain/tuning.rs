//! Gameplay tuning mirrored from the game server for client-side hints.
//!
//! Keep this separate from runtime configuration (URLs, timeouts, tick rates).

use std::time::Duration;

/// Jump drive recharge window after a completed jump.
pub const JUMP_COOLDOWN: Duration = Duration::from_secs(10);

/// Maximum distance between ship and station for docking.
pub const MAX_DOCK_RANGE: f64 = 5000.0;

#[derive(Debug, Clone, Copy)]
pub struct MovementTuning {
    /// Recharge window enforced by the server between jumps.
    pub jump_cooldown: Duration,

    /// Docking range in world distance units.
    pub max_dock_range: f64,

    /// Fuel assumed when the server does not report a fuel level.
    pub default_fuel_current: f64,

    /// Fuel capacity assumed when the server does not report one.
    pub default_fuel_capacity: f64,

    /// Ship speed used for fuel estimates when the ship reports none.
    pub default_ship_speed: f64,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            jump_cooldown: JUMP_COOLDOWN,
            max_dock_range: MAX_DOCK_RANGE,
            default_fuel_current: 100.0,
            default_fuel_capacity: 100.0,
            default_ship_speed: 5.0,
        }
    }
}
