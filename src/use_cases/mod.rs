// Use cases layer: movement and cargo workflows driven by the player.

pub mod cooldown_timer;
pub mod inventory;
pub mod movement;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use cooldown_timer::CooldownTimer;
pub use inventory::{CargoHold, InventoryFailure};
pub use movement::{JumpEstimate, MovementController, MovementFailure, ValidationError};
pub use session::{Session, SessionContext};
