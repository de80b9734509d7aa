// Domain layer: movement and cargo rules, records, and ports.

pub mod cooldown;
pub mod docking;
pub mod errors;
pub mod events;
pub mod fuel;
pub mod inventory;
pub mod outcomes;
pub mod ports;
pub mod sector;
pub mod ship;
pub mod tuning;

pub use cooldown::{CooldownPhase, CooldownTick, CooldownTracker};
pub use docking::{DockingAssessment, DockingRejection, DockingSelection, Station};
pub use errors::{MovementErrorCode, ServerErrorReport};
pub use events::{MovementEvent, MovementEventKind, ShipJumped, StationVisit};
pub use fuel::{SectorType, estimate_fuel_cost};
pub use inventory::{
    CargoBand, CargoLoad, Inventory, InventoryItem, OwnerType, ResourceType, TransferDraft,
    TransferReceipt, TransferRequest,
};
pub use outcomes::{DockOutcome, JumpOutcome, UndockOutcome};
pub use ports::{Clock, GatewayError, InventoryGateway, MovementGateway};
pub use sector::Vector3;
pub use ship::{MovementDataStatus, ShipControls, ShipMovementState, ShipSnapshot};
pub use tuning::MovementTuning;
