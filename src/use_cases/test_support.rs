use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::docking::{Station, StationService, StationType};
use crate::domain::inventory::{
    Inventory, InventoryItem, OwnerType, ResourceType, TransferReceipt, TransferRequest,
};
use crate::domain::outcomes::{DockOutcome, JumpOutcome, UndockOutcome};
use crate::domain::ports::{Clock, GatewayError, InventoryGateway, MovementGateway};
use crate::domain::sector::Vector3;
use crate::domain::ship::ShipSnapshot;

// Wall clock that only moves when a test advances it.
#[derive(Clone)]
pub(crate) struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl Default for ManualClock {
    fn default() -> Self {
        let start = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .expect("fixed start instant")
            .with_timezone(&Utc);
        Self(Arc::new(Mutex::new(start)))
    }
}

impl ManualClock {
    pub(crate) fn advance(&self, by: TimeDelta) {
        let mut guard = self.0.lock().expect("clock mutex poisoned");
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock mutex poisoned")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GatewayCall {
    Jump { ship_id: String, target_sector: String },
    Dock { ship_id: String, station_id: String },
    Undock { ship_id: String },
    ListStations { sector: String },
    GetShip { ship_id: String },
}

// Gateway fake that records every call and replays queued responses.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    calls: Mutex<Vec<GatewayCall>>,
    jumps: Mutex<VecDeque<Result<JumpOutcome, GatewayError>>>,
    docks: Mutex<VecDeque<Result<DockOutcome, GatewayError>>>,
    undocks: Mutex<VecDeque<Result<UndockOutcome, GatewayError>>>,
    ships: Mutex<VecDeque<Result<ShipSnapshot, GatewayError>>>,
    stations: Mutex<Vec<Station>>,
}

impl ScriptedGateway {
    pub(crate) fn push_jump(&self, result: Result<JumpOutcome, GatewayError>) {
        self.jumps.lock().expect("jumps mutex poisoned").push_back(result);
    }

    pub(crate) fn push_dock(&self, result: Result<DockOutcome, GatewayError>) {
        self.docks.lock().expect("docks mutex poisoned").push_back(result);
    }

    pub(crate) fn push_undock(&self, result: Result<UndockOutcome, GatewayError>) {
        self.undocks
            .lock()
            .expect("undocks mutex poisoned")
            .push_back(result);
    }

    pub(crate) fn push_ship(&self, result: Result<ShipSnapshot, GatewayError>) {
        self.ships.lock().expect("ships mutex poisoned").push_back(result);
    }

    pub(crate) fn set_stations(&self, stations: Vec<Station>) {
        *self.stations.lock().expect("stations mutex poisoned") = stations;
    }

    pub(crate) fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

fn next<T>(queue: &Mutex<VecDeque<Result<T, GatewayError>>>) -> Result<T, GatewayError> {
    queue
        .lock()
        .expect("script mutex poisoned")
        .pop_front()
        .unwrap_or_else(|| Err(GatewayError::Unavailable("no scripted response".to_string())))
}

#[async_trait]
impl MovementGateway for ScriptedGateway {
    async fn jump(&self, ship_id: &str, target_sector: &str) -> Result<JumpOutcome, GatewayError> {
        self.record(GatewayCall::Jump {
            ship_id: ship_id.to_string(),
            target_sector: target_sector.to_string(),
        });
        next(&self.jumps)
    }

    async fn dock(&self, ship_id: &str, station_id: &str) -> Result<DockOutcome, GatewayError> {
        self.record(GatewayCall::Dock {
            ship_id: ship_id.to_string(),
            station_id: station_id.to_string(),
        });
        next(&self.docks)
    }

    async fn undock(&self, ship_id: &str) -> Result<UndockOutcome, GatewayError> {
        self.record(GatewayCall::Undock {
            ship_id: ship_id.to_string(),
        });
        next(&self.undocks)
    }

    async fn list_stations(&self, sector: &str) -> Result<Vec<Station>, GatewayError> {
        self.record(GatewayCall::ListStations {
            sector: sector.to_string(),
        });
        Ok(self.stations.lock().expect("stations mutex poisoned").clone())
    }

    async fn get_ship(&self, ship_id: &str) -> Result<ShipSnapshot, GatewayError> {
        self.record(GatewayCall::GetShip {
            ship_id: ship_id.to_string(),
        });
        next(&self.ships)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum InventoryCall {
    GetInventory {
        owner_id: String,
        owner_type: OwnerType,
        resource_type: Option<ResourceType>,
    },
    Transfer(TransferRequest),
}

// Inventory fake with the same record-and-replay behavior as `ScriptedGateway`.
#[derive(Default)]
pub(crate) struct ScriptedInventory {
    calls: Mutex<Vec<InventoryCall>>,
    inventories: Mutex<VecDeque<Result<Inventory, GatewayError>>>,
    transfers: Mutex<VecDeque<Result<TransferReceipt, GatewayError>>>,
}

impl ScriptedInventory {
    pub(crate) fn push_inventory(&self, result: Result<Inventory, GatewayError>) {
        self.inventories
            .lock()
            .expect("inventories mutex poisoned")
            .push_back(result);
    }

    pub(crate) fn push_transfer(&self, result: Result<TransferReceipt, GatewayError>) {
        self.transfers
            .lock()
            .expect("transfers mutex poisoned")
            .push_back(result);
    }

    pub(crate) fn calls(&self) -> Vec<InventoryCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: InventoryCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

#[async_trait]
impl InventoryGateway for ScriptedInventory {
    async fn get_inventory(
        &self,
        owner_id: &str,
        owner_type: OwnerType,
        resource_type: Option<ResourceType>,
    ) -> Result<Inventory, GatewayError> {
        self.record(InventoryCall::GetInventory {
            owner_id: owner_id.to_string(),
            owner_type,
            resource_type,
        });
        next(&self.inventories)
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, GatewayError> {
        self.record(InventoryCall::Transfer(request.clone()));
        next(&self.transfers)
    }
}

pub(crate) fn ore_item(id: &str, quantity: u32) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        resource_type: ResourceType::IronOre,
        quantity,
        quality: 1.0,
        unit_volume: 2.0,
        total_volume: 2.0 * f64::from(quantity),
    }
}

pub(crate) fn inventory(items: Vec<InventoryItem>, used: f64, capacity: f64) -> Inventory {
    Inventory {
        owner_id: "ship-1".to_string(),
        owner_type: OwnerType::Ship,
        capacity,
        used,
        items,
    }
}

pub(crate) fn ship_snapshot(id: &str, sector: &str) -> ShipSnapshot {
    ShipSnapshot {
        id: id.to_string(),
        name: Some("Kestrel".to_string()),
        location_sector: sector.to_string(),
        position: Some(Vector3::ORIGIN),
        docked_at: None,
        last_jump_at: None,
        fuel_current: Some(100.0),
        fuel_capacity: Some(100.0),
        in_combat: Some(false),
        speed: None,
    }
}

pub(crate) fn jump_outcome(from: &str, to: &str, consumed: f64, remaining: f64) -> JumpOutcome {
    JumpOutcome {
        success: true,
        ship_id: "ship-1".to_string(),
        from_sector: from.to_string(),
        to_sector: to.to_string(),
        fuel_consumed: consumed,
        fuel_remaining: remaining,
        position: Vector3::new(1.0, 2.0, 3.0),
        message: None,
    }
}

// Station on the x axis at distance `x` from the origin.
pub(crate) fn station(id: &str, x: f64, capacity: u32, docked: u32) -> Station {
    Station {
        id: id.to_string(),
        name: format!("Station {id}"),
        sector: "0.0.0".to_string(),
        station_type: StationType::Trade,
        position: Vector3::new(x, 0.0, 0.0),
        services: vec![StationService::Market, StationService::Refuel],
        docking_capacity: capacity,
        docked_ships_count: docked,
    }
}
