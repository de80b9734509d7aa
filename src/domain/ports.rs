use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

use crate::domain::docking::Station;
use crate::domain::errors::ServerErrorReport;
use crate::domain::inventory::{Inventory, OwnerType, ResourceType, TransferReceipt, TransferRequest};
use crate::domain::outcomes::{DockOutcome, JumpOutcome, UndockOutcome};
use crate::domain::ship::ShipSnapshot;

// Failures crossing the gateway boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    // The server answered with a non-success status and (maybe) an error payload.
    Rejected {
        status: u16,
        report: ServerErrorReport,
    },
    // The request never produced a response.
    Unavailable(String),
    // A success response that could not be decoded.
    Decode(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Rejected { status, report } => match &report.code {
                Some(code) => write!(f, "server rejected command with {status} ({code})"),
                None => write!(f, "server rejected command with {status}"),
            },
            GatewayError::Unavailable(err) => write!(f, "game server unavailable: {err}"),
            GatewayError::Decode(err) => write!(f, "response decode error: {err}"),
        }
    }
}

impl std::error::Error for GatewayError {}

// Port for the authoritative movement API. Each call is one round trip, never retried.
#[async_trait]
pub trait MovementGateway: Send + Sync {
    async fn jump(&self, ship_id: &str, target_sector: &str) -> Result<JumpOutcome, GatewayError>;
    async fn dock(&self, ship_id: &str, station_id: &str) -> Result<DockOutcome, GatewayError>;
    async fn undock(&self, ship_id: &str) -> Result<UndockOutcome, GatewayError>;
    async fn list_stations(&self, sector: &str) -> Result<Vec<Station>, GatewayError>;
    async fn get_ship(&self, ship_id: &str) -> Result<ShipSnapshot, GatewayError>;
}

// Port for cargo holds and resource transfers.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    // `resource_type` narrows the listing to one resource when set.
    async fn get_inventory(
        &self,
        owner_id: &str,
        owner_type: OwnerType,
        resource_type: Option<ResourceType>,
    ) -> Result<Inventory, GatewayError>;
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, GatewayError>;
}

// Port for retrieving the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
impl<T> MovementGateway for std::sync::Arc<T>
where
    T: MovementGateway + ?Sized,
{
    async fn jump(&self, ship_id: &str, target_sector: &str) -> Result<JumpOutcome, GatewayError> {
        (**self).jump(ship_id, target_sector).await
    }

    async fn dock(&self, ship_id: &str, station_id: &str) -> Result<DockOutcome, GatewayError> {
        (**self).dock(ship_id, station_id).await
    }

    async fn undock(&self, ship_id: &str) -> Result<UndockOutcome, GatewayError> {
        (**self).undock(ship_id).await
    }

    async fn list_stations(&self, sector: &str) -> Result<Vec<Station>, GatewayError> {
        (**self).list_stations(sector).await
    }

    async fn get_ship(&self, ship_id: &str) -> Result<ShipSnapshot, GatewayError> {
        (**self).get_ship(ship_id).await
    }
}

#[async_trait]
impl<T> InventoryGateway for std::sync::Arc<T>
where
    T: InventoryGateway + ?Sized,
{
    async fn get_inventory(
        &self,
        owner_id: &str,
        owner_type: OwnerType,
        resource_type: Option<ResourceType>,
    ) -> Result<Inventory, GatewayError> {
        (**self).get_inventory(owner_id, owner_type, resource_type).await
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, GatewayError> {
        (**self).transfer(request).await
    }
}

impl<T> Clock for std::sync::Arc<T>
where
    T: Clock + ?Sized,
{
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
