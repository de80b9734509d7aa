// Cargo hold workflow for one ship: load the hold, pick an item, move some of it
// to another owner, then reload so the hold reflects the server.

use crate::domain::errors::ServerErrorReport;
use crate::domain::inventory::{
    CargoLoad, Inventory, InventoryItem, OwnerType, TRANSFER_FAILED_MESSAGE, TransferDraft,
    TransferReceipt, TransferRejection,
};
use crate::domain::ports::{GatewayError, InventoryGateway};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum InventoryFailure {
    Invalid(TransferRejection),
    UnknownItem { item_id: String },
    Load { message: String },
    Transfer { message: String },
}

impl InventoryFailure {
    pub fn user_message(&self) -> String {
        match self {
            InventoryFailure::Invalid(rejection) => rejection.user_message().to_string(),
            InventoryFailure::UnknownItem { .. } => "That item is no longer in the hold.".to_string(),
            InventoryFailure::Load { message } | InventoryFailure::Transfer { message } => {
                message.clone()
            }
        }
    }

    fn load(err: GatewayError) -> Self {
        let message = match err {
            GatewayError::Rejected { report, .. } => report.user_message(),
            GatewayError::Unavailable(_) | GatewayError::Decode(_) => {
                ServerErrorReport::default().user_message()
            }
        };
        InventoryFailure::Load { message }
    }

    // Transfers only surface the server's own message; codes have no sentence here.
    fn transfer(err: GatewayError) -> Self {
        let message = match err {
            GatewayError::Rejected { report, .. } => report
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| TRANSFER_FAILED_MESSAGE.to_string()),
            GatewayError::Unavailable(_) | GatewayError::Decode(_) => {
                TRANSFER_FAILED_MESSAGE.to_string()
            }
        };
        InventoryFailure::Transfer { message }
    }
}

impl fmt::Display for InventoryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for InventoryFailure {}

impl From<TransferRejection> for InventoryFailure {
    fn from(rejection: TransferRejection) -> Self {
        InventoryFailure::Invalid(rejection)
    }
}

pub struct CargoHold<G> {
    gateway: G,
    ship_id: String,
    inventory: Inventory,
    selected: Option<String>,
}

impl<G: InventoryGateway> CargoHold<G> {
    #[tracing::instrument(name = "cargo.load", skip(gateway))]
    pub async fn load(gateway: G, ship_id: &str) -> Result<Self, InventoryFailure> {
        let inventory = gateway
            .get_inventory(ship_id, OwnerType::Ship, None)
            .await
            .inspect_err(|e| warn!(error = %e, "failed to load cargo hold"))
            .map_err(InventoryFailure::load)?;
        Ok(Self {
            gateway,
            ship_id: ship_id.to_string(),
            inventory,
            selected: None,
        })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn cargo(&self) -> CargoLoad {
        self.inventory.cargo()
    }

    pub async fn refresh(&mut self) -> Result<&Inventory, InventoryFailure> {
        let inventory = self
            .gateway
            .get_inventory(&self.ship_id, OwnerType::Ship, None)
            .await
            .map_err(InventoryFailure::load)?;
        self.inventory = inventory;
        // A selection whose item vanished is dropped.
        if let Some(id) = &self.selected
            && self.inventory.item(id).is_none()
        {
            self.selected = None;
        }
        Ok(&self.inventory)
    }

    pub fn select_item(&mut self, item_id: &str) -> Result<&InventoryItem, InventoryFailure> {
        let item = self
            .inventory
            .item(item_id)
            .ok_or_else(|| InventoryFailure::UnknownItem {
                item_id: item_id.to_string(),
            })?;
        self.selected = Some(item.id.clone());
        Ok(item)
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected_item(&self) -> Option<&InventoryItem> {
        self.selected.as_deref().and_then(|id| self.inventory.item(id))
    }

    /// Starts a transfer of the selected item out of this ship's hold.
    pub fn draft_transfer(&self) -> Option<TransferDraft> {
        self.selected_item()
            .map(|item| TransferDraft::new(&self.ship_id, OwnerType::Ship, item))
    }

    /// Sends one transfer. On success the selection is cleared and the hold reloaded;
    /// a failed reload leaves the previous contents in place.
    #[tracing::instrument(name = "cargo.transfer", skip_all, fields(ship_id = %self.ship_id))]
    pub async fn transfer(&mut self, draft: TransferDraft) -> Result<TransferReceipt, InventoryFailure> {
        let request = draft.into_request()?;
        let receipt = self
            .gateway
            .transfer(&request)
            .await
            .inspect_err(|e| warn!(error = %e, "transfer rejected"))
            .map_err(InventoryFailure::transfer)?;

        info!(
            transfer_id = %receipt.transfer_id,
            resource = %request.resource_type,
            quantity = request.quantity,
            source_remaining = receipt.source_remaining,
            "transfer completed"
        );

        self.selected = None;
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "cargo hold not reloaded after transfer");
        }
        Ok(receipt)
    }
}
