// Cargo holds, their fill bands, and resource transfers between owners.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fill percentage at which the hold is flagged as nearly full.
pub const NEAR_FULL_PERCENT: f64 = 80.0;

pub const TRANSFER_FAILED_MESSAGE: &str = "Transfer failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    Ship,
    Station,
    Planet,
}

impl OwnerType {
    pub fn as_str(self) -> &'static str {
        match self {
            OwnerType::Ship => "ship",
            OwnerType::Station => "station",
            OwnerType::Planet => "planet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    IronOre,
    IceWater,
    Silicates,
    Hydrogen,
    Carbon,
    TitaniumOre,
    Platinum,
    RareEarth,
    XenonGas,
    Antimatter,
    ExoticCrystals,
    AncientArtifacts,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::IronOre => "iron_ore",
            ResourceType::IceWater => "ice_water",
            ResourceType::Silicates => "silicates",
            ResourceType::Hydrogen => "hydrogen",
            ResourceType::Carbon => "carbon",
            ResourceType::TitaniumOre => "titanium_ore",
            ResourceType::Platinum => "platinum",
            ResourceType::RareEarth => "rare_earth",
            ResourceType::XenonGas => "xenon_gas",
            ResourceType::Antimatter => "antimatter",
            ResourceType::ExoticCrystals => "exotic_crystals",
            ResourceType::AncientArtifacts => "ancient_artifacts",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub id: String,
    pub resource_type: ResourceType,
    pub quantity: u32,
    pub quality: f64,
    pub unit_volume: f64,
    pub total_volume: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    pub owner_id: String,
    pub owner_type: OwnerType,
    pub capacity: f64,
    // Server-reported; may exceed capacity.
    pub used: f64,
    pub items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn cargo(&self) -> CargoLoad {
        CargoLoad::new(self.used, self.capacity)
    }

    pub fn item(&self, item_id: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Display band for a cargo hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CargoBand {
    Normal,
    NearFull,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CargoLoad {
    pub used: f64,
    pub capacity: f64,
}

impl CargoLoad {
    pub fn new(used: f64, capacity: f64) -> Self {
        Self { used, capacity }
    }

    /// Share of capacity in use, unclamped. A hold with no capacity reads as full.
    pub fn percentage(&self) -> f64 {
        if self.capacity > 0.0 {
            self.used / self.capacity * 100.0
        } else {
            100.0
        }
    }

    /// Width of the fill bar, capped at 100.
    pub fn fill_percent(&self) -> f64 {
        self.percentage().clamp(0.0, 100.0)
    }

    pub fn band(&self) -> CargoBand {
        let pct = self.percentage();
        if pct >= 100.0 {
            CargoBand::Full
        } else if pct >= NEAR_FULL_PERCENT {
            CargoBand::NearFull
        } else {
            CargoBand::Normal
        }
    }

    /// `"used / capacity units (pct%)"`, as shown above the bar.
    pub fn label(&self) -> String {
        format!(
            "{} / {} units ({:.1}%)",
            self.used,
            self.capacity,
            self.percentage()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub source_id: String,
    pub source_type: OwnerType,
    pub target_id: String,
    pub target_type: OwnerType,
    pub resource_type: ResourceType,
    pub quantity: u32,
    pub quality: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub transfer_id: String,
    pub source_remaining: u32,
    pub target_new_total: u32,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransferRejection {
    MissingTarget,
    NothingToMove,
}

impl TransferRejection {
    pub fn user_message(&self) -> &'static str {
        match self {
            TransferRejection::MissingTarget => "Enter a target to transfer to.",
            TransferRejection::NothingToMove => "Choose at least one unit to transfer.",
        }
    }
}

impl fmt::Display for TransferRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferRejection::MissingTarget => write!(f, "transfer has no target id"),
            TransferRejection::NothingToMove => write!(f, "transfer quantity is zero"),
        }
    }
}

impl std::error::Error for TransferRejection {}

/// A transfer being filled in for one item. Quantity always stays within what the
/// item holds, and quality is carried over from the item.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferDraft {
    source_id: String,
    source_type: OwnerType,
    resource_type: ResourceType,
    quality: f64,
    available: u32,
    pub target_id: String,
    pub target_type: OwnerType,
    quantity: u32,
}

impl TransferDraft {
    pub fn new(source_id: &str, source_type: OwnerType, item: &InventoryItem) -> Self {
        Self {
            source_id: source_id.to_string(),
            source_type,
            resource_type: item.resource_type,
            quality: item.quality,
            available: item.quantity,
            target_id: String::new(),
            target_type: OwnerType::Station,
            quantity: item.quantity.min(1),
        }
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.min(self.available);
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate(&self) -> Result<(), TransferRejection> {
        if self.target_id.trim().is_empty() {
            return Err(TransferRejection::MissingTarget);
        }
        if self.quantity == 0 {
            return Err(TransferRejection::NothingToMove);
        }
        Ok(())
    }

    pub fn into_request(self) -> Result<TransferRequest, TransferRejection> {
        self.validate()?;
        Ok(TransferRequest {
            source_id: self.source_id,
            source_type: self.source_type,
            target_id: self.target_id.trim().to_string(),
            target_type: self.target_type,
            resource_type: self.resource_type,
            quantity: self.quantity,
            quality: self.quality,
        })
    }
}
