// Wire DTOs for the game server's movement and inventory APIs and push events,
// and their conversions into domain records.

use crate::domain::cooldown::parse_jump_timestamp;
use crate::domain::docking::{Station, StationService, StationType};
use crate::domain::errors::ServerErrorReport;
use crate::domain::events::{MovementEvent, MovementEventKind, ShipJumped, StationVisit};
use crate::domain::inventory::{
    Inventory, InventoryItem, OwnerType, ResourceType, TransferReceipt, TransferRequest,
};
use crate::domain::outcomes::{DockOutcome, JumpOutcome, UndockOutcome};
use crate::domain::sector::Vector3;
use crate::domain::ship::ShipSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every successful REST response wraps its payload in `data`.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct JumpRequest<'a> {
    pub ship_id: &'a str,
    pub target_sector: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DockRequest<'a> {
    pub ship_id: &'a str,
    pub station_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UndockRequest<'a> {
    pub ship_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JumpResponseDto {
    pub success: bool,
    pub ship_id: String,
    pub from_sector: String,
    pub to_sector: String,
    pub fuel_consumed: f64,
    pub fuel_remaining: f64,
    pub position: [f64; 3],
    #[serde(default)]
    pub message: Option<String>,
}

impl From<JumpResponseDto> for JumpOutcome {
    fn from(dto: JumpResponseDto) -> Self {
        Self {
            success: dto.success,
            ship_id: dto.ship_id,
            from_sector: dto.from_sector,
            to_sector: dto.to_sector,
            fuel_consumed: dto.fuel_consumed,
            fuel_remaining: dto.fuel_remaining,
            position: Vector3::from(dto.position),
            message: dto.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationDto {
    pub id: String,
    pub name: String,
    pub location_sector: String,
    pub station_type: StationType,
    pub position: Vector3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction_id: Option<String>,
    #[serde(default)]
    pub services: Vec<StationService>,
    pub docking_capacity: u32,
    pub docked_ships_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<StationDto> for Station {
    fn from(dto: StationDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            sector: dto.location_sector,
            station_type: dto.station_type,
            position: dto.position,
            services: dto.services,
            docking_capacity: dto.docking_capacity,
            docked_ships_count: dto.docked_ships_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockResponseDto {
    pub success: bool,
    pub ship_id: String,
    pub station: StationDto,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<DockResponseDto> for DockOutcome {
    fn from(dto: DockResponseDto) -> Self {
        Self {
            success: dto.success,
            ship_id: dto.ship_id,
            station: Station::from(dto.station),
            message: dto.message,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UndockResponseDto {
    pub success: bool,
    pub ship_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<UndockResponseDto> for UndockOutcome {
    fn from(dto: UndockResponseDto) -> Self {
        Self {
            success: dto.success,
            ship_id: dto.ship_id,
            message: dto.message,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationListDto {
    #[serde(default)]
    pub stations: Vec<StationDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShipStatsDto {
    #[serde(default)]
    pub speed: Option<f64>,
}

// Older servers leave every movement field out, so they are all optional here.
#[derive(Debug, Clone, Deserialize)]
pub struct ShipDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub location_sector: String,
    #[serde(default)]
    pub position: Option<Vector3>,
    #[serde(default)]
    pub docked_at: Option<String>,
    #[serde(default)]
    pub last_jump_at: Option<String>,
    #[serde(default)]
    pub fuel_current: Option<f64>,
    #[serde(default)]
    pub fuel_capacity: Option<f64>,
    #[serde(default)]
    pub in_combat: Option<bool>,
    #[serde(default)]
    pub stat_allocation: Option<ShipStatsDto>,
}

impl From<ShipDto> for ShipSnapshot {
    fn from(dto: ShipDto) -> Self {
        let last_jump_at = dto.last_jump_at.as_deref().and_then(|raw| {
            parse_jump_timestamp(raw)
                .inspect_err(|e| {
                    tracing::warn!(ship_id = %dto.id, error = %e, "ignoring unreadable last_jump_at");
                })
                .ok()
        });

        Self {
            id: dto.id,
            name: dto.name,
            location_sector: dto.location_sector,
            position: dto.position,
            docked_at: dto.docked_at,
            last_jump_at,
            fuel_current: dto.fuel_current,
            fuel_capacity: dto.fuel_capacity,
            in_combat: dto.in_combat,
            speed: dto.stat_allocation.and_then(|stats| stats.speed),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemDto {
    pub id: String,
    pub resource_type: ResourceType,
    pub quantity: u32,
    pub quality: f64,
    pub unit_volume: f64,
    pub total_volume: f64,
}

impl From<InventoryItemDto> for InventoryItem {
    fn from(dto: InventoryItemDto) -> Self {
        Self {
            id: dto.id,
            resource_type: dto.resource_type,
            quantity: dto.quantity,
            quality: dto.quality,
            unit_volume: dto.unit_volume,
            total_volume: dto.total_volume,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryDto {
    pub owner_id: String,
    pub owner_type: OwnerType,
    pub capacity: f64,
    pub used: f64,
    #[serde(default)]
    pub items: Vec<InventoryItemDto>,
}

impl From<InventoryDto> for Inventory {
    fn from(dto: InventoryDto) -> Self {
        Self {
            owner_id: dto.owner_id,
            owner_type: dto.owner_type,
            capacity: dto.capacity,
            used: dto.used,
            items: dto.items.into_iter().map(InventoryItem::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransferRequestDto<'a> {
    pub source_id: &'a str,
    pub source_type: OwnerType,
    pub target_id: &'a str,
    pub target_type: OwnerType,
    pub resource_type: ResourceType,
    pub quantity: u32,
    pub quality: f64,
}

impl<'a> From<&'a TransferRequest> for TransferRequestDto<'a> {
    fn from(request: &'a TransferRequest) -> Self {
        Self {
            source_id: &request.source_id,
            source_type: request.source_type,
            target_id: &request.target_id,
            target_type: request.target_type,
            resource_type: request.resource_type,
            quantity: request.quantity,
            quality: request.quality,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferResponseDto {
    pub transfer_id: String,
    pub source_remaining: u32,
    pub target_new_total: u32,
    pub timestamp: String,
}

impl From<TransferResponseDto> for TransferReceipt {
    fn from(dto: TransferResponseDto) -> Self {
        Self {
            transfer_id: dto.transfer_id,
            source_remaining: dto.source_remaining,
            target_new_total: dto.target_new_total,
            timestamp: dto.timestamp,
        }
    }
}

/// Error payload; servers send `{"error": {code, message}}`, `{"message"}`, or
/// both. Fields are kept loose so an odd shape in one of them (a bare string
/// `error`, say) does not discard the other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

fn text_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

impl From<ApiErrorBody> for ServerErrorReport {
    fn from(body: ApiErrorBody) -> Self {
        let detail = body.error.as_ref().and_then(Value::as_object);
        Self {
            code: text_field(detail.and_then(|detail| detail.get("code"))),
            message: text_field(detail.and_then(|detail| detail.get("message"))),
            generic_message: text_field(body.message.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipJumpedDto {
    pub ship_id: String,
    pub player_id: String,
    pub from_sector: String,
    pub to_sector: String,
    pub fuel_consumed: f64,
    pub fuel_remaining: f64,
    pub position: [f64; 3],
}

impl From<ShipJumpedDto> for ShipJumped {
    fn from(dto: ShipJumpedDto) -> Self {
        Self {
            ship_id: dto.ship_id,
            player_id: dto.player_id,
            from_sector: dto.from_sector,
            to_sector: dto.to_sector,
            fuel_consumed: dto.fuel_consumed,
            fuel_remaining: dto.fuel_remaining,
            position: Vector3::from(dto.position),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationVisitDto {
    pub ship_id: String,
    pub player_id: String,
    pub station_id: String,
    pub station_name: String,
    pub sector: String,
}

impl From<StationVisitDto> for StationVisit {
    fn from(dto: StationVisitDto) -> Self {
        Self {
            ship_id: dto.ship_id,
            player_id: dto.player_id,
            station_id: dto.station_id,
            station_name: dto.station_name,
            sector: dto.sector,
        }
    }
}

/// Decodes one pushed event. Unknown event names yield `Ok(None)`.
pub fn decode_movement_event(
    event_name: &str,
    data: &str,
) -> Result<Option<MovementEvent>, serde_json::Error> {
    let Some(kind) = MovementEventKind::from_event_name(event_name) else {
        return Ok(None);
    };

    let event = match kind {
        MovementEventKind::ShipJumped => {
            MovementEvent::ShipJumped(serde_json::from_str::<ShipJumpedDto>(data)?.into())
        }
        MovementEventKind::ShipDocked => {
            MovementEvent::ShipDocked(serde_json::from_str::<StationVisitDto>(data)?.into())
        }
        MovementEventKind::ShipUndocked => {
            MovementEvent::ShipUndocked(serde_json::from_str::<StationVisitDto>(data)?.into())
        }
    };
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_ship_payload_lacks_movement_fields_then_snapshot_leaves_them_empty() {
        let dto: ShipDto = serde_json::from_value(json!({
            "id": "ship-1",
            "owner_id": "player-1",
            "ship_type": "scout",
            "location_sector": "0.0.0",
            "hull_points": 100,
            "created_at": "2026-01-01T00:00:00Z"
        }))
        .expect("legacy ship payload");

        let snapshot = ShipSnapshot::from(dto);

        assert_eq!(snapshot.fuel_current, None);
        assert_eq!(snapshot.position, None);
        assert_eq!(snapshot.last_jump_at, None);
    }

    #[test]
    fn when_ship_payload_has_stats_and_timestamp_then_they_are_mapped() {
        let dto: ShipDto = serde_json::from_value(json!({
            "id": "ship-1",
            "location_sector": "0.0.0",
            "position": {"x": 1.0, "y": 2.0, "z": 3.0},
            "last_jump_at": "2026-03-01T12:00:00.125Z",
            "fuel_current": 42.5,
            "fuel_capacity": 150.0,
            "stat_allocation": {"speed": 8, "hull_strength": 3}
        }))
        .expect("ship payload");

        let snapshot = ShipSnapshot::from(dto);

        assert_eq!(snapshot.position, Some(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(snapshot.speed, Some(8.0));
        assert!(snapshot.last_jump_at.is_some());
    }

    #[test]
    fn when_last_jump_is_unreadable_then_it_is_dropped() {
        let dto: ShipDto = serde_json::from_value(json!({
            "id": "ship-1",
            "location_sector": "0.0.0",
            "last_jump_at": "not a time"
        }))
        .expect("ship payload");

        assert_eq!(ShipSnapshot::from(dto).last_jump_at, None);
    }

    #[test]
    fn when_error_body_is_nested_then_code_and_message_are_extracted() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "error": {"code": "STATION_FULL", "message": "no berth"}
        }))
        .expect("error body");

        let report = ServerErrorReport::from(body);

        assert_eq!(report.code.as_deref(), Some("STATION_FULL"));
        assert_eq!(report.message.as_deref(), Some("no berth"));
        assert_eq!(report.generic_message, None);
    }

    #[test]
    fn when_error_body_is_flat_then_message_becomes_generic() {
        let body: ApiErrorBody =
            serde_json::from_value(json!({"message": "Unauthorized"})).expect("error body");

        let report = ServerErrorReport::from(body);

        assert_eq!(report.user_message(), "Unauthorized");
    }

    #[test]
    fn when_error_field_is_a_bare_string_then_top_level_message_survives() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error":"Unauthorized","message":"Token expired"}"#)
                .expect("error body");

        let report = ServerErrorReport::from(body);

        assert_eq!(report.code, None);
        assert_eq!(report.user_message(), "Token expired");
    }

    #[test]
    fn when_error_fields_are_not_text_then_they_are_skipped() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "error": {"code": 409, "message": "berth taken"},
            "message": null
        }))
        .expect("error body");

        let report = ServerErrorReport::from(body);

        assert_eq!(report.code, None);
        assert_eq!(report.user_message(), "berth taken");
    }

    #[test]
    fn when_station_list_is_decoded_then_station_fields_map() {
        let envelope: DataEnvelope<StationListDto> = serde_json::from_value(json!({
            "data": {"stations": [{
                "id": "st-1",
                "name": "Halcyon",
                "location_sector": "0.0.0",
                "station_type": "research",
                "position": {"x": 0.0, "y": 4000.0, "z": 0.0},
                "services": ["refuel", "missions"],
                "docking_capacity": 5,
                "docked_ships_count": 2,
                "created_at": "2026-01-01T00:00:00Z"
            }]}
        }))
        .expect("station list");

        let station = Station::from(envelope.data.stations[0].clone());

        assert_eq!(station.station_type, StationType::Research);
        assert!(station.offers(StationService::Missions));
        assert_eq!(station.sector, "0.0.0");
    }

    #[test]
    fn when_inventory_is_decoded_then_resource_names_map() {
        let envelope: DataEnvelope<InventoryDto> = serde_json::from_value(json!({
            "data": {
                "owner_id": "ship-1",
                "owner_type": "ship",
                "capacity": 200,
                "used": 170,
                "items": [{
                    "id": "item-1",
                    "resource_type": "exotic_crystals",
                    "quantity": 5,
                    "quality": 1.2,
                    "unit_volume": 4.0,
                    "total_volume": 20.0
                }]
            }
        }))
        .expect("inventory");

        let inventory = Inventory::from(envelope.data);

        assert_eq!(inventory.owner_type, OwnerType::Ship);
        assert_eq!(inventory.items[0].resource_type, ResourceType::ExoticCrystals);
        assert_eq!(inventory.cargo().band(), crate::domain::inventory::CargoBand::NearFull);
    }

    #[test]
    fn when_transfer_is_encoded_then_enums_use_wire_names() {
        let request = TransferRequest {
            source_id: "ship-1".to_string(),
            source_type: OwnerType::Ship,
            target_id: "st-near".to_string(),
            target_type: OwnerType::Station,
            resource_type: ResourceType::IceWater,
            quantity: 3,
            quality: 1.0,
        };

        let body = serde_json::to_value(TransferRequestDto::from(&request)).expect("encode");

        assert_eq!(body["source_type"], "ship");
        assert_eq!(body["target_type"], "station");
        assert_eq!(body["resource_type"], "ice_water");
        assert_eq!(body["quantity"], 3);
    }

    #[test]
    fn when_jump_event_is_valid_then_it_decodes() {
        let data = json!({
            "ship_id": "ship-1",
            "player_id": "player-1",
            "from_sector": "0.0.0",
            "to_sector": "1.0.0",
            "fuel_consumed": 0.2,
            "fuel_remaining": 99.8,
            "position": [1.0, 0.0, 0.0]
        })
        .to_string();

        let event = decode_movement_event("SHIP_JUMPED", &data)
            .expect("valid payload")
            .expect("known event");

        assert_eq!(event.kind(), MovementEventKind::ShipJumped);
        assert!(event.is_for_ship("ship-1"));
    }

    #[test]
    fn when_jump_event_is_malformed_then_decode_fails() {
        let result = decode_movement_event("SHIP_JUMPED", r#"{"ship_id": 7"#);

        assert!(result.is_err());
    }

    #[test]
    fn when_event_name_is_not_a_movement_event_then_it_is_skipped() {
        let result = decode_movement_event("PLAYER_NOTICE", "{}").expect("not decoded");

        assert!(result.is_none());
    }
}
