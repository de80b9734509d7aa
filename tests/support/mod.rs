// Stub game server shared by the integration tests, booted once per test binary.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::{Stream, StreamExt, stream};
use serde::Deserialize;
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{Arc, OnceLock},
    time::Duration,
};

pub const ACCESS_TOKEN: &str = "token-1";
// Ship that only answers callers carrying `ACCESS_TOKEN`.
pub const GUARDED_SHIP: &str = "ship-guarded";
pub const BROKE_SHIP: &str = "ship-broke";
pub const LEGACY_SHIP: &str = "ship-legacy";
pub const MISSING_SHIP: &str = "ship-missing";
// Ship whose lookup fails with a bare-string `error` next to a top-level message.
pub const EXPIRED_SESSION_SHIP: &str = "ship-expired";
pub const FULL_STATION: &str = "st-full";
pub const CRASHING_SECTOR: &str = "9.9.9";
pub const NON_ADJACENT_SECTOR: &str = "7.7.7";
// Ship whose hold holds 12 iron ore and 5 ice water.
pub const CARGO_SHIP: &str = "ship-cargo";
pub const MISSING_INVENTORY: &str = "ship-no-hold";
// Units of iron ore aboard `CARGO_SHIP`; larger transfers are refused.
pub const CARGO_ORE_UNITS: u32 = 12;
// Player whose event stream closes after one event.
pub const SHORT_STREAM_PLAYER: &str = "player-short";

static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the stub server is running and return its API root (`.../v1`).
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Own thread and runtime so the server outlives each `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                axum::serve(listener, router()).await.expect("stub server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://")
        .to_string();
    let _ = SERVER_URL.set(format!("{base_url}/v1"));

    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("stub server did not become ready in time");
}

fn router() -> Router {
    Router::new()
        .route("/v1/actions/jump", post(jump))
        .route("/v1/actions/dock", post(dock))
        .route("/v1/actions/undock", post(undock))
        .route("/v1/stations", get(stations))
        .route("/v1/ships/{id}", get(ship))
        .route("/v1/inventory/transfer", post(transfer))
        .route("/v1/inventory/{owner_id}", get(inventory))
        .route("/v1/events", get(events))
}

fn data(payload: Value) -> Response {
    Json(json!({ "data": payload })).into_response()
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "code": code, "message": message } })),
    )
        .into_response()
}

fn station_json(id: &str, sector: &str, position: [f64; 3], docked: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Station {id}"),
        "location_sector": sector,
        "station_type": "trade",
        "position": { "x": position[0], "y": position[1], "z": position[2] },
        "services": ["market", "refuel"],
        "docking_capacity": 4,
        "docked_ships_count": docked,
        "created_at": "2026-01-01T00:00:00Z"
    })
}

#[derive(Deserialize)]
struct JumpBody {
    ship_id: String,
    target_sector: String,
}

async fn jump(Json(body): Json<JumpBody>) -> Response {
    if body.ship_id == BROKE_SHIP {
        return error(
            StatusCode::BAD_REQUEST,
            "INSUFFICIENT_FUEL",
            "fuel 0.1 < required 3.2",
        );
    }
    if body.target_sector == CRASHING_SECTOR {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if body.target_sector == NON_ADJACENT_SECTOR {
        return error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "target_sector must be within jump range",
        );
    }

    data(json!({
        "success": true,
        "ship_id": body.ship_id,
        "from_sector": "0.0.0",
        "to_sector": body.target_sector,
        "fuel_consumed": 0.2,
        "fuel_remaining": 99.8,
        "position": [1.0, 0.0, 0.0]
    }))
}

#[derive(Deserialize)]
struct DockBody {
    ship_id: String,
    station_id: String,
}

async fn dock(Json(body): Json<DockBody>) -> Response {
    if body.station_id == FULL_STATION {
        return error(StatusCode::CONFLICT, "STATION_FULL", "no free berth");
    }

    data(json!({
        "success": true,
        "ship_id": body.ship_id,
        "station": station_json(&body.station_id, "0.0.0", [0.0, 4000.0, 0.0], 2),
        "message": "Docked"
    }))
}

#[derive(Deserialize)]
struct UndockBody {
    ship_id: String,
}

async fn undock(headers: HeaderMap, Json(body): Json<UndockBody>) -> Response {
    if body.ship_id == GUARDED_SHIP && !has_token(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response();
    }

    data(json!({ "success": true, "ship_id": body.ship_id }))
}

fn has_token(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {ACCESS_TOKEN}"))
}

async fn stations(Query(params): Query<HashMap<String, String>>) -> Response {
    let sector = params.get("sector").cloned().unwrap_or_default();
    data(json!({
        "stations": [
            station_json("st-near", &sector, [0.0, 4000.0, 0.0], 1),
            station_json("st-far", &sector, [6000.0, 0.0, 0.0], 0),
        ]
    }))
}

async fn ship(Path(id): Path<String>) -> Response {
    match id.as_str() {
        MISSING_SHIP => error(StatusCode::NOT_FOUND, "SHIP_NOT_FOUND", "no such ship"),
        EXPIRED_SESSION_SHIP => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized", "message": "Token expired" })),
        )
            .into_response(),
        LEGACY_SHIP => data(json!({
            "id": id,
            "owner_id": "player-1",
            "ship_type": "scout",
            "location_sector": "0.0.0"
        })),
        _ => data(json!({
            "id": id,
            "name": "Kestrel",
            "location_sector": "0.0.0",
            "position": { "x": 0.0, "y": 0.0, "z": 0.0 },
            "docked_at": null,
            "last_jump_at": "2026-03-01T12:00:00Z",
            "fuel_current": 64.0,
            "fuel_capacity": 80.0,
            "in_combat": false,
            "stat_allocation": { "speed": 5 }
        })),
    }
}

fn cargo_item(id: &str, resource_type: &str, quantity: u32) -> Value {
    json!({
        "id": id,
        "resource_type": resource_type,
        "quantity": quantity,
        "quality": 1.0,
        "unit_volume": 2.0,
        "total_volume": 2.0 * f64::from(quantity)
    })
}

// Echoes the owner type and filters by `resource_type` so tests can see the query.
async fn inventory(
    Path(owner_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if owner_id == MISSING_INVENTORY {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Inventory not found" })),
        )
            .into_response();
    }

    let items: Vec<Value> = [
        ("item-ore", "iron_ore", CARGO_ORE_UNITS),
        ("item-ice", "ice_water", 5),
    ]
    .into_iter()
    .filter(|(_, resource, _)| {
        params
            .get("resource_type")
            .is_none_or(|wanted| wanted == resource)
    })
    .map(|(id, resource, quantity)| cargo_item(id, resource, quantity))
    .collect();

    data(json!({
        "owner_id": owner_id,
        "owner_type": params.get("owner_type").cloned().unwrap_or_default(),
        "capacity": 40,
        "used": 34,
        "items": items
    }))
}

#[derive(Deserialize)]
struct TransferBody {
    source_id: String,
    target_id: String,
    resource_type: String,
    quantity: u32,
}

async fn transfer(Json(body): Json<TransferBody>) -> Response {
    if body.source_id != CARGO_SHIP || body.resource_type != "iron_ore" {
        return error(StatusCode::NOT_FOUND, "NOT_FOUND", "resource not held by source");
    }
    if body.quantity > CARGO_ORE_UNITS {
        return error(
            StatusCode::BAD_REQUEST,
            "INSUFFICIENT_QUANTITY",
            &format!("only {CARGO_ORE_UNITS} units available"),
        );
    }

    data(json!({
        "transfer_id": format!("tx-{}", body.target_id),
        "source_remaining": CARGO_ORE_UNITS - body.quantity,
        "target_new_total": body.quantity,
        "timestamp": "2026-03-01T12:00:00Z"
    }))
}

fn docked_event(player_id: &str) -> Event {
    Event::default().event("SHIP_DOCKED").data(
        json!({
            "ship_id": "ship-1",
            "player_id": player_id,
            "station_id": "st-near",
            "station_name": "Station st-near",
            "sector": "0.0.0"
        })
        .to_string(),
    )
}

// Emits a malformed jump, an unrelated event, then a valid dock. Most streams
// then stay open; the short-stream player's stream ends.
async fn events(
    Query(params): Query<HashMap<String, String>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let channels = params.get("channels").cloned().unwrap_or_default();
    let player_id = channels
        .split(',')
        .find_map(|channel| channel.strip_prefix("player."))
        .unwrap_or_default()
        .to_string();

    let frames = vec![
        Event::default()
            .event("SHIP_JUMPED")
            .data(r#"{"ship_id": "ship-1", "fuel_consumed": "#),
        Event::default().event("PLAYER_NOTICE").data("{}"),
        docked_event(&player_id),
    ];

    let head = stream::iter(frames.into_iter().map(Ok::<_, Infallible>));
    let stream = if player_id == SHORT_STREAM_PLAYER {
        head.boxed()
    } else {
        head.chain(stream::pending()).boxed()
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(1)).text("ping"))
}
