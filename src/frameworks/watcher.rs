// Framework bootstrap for the movement watcher.

use crate::domain::events::MovementEvent;
use crate::domain::tuning::MovementTuning;
use crate::frameworks::config::{ClientConfig, ConfigError};
use crate::interface_adapters::clients::ClientBuildError;
use crate::interface_adapters::{MovementApiClient, MovementEventListener, SystemClock};
use crate::use_cases::{CooldownTimer, MovementController, MovementFailure, Session, SessionContext};

use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use tokio::sync::mpsc;

type Controller = MovementController<MovementApiClient, SystemClock>;

#[derive(Debug)]
pub enum WatchError {
    Config(ConfigError),
    Client(ClientBuildError),
    Load(MovementFailure),
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchError::Config(err) => write!(f, "configuration error: {err}"),
            WatchError::Client(err) => write!(f, "client setup failed: {err}"),
            WatchError::Load(err) => write!(f, "could not load ship: {err}"),
        }
    }
}

impl std::error::Error for WatchError {}

impl From<ConfigError> for WatchError {
    fn from(err: ConfigError) -> Self {
        WatchError::Config(err)
    }
}

impl From<ClientBuildError> for WatchError {
    fn from(err: ClientBuildError) -> Self {
        WatchError::Client(err)
    }
}

impl From<MovementFailure> for WatchError {
    fn from(err: MovementFailure) -> Self {
        WatchError::Load(err)
    }
}

// HTTP internals stay quiet unless RUST_LOG asks for them.
const DEFAULT_LOG_FILTER: &str = "movement_client=info,reqwest=warn,hyper_util=warn,warn";

fn init_runtime() {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("ignoring unreadable .env: {e}");
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    // The watcher logs one line per pushed event; module targets tell them apart.
    let installed = match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .flatten_event(true)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        let thread = std::thread::current();
        tracing::error!(%info, thread = thread.name().unwrap_or("unnamed"), ?backtrace, "watcher panicked");
    }));
}

pub async fn run_with_config() -> Result<(), WatchError> {
    init_runtime();

    let config = ClientConfig::load().inspect_err(|e| {
        tracing::error!(error = %e, "failed to load config");
    })?;

    run(config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    })
    .await
}

/// Watches the configured ship until `shutdown` resolves or the event stream ends.
pub async fn run(
    config: ClientConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<(), WatchError> {
    let ship_id = config
        .ship_id
        .clone()
        .ok_or(ConfigError::Missing("MOVEMENT_SHIP_ID"))?;
    let player_id = config
        .player_id
        .clone()
        .ok_or(ConfigError::Missing("MOVEMENT_PLAYER_ID"))?;

    let session = SessionContext::new();
    if let Some(token) = config.access_token.clone() {
        session.initialize(Session::new(token)).await;
    }

    let gateway = MovementApiClient::new(&config.api_url, config.api_timeout, session.clone())?;
    let listener = MovementEventListener::new(&config.api_url, config.api_timeout, session)?;

    let mut controller =
        MovementController::load(gateway, SystemClock, MovementTuning::default(), &ship_id).await?;
    report_ship(&controller);
    let mut timer = start_cooldown(&controller, &config);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<MovementEvent>();
    let subscription = listener.subscribe(&player_id, move |event| {
        let _ = event_tx.send(event);
    });
    tracing::info!(%player_id, %ship_id, "watching movement events");

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutting down");
                break;
            }
            received = event_rx.recv() => {
                let Some(event) = received else {
                    tracing::warn!("event stream closed");
                    break;
                };
                let last_jump_at = controller.ship().last_jump_at;
                if !handle_event(&mut controller, &event).await {
                    continue;
                }
                if controller.ship().last_jump_at != last_jump_at {
                    timer = start_cooldown(&controller, &config);
                }
            }
        }
    }

    drop(timer);
    subscription.close();
    Ok(())
}

// Returns false when the event belongs to another ship.
async fn handle_event(controller: &mut Controller, event: &MovementEvent) -> bool {
    tracing::info!(
        event = event.kind().as_str(),
        ship_id = event.ship_id(),
        player_id = event.player_id(),
        "movement event"
    );
    if !controller.apply_event(event) {
        return false;
    }

    // Push events carry no jump time; the server snapshot does.
    if let Err(e) = controller.refresh().await {
        tracing::warn!(error = %e, "refresh after event failed; keeping pushed state");
    }
    report_ship(controller);
    true
}

fn report_ship(controller: &Controller) {
    let ship = controller.ship();
    let controls = controller.controls();
    let gauge = ship.fuel_gauge();
    tracing::info!(
        ship_id = %ship.ship_id,
        sector = %ship.sector,
        status = ?controls.status,
        fuel = gauge.current,
        fuel_level = ?gauge.level(),
        low_fuel = gauge.low_fuel_warning(),
        jump_enabled = controls.jump_enabled,
        dock_enabled = controls.dock_enabled,
        undock_enabled = controls.undock_enabled,
        defaults = controls.using_default_movement_data,
        cooldown_secs = controller.cooldown_remaining(),
        "ship state"
    );
}

fn start_cooldown(controller: &Controller, config: &ClientConfig) -> Option<CooldownTimer> {
    let last_jump_at: DateTime<Utc> = controller.ship().last_jump_at?;
    if controller.cooldown_remaining() <= 0.0 {
        return None;
    }

    let ship_id = controller.ship().ship_id.clone();
    Some(CooldownTimer::spawn(
        last_jump_at,
        controller.tuning().jump_cooldown,
        config.cooldown_tick,
        SystemClock,
        move || tracing::info!(%ship_id, "jump drive ready"),
    ))
}
