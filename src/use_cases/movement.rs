// Movement workflows: local validation, one round trip per command, and
// reconciliation of the cached ship state with the server's answer.
//
// Commands take `&mut self`, so a controller can never have two commands for its
// ship in flight at once.

use crate::domain::docking::{self, DockingAssessment, DockingRejection, DockingSelection, Station};
use crate::domain::errors::{GENERIC_ERROR_MESSAGE, MovementErrorCode, ServerErrorReport};
use crate::domain::events::MovementEvent;
use crate::domain::fuel::{self, FuelEstimateError, SectorType};
use crate::domain::outcomes::{DockOutcome, JumpOutcome, UndockOutcome};
use crate::domain::ports::{Clock, GatewayError, MovementGateway};
use crate::domain::sector::SectorParseError;
use crate::domain::ship::{ShipControls, ShipMovementState, ShipSnapshot};
use crate::domain::tuning::MovementTuning;
use crate::domain::CooldownTracker;
use std::fmt;
use tracing::{debug, info, warn};

/// Problems caught before anything is sent to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidSector(SectorParseError),
    InvalidShipSpeed(f64),
    SameSector,
    InsufficientFuel { required: f64, available: f64 },
    Docked,
    InCombat,
    Recharging { remaining_secs: f64 },
    NotDocked,
    Docking(DockingRejection),
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::InvalidSector(_) => {
                "Invalid sector format. Use x.y.z (e.g., 1.0.0)".to_string()
            }
            ValidationError::InvalidShipSpeed(_) => {
                "Ship speed is unknown; cannot estimate fuel for this jump.".to_string()
            }
            ValidationError::SameSector => "Ship is already in that sector.".to_string(),
            ValidationError::InsufficientFuel { .. } => {
                "Insufficient fuel for this jump".to_string()
            }
            ValidationError::Docked => fixed(MovementErrorCode::ShipDocked),
            ValidationError::InCombat => fixed(MovementErrorCode::ShipInCombat),
            ValidationError::Recharging { remaining_secs } => {
                format!("Jump drive recharging: {remaining_secs:.1}s")
            }
            ValidationError::NotDocked => fixed(MovementErrorCode::ShipNotDocked),
            ValidationError::Docking(rejection) => rejection.user_message(),
        }
    }
}

fn fixed(code: MovementErrorCode) -> String {
    code.user_message()
        .unwrap_or(GENERIC_ERROR_MESSAGE)
        .to_string()
}

impl From<FuelEstimateError> for ValidationError {
    fn from(err: FuelEstimateError) -> Self {
        match err {
            FuelEstimateError::InvalidSector(err) => ValidationError::InvalidSector(err),
            FuelEstimateError::InvalidShipSpeed(speed) => ValidationError::InvalidShipSpeed(speed),
        }
    }
}

impl From<DockingRejection> for ValidationError {
    fn from(rejection: DockingRejection) -> Self {
        ValidationError::Docking(rejection)
    }
}

/// Every way a movement action can fail, each with a non-empty player message.
#[derive(Debug, Clone, PartialEq)]
pub enum MovementFailure {
    Validation(ValidationError),
    Rejected {
        code: Option<MovementErrorCode>,
        message: String,
    },
    Unavailable {
        message: String,
    },
}

impl MovementFailure {
    pub fn user_message(&self) -> String {
        match self {
            MovementFailure::Validation(err) => err.user_message(),
            MovementFailure::Rejected { message, .. } | MovementFailure::Unavailable { message } => {
                message.clone()
            }
        }
    }
}

impl fmt::Display for MovementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for MovementFailure {}

impl From<ValidationError> for MovementFailure {
    fn from(err: ValidationError) -> Self {
        MovementFailure::Validation(err)
    }
}

impl From<GatewayError> for MovementFailure {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected { report, .. } => MovementFailure::Rejected {
                code: report.known_code(),
                message: report.user_message(),
            },
            // No payload to draw a message from, so the chain ends at the literal.
            GatewayError::Unavailable(_) | GatewayError::Decode(_) => {
                MovementFailure::Unavailable {
                    message: ServerErrorReport::default().user_message(),
                }
            }
        }
    }
}

/// Advisory fuel figures shown before a jump is confirmed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpEstimate {
    pub fuel_cost: f64,
    pub fuel_remaining_after: f64,
}

impl JumpEstimate {
    pub fn affordable(&self) -> bool {
        self.fuel_cost > 0.0 && self.fuel_remaining_after >= 0.0
    }
}

pub struct MovementController<G, C> {
    gateway: G,
    clock: C,
    tuning: MovementTuning,
    ship: ShipMovementState,
    cooldown: CooldownTracker,
    stations: Vec<Station>,
    selection: DockingSelection,
}

impl<G, C> MovementController<G, C>
where
    G: MovementGateway,
    C: Clock,
{
    pub fn new(gateway: G, clock: C, tuning: MovementTuning, snapshot: ShipSnapshot) -> Self {
        let ship = ShipMovementState::from_snapshot(snapshot, &tuning);
        let mut cooldown = CooldownTracker::new(tuning.jump_cooldown);
        cooldown.observe(ship.last_jump_at);
        if ship.data_status.is_defaulted() {
            warn!(ship_id = %ship.ship_id, status = ?ship.data_status, "server omitted movement data; using defaults");
        }

        Self {
            gateway,
            clock,
            tuning,
            ship,
            cooldown,
            stations: Vec::new(),
            selection: DockingSelection::default(),
        }
    }

    /// Fetches the ship from the server and builds a controller around it.
    pub async fn load(
        gateway: G,
        clock: C,
        tuning: MovementTuning,
        ship_id: &str,
    ) -> Result<Self, MovementFailure> {
        let snapshot = gateway.get_ship(ship_id).await.inspect_err(|e| {
            warn!(ship_id, error = %e, "failed to load ship");
        })?;
        Ok(Self::new(gateway, clock, tuning, snapshot))
    }

    pub fn ship(&self) -> &ShipMovementState {
        &self.ship
    }

    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    pub fn cooldown_remaining(&self) -> f64 {
        self.cooldown.remaining_at(self.clock.now())
    }

    pub fn controls(&self) -> ShipControls {
        self.ship.controls(self.cooldown_remaining() > 0.0)
    }

    /// Replaces the cached ship with a fresh server snapshot.
    pub async fn refresh(&mut self) -> Result<&ShipMovementState, MovementFailure> {
        let snapshot = self.gateway.get_ship(&self.ship.ship_id).await?;
        self.replace_ship(ShipMovementState::from_snapshot(snapshot, &self.tuning));
        Ok(&self.ship)
    }

    fn replace_ship(&mut self, ship: ShipMovementState) {
        if ship.sector != self.ship.sector {
            self.stations.clear();
            self.selection.clear();
        }
        self.cooldown.observe(ship.last_jump_at);
        self.ship = ship;
    }

    /// Advisory fuel cost of jumping to `target_sector` from the current sector.
    pub fn estimate_jump(
        &self,
        target_sector: &str,
        sector_type: SectorType,
    ) -> Result<JumpEstimate, ValidationError> {
        let fuel_cost =
            fuel::estimate_fuel_cost(&self.ship.sector, target_sector, self.ship.speed, sector_type)?;
        Ok(JumpEstimate {
            fuel_cost,
            fuel_remaining_after: self.ship.fuel_current - fuel_cost,
        })
    }

    fn check_jump(&self, target_sector: &str) -> Result<JumpEstimate, ValidationError> {
        if self.ship.is_docked() {
            return Err(ValidationError::Docked);
        }
        if self.ship.in_combat {
            return Err(ValidationError::InCombat);
        }
        let remaining_secs = self.cooldown_remaining();
        if remaining_secs > 0.0 {
            return Err(ValidationError::Recharging { remaining_secs });
        }

        let estimate = self.estimate_jump(target_sector, SectorType::Normal)?;
        if estimate.fuel_cost <= 0.0 {
            return Err(ValidationError::SameSector);
        }
        if estimate.fuel_cost > self.ship.fuel_current {
            return Err(ValidationError::InsufficientFuel {
                required: estimate.fuel_cost,
                available: self.ship.fuel_current,
            });
        }
        Ok(estimate)
    }

    #[tracing::instrument(name = "jump", skip_all, fields(ship_id = %self.ship.ship_id, target_sector = %target_sector))]
    pub async fn jump(&mut self, target_sector: &str) -> Result<JumpOutcome, MovementFailure> {
        let estimate = self.check_jump(target_sector).inspect_err(|e| {
            debug!(reason = ?e, "jump blocked locally");
        })?;

        let outcome = self
            .gateway
            .jump(&self.ship.ship_id, target_sector)
            .await
            .inspect_err(|e| warn!(error = %e, "jump rejected"))?;
        ensure_success(outcome.success, outcome.message.as_deref())?;

        info!(
            from_sector = %outcome.from_sector,
            to_sector = %outcome.to_sector,
            estimated = estimate.fuel_cost,
            consumed = outcome.fuel_consumed,
            "jump completed"
        );

        // The server's figures replace the estimate from here on.
        let mut ship = self.ship.clone();
        ship.sector = outcome.to_sector.clone();
        ship.fuel_current = outcome.fuel_remaining;
        ship.position = outcome.position;
        ship.last_jump_at = Some(self.clock.now());
        self.replace_ship(ship);

        Ok(outcome)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Loads the stations of the current sector and resets the docking selection.
    pub async fn load_stations(&mut self) -> Result<&[Station], MovementFailure> {
        let stations = self
            .gateway
            .list_stations(&self.ship.sector)
            .await
            .inspect_err(|e| warn!(sector = %self.ship.sector, error = %e, "failed to load stations"))?;
        debug!(sector = %self.ship.sector, count = stations.len(), "stations loaded");
        self.stations = stations;
        self.selection.clear();
        Ok(&self.stations)
    }

    pub fn station_assessments(&self) -> Vec<DockingAssessment> {
        docking::assess_stations(self.ship.position, &self.stations, self.tuning.max_dock_range)
    }

    pub fn select_station(&mut self, station_id: &str) -> Result<DockingAssessment, ValidationError> {
        let assessment = self.selection.select(
            station_id,
            self.ship.position,
            &self.stations,
            self.tuning.max_dock_range,
        )?;
        Ok(assessment)
    }

    pub fn selected_station(&self) -> Option<&Station> {
        let selected = self.selection.selected()?;
        self.stations.iter().find(|station| station.id == selected)
    }

    #[tracing::instrument(name = "dock", skip_all, fields(ship_id = %self.ship.ship_id))]
    pub async fn dock(&mut self) -> Result<DockOutcome, MovementFailure> {
        if self.ship.is_docked() {
            return Err(ValidationError::Docked.into());
        }
        if self.ship.in_combat {
            return Err(ValidationError::InCombat.into());
        }
        let assessment = self
            .selection
            .confirm(self.ship.position, &self.stations, self.tuning.max_dock_range)
            .map_err(ValidationError::from)?;

        let outcome = self
            .gateway
            .dock(&self.ship.ship_id, &assessment.station_id)
            .await
            .inspect_err(|e| warn!(station_id = %assessment.station_id, error = %e, "dock rejected"))?;
        ensure_success(outcome.success, outcome.message.as_deref())?;

        info!(station_id = %outcome.station.id, station = %outcome.station.name, "docked");
        self.ship.docked_at = Some(outcome.station.id.clone());
        if let Some(station) = self.stations.iter_mut().find(|s| s.id == outcome.station.id) {
            *station = outcome.station.clone();
        }
        self.selection.clear();

        Ok(outcome)
    }

    #[tracing::instrument(name = "undock", skip_all, fields(ship_id = %self.ship.ship_id))]
    pub async fn undock(&mut self) -> Result<UndockOutcome, MovementFailure> {
        if !self.ship.is_docked() {
            return Err(ValidationError::NotDocked.into());
        }

        let outcome = self
            .gateway
            .undock(&self.ship.ship_id)
            .await
            .inspect_err(|e| warn!(error = %e, "undock rejected"))?;
        ensure_success(outcome.success, outcome.message.as_deref())?;

        info!("undocked");
        self.ship.docked_at = None;
        Ok(outcome)
    }

    /// Applies a pushed event to the cache. Returns false for other ships' events.
    pub fn apply_event(&mut self, event: &MovementEvent) -> bool {
        if !event.is_for_ship(&self.ship.ship_id) {
            return false;
        }

        match event {
            MovementEvent::ShipJumped(jump) => {
                // Push events carry no timestamp; the cooldown follows command results and refreshes.
                let mut ship = self.ship.clone();
                ship.sector = jump.to_sector.clone();
                ship.fuel_current = jump.fuel_remaining;
                ship.position = jump.position;
                self.replace_ship(ship);
            }
            MovementEvent::ShipDocked(visit) => {
                self.ship.docked_at = Some(visit.station_id.clone());
            }
            MovementEvent::ShipUndocked(_) => {
                self.ship.docked_at = None;
            }
        }
        debug!(event = event.kind().as_str(), "applied push event to ship cache");
        true
    }
}

// A 2xx answer that still says `success: false` is treated as a rejection.
fn ensure_success(success: bool, message: Option<&str>) -> Result<(), MovementFailure> {
    if success {
        return Ok(());
    }
    let report = ServerErrorReport {
        message: message.map(str::to_string),
        ..ServerErrorReport::default()
    };
    Err(MovementFailure::Rejected {
        code: None,
        message: report.user_message(),
    })
}
