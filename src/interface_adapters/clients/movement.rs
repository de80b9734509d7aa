use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::domain::docking::Station;
use crate::domain::errors::ServerErrorReport;
use crate::domain::outcomes::{DockOutcome, JumpOutcome, UndockOutcome};
use crate::domain::ports::{GatewayError, MovementGateway};
use crate::domain::ship::ShipSnapshot;
use crate::interface_adapters::clients::{ClientBuildError, api_root};
use crate::interface_adapters::protocol::{
    ApiErrorBody, DataEnvelope, DockRequest, DockResponseDto, JumpRequest, JumpResponseDto,
    ShipDto, StationListDto, UndockRequest, UndockResponseDto,
};
use crate::use_cases::SessionContext;

// Thin reqwest client for the game server's REST endpoints. Inventory calls live
// in `clients::inventory`.
#[derive(Clone)]
pub struct MovementApiClient {
    http: reqwest::Client,
    root: Url,
    session: SessionContext,
}

impl MovementApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: SessionContext,
    ) -> Result<Self, ClientBuildError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            root: api_root(base_url)?,
            session,
        })
    }

    pub(super) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(super) fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.root
            .join(path)
            .map_err(|e| GatewayError::Unavailable(format!("bad endpoint {path}: {e}")))
    }

    /// `{collection}/{id}` with `id` percent-encoded as a single path segment.
    pub(super) fn resource_url(&self, collection: &str, id: &str) -> Result<Url, GatewayError> {
        let mut url = self.endpoint(collection)?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::Unavailable("api url cannot carry a path".to_string()))?
            .push(id);
        Ok(url)
    }

    pub(super) async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let request = match self.session.bearer_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Non-JSON error bodies still surface as a rejection with an empty report.
            let report = response
                .json::<ApiErrorBody>()
                .await
                .map(ServerErrorReport::from)
                .unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                report,
            });
        }

        response
            .json::<DataEnvelope<T>>()
            .await
            .map(|envelope| envelope.data)
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MovementGateway for MovementApiClient {
    #[tracing::instrument(name = "gateway.jump", skip(self))]
    async fn jump(&self, ship_id: &str, target_sector: &str) -> Result<JumpOutcome, GatewayError> {
        let url = self.endpoint("actions/jump")?;
        let request = self.http.post(url).json(&JumpRequest {
            ship_id,
            target_sector,
        });
        let dto: JumpResponseDto = self.send(request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "jump request failed");
        })?;
        Ok(dto.into())
    }

    #[tracing::instrument(name = "gateway.dock", skip(self))]
    async fn dock(&self, ship_id: &str, station_id: &str) -> Result<DockOutcome, GatewayError> {
        let url = self.endpoint("actions/dock")?;
        let request = self
            .http
            .post(url)
            .json(&DockRequest { ship_id, station_id });
        let dto: DockResponseDto = self.send(request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "dock request failed");
        })?;
        Ok(dto.into())
    }

    #[tracing::instrument(name = "gateway.undock", skip(self))]
    async fn undock(&self, ship_id: &str) -> Result<UndockOutcome, GatewayError> {
        let url = self.endpoint("actions/undock")?;
        let request = self.http.post(url).json(&UndockRequest { ship_id });
        let dto: UndockResponseDto = self.send(request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "undock request failed");
        })?;
        Ok(dto.into())
    }

    #[tracing::instrument(name = "gateway.list_stations", skip(self))]
    async fn list_stations(&self, sector: &str) -> Result<Vec<Station>, GatewayError> {
        let mut url = self.endpoint("stations")?;
        url.query_pairs_mut().append_pair("sector", sector);
        let dto: StationListDto = self.send(self.http.get(url)).await?;
        Ok(dto.stations.into_iter().map(Station::from).collect())
    }

    #[tracing::instrument(name = "gateway.get_ship", skip(self))]
    async fn get_ship(&self, ship_id: &str) -> Result<ShipSnapshot, GatewayError> {
        let url = self.resource_url("ships", ship_id)?;
        let dto: ShipDto = self.send(self.http.get(url)).await?;
        Ok(dto.into())
    }
}
