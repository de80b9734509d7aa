use async_trait::async_trait;

use crate::domain::inventory::{Inventory, OwnerType, ResourceType, TransferReceipt, TransferRequest};
use crate::domain::ports::{GatewayError, InventoryGateway};
use crate::interface_adapters::clients::movement::MovementApiClient;
use crate::interface_adapters::protocol::{InventoryDto, TransferRequestDto, TransferResponseDto};

#[async_trait]
impl InventoryGateway for MovementApiClient {
    #[tracing::instrument(name = "gateway.get_inventory", skip(self))]
    async fn get_inventory(
        &self,
        owner_id: &str,
        owner_type: OwnerType,
        resource_type: Option<ResourceType>,
    ) -> Result<Inventory, GatewayError> {
        let mut url = self.resource_url("inventory", owner_id)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("owner_type", owner_type.as_str());
            if let Some(resource_type) = resource_type {
                query.append_pair("resource_type", resource_type.as_str());
            }
        }
        let dto: InventoryDto = self.send(self.http().get(url)).await?;
        Ok(dto.into())
    }

    #[tracing::instrument(
        name = "gateway.transfer",
        skip_all,
        fields(source_id = %request.source_id, target_id = %request.target_id, quantity = request.quantity)
    )]
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, GatewayError> {
        let url = self.endpoint("inventory/transfer")?;
        let body = self.http().post(url).json(&TransferRequestDto::from(request));
        let dto: TransferResponseDto = self.send(body).await.inspect_err(|e| {
            tracing::warn!(error = %e, "transfer request failed");
        })?;
        Ok(dto.into())
    }
}
