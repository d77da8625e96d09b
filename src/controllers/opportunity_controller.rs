use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, Pagination};
use crate::dto::opportunity_dto::{CreateOpportunityRequest, OpportunityQuery, UpdateOpportunityRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::opportunity::Opportunity;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::opportunity_repository::OpportunityRepository;
use crate::repositories::service_repository::ServiceRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

pub struct OpportunityController {
    repository: OpportunityRepository,
    clients: ClientRepository,
    vehicles: VehicleRepository,
    services: ServiceRepository,
}

impl OpportunityController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: OpportunityRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            services: ServiceRepository::new(pool),
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, query: OpportunityQuery) -> Result<Value, AppError> {
        let pagination = Pagination::new(query.page, query.limit);
        let branch_id = user.branch_scope().or(query.branch_id);

        let (opportunities, total) = self.repository.list(branch_id, &query, pagination).await?;

        Ok(json!({ "opportunities": opportunities, "pagination": pagination.meta(total) }))
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Opportunity, AppError> {
        let opportunity = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Oportunidad no encontrada".to_string()))?;

        user.ensure_branch_access(opportunity.branch_id)?;
        Ok(opportunity)
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateOpportunityRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;

        let client = self
            .clients
            .find_by_id(request.client_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;
        user.ensure_branch_access(client.branch_id)?;

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;
        if vehicle.client_id != client.id {
            return Err(AppError::BadRequest("El vehículo no pertenece al cliente".to_string()));
        }

        if let Some(service_id) = request.service_id {
            let service = self
                .services
                .find_by_id(service_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Servicio no encontrado".to_string()))?;
            if service.vehicle_id != vehicle.id {
                return Err(AppError::BadRequest(
                    "El servicio de origen no corresponde al vehículo".to_string(),
                ));
            }
        }

        let branch_id = match request.branch_id {
            Some(branch_id) if user.is_admin => branch_id,
            _ => client.branch_id,
        };

        let opportunity = self.repository.create(branch_id, user.user_id, request).await?;

        info!("💡 Oportunidad registrada: {} ({})", opportunity.id, opportunity.opportunity_type);
        Ok(ApiResponse::success_with_message(
            json!({ "opportunity": opportunity }),
            "Oportunidad creada exitosamente",
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateOpportunityRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        self.get_by_id(user, id).await?;

        let opportunity = self.repository.update(id, request).await?;
        Ok(ApiResponse::success_with_message(
            json!({ "opportunity": opportunity }),
            "Oportunidad actualizada exitosamente",
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        self.get_by_id(user, id).await?;
        self.repository.deactivate(id).await?;
        info!("🗑️ Oportunidad eliminada: {}", id);
        Ok(())
    }
}
