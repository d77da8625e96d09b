use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, Pagination};
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleQuery};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::client::Client;
use crate::models::vehicle::{Vehicle, VehicleWithOwner};
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::vehicle_repository::{NewVehicle, VehicleRepository};
use crate::utils::errors::{conflict_error, AppError};
use crate::utils::validation::normalize_plate;

pub struct VehicleController {
    repository: VehicleRepository,
    clients: ClientRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            clients: ClientRepository::new(pool),
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, query: VehicleQuery) -> Result<Value, AppError> {
        let pagination = Pagination::new(query.page, query.limit);

        let (vehicles, total) = self
            .repository
            .list(user.branch_scope(), query.client_id, query.search.as_deref(), pagination)
            .await?;

        Ok(json!({ "vehicles": vehicles, "pagination": pagination.meta(total) }))
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Vehicle, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        self.owner(user, vehicle.client_id).await?;
        Ok(vehicle)
    }

    /// Búsqueda por placa para el asistente de recepción
    pub async fn get_by_plate(&self, user: &AuthenticatedUser, plate: &str) -> Result<VehicleWithOwner, AppError> {
        let vehicle = self
            .repository
            .find_by_plate(plate)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No hay vehículo con placa {}", normalize_plate(plate)))
            })?;

        self.owner(user, vehicle.client_id).await?;
        Ok(vehicle)
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        self.owner(user, request.client_id).await?;

        if self.repository.plate_exists(&request.plate, None).await? {
            return Err(conflict_error("Vehículo", "placa", &normalize_plate(&request.plate)));
        }

        let vehicle = self
            .repository
            .create(NewVehicle {
                client_id: request.client_id,
                plate: request.plate,
                brand: request.brand,
                model: request.model,
                year: request.year,
                color: request.color,
                fuel_type: request.fuel_type,
                transmission: request.transmission,
                vin: request.vin,
                mileage: request.mileage,
                notes: request.notes,
            })
            .await?;

        info!("🚗 Vehículo creado: {}", vehicle.plate);
        Ok(ApiResponse::success_with_message(
            json!({ "vehicle": vehicle }),
            "Vehículo creado exitosamente",
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        self.get_by_id(user, id).await?;

        if let Some(client_id) = request.client_id {
            self.owner(user, client_id).await?;
        }
        if let Some(plate) = &request.plate {
            if self.repository.plate_exists(plate, Some(id)).await? {
                return Err(conflict_error("Vehículo", "placa", &normalize_plate(plate)));
            }
        }

        let vehicle = self.repository.update(id, request).await?;
        Ok(ApiResponse::success_with_message(
            json!({ "vehicle": vehicle }),
            "Vehículo actualizado exitosamente",
        ))
    }

    /// Borrado físico; no se permite si el vehículo tiene servicios o citas
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        let vehicle = self.get_by_id(user, id).await?;

        let (services, appointments, opportunities) = self.repository.count_dependencies(id).await?;
        if services > 0 || appointments > 0 || opportunities > 0 {
            return Err(AppError::BadRequest(format!(
                "No se puede eliminar el vehículo: tiene {} servicio(s), {} cita(s) y {} oportunidad(es) registradas",
                services, appointments, opportunities
            )));
        }

        self.repository.delete(id).await?;
        info!("🗑️ Vehículo eliminado: {}", vehicle.plate);
        Ok(())
    }

    /// Dueño activo y visible para el usuario
    async fn owner(&self, user: &AuthenticatedUser, client_id: Uuid) -> Result<Client, AppError> {
        let client = self
            .clients
            .find_by_id(client_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;

        user.ensure_branch_access(client.branch_id)?;
        Ok(client)
    }
}
