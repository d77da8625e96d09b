use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::controllers::appointment_controller::ensure_linkable;
use crate::dto::common_dto::{ApiResponse, Pagination};
use crate::dto::service_dto::{
    CreateServiceRequest, HistoryType, ServiceQuery, UpdateServiceRequest, UpdateServiceStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::appointment::AppointmentStatus;
use crate::models::mechanic::Mechanic;
use crate::models::service::{Service, StatusLogEntry};
use crate::models::work_status::{WorkStatus, STATUS_RECIBIDO};
use crate::repositories::appointment_repository::AppointmentRepository;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::mechanic_repository::MechanicRepository;
use crate::repositories::service_repository::{NewService, ServiceEdit, ServiceRepository};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::work_status_repository::WorkStatusRepository;
use crate::services::commission::resolve_commission;
use crate::services::lookup_cache;
use crate::services::status_rules::{transition_timestamps, StatusKind};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::merge_optional;

/// Días que un servicio cerrado sigue visible en el tablero
const BOARD_CLOSED_DAYS: i32 = 7;

pub struct ServiceController {
    state: AppState,
    repository: ServiceRepository,
    clients: ClientRepository,
    vehicles: VehicleRepository,
    mechanics: MechanicRepository,
}

impl ServiceController {
    pub fn new(state: AppState) -> Self {
        let pool = state.pool.clone();
        Self {
            repository: ServiceRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            mechanics: MechanicRepository::new(pool),
            state,
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, query: ServiceQuery) -> Result<Value, AppError> {
        let pagination = Pagination::new(query.page, query.limit);
        let branch_id = user.branch_scope().or(query.branch_id);

        let (services, total) = self.repository.list(branch_id, &query, pagination).await?;

        Ok(json!({ "services": services, "pagination": pagination.meta(total) }))
    }

    /// Columnas del tablero: un grupo por estado, en el orden del catálogo
    pub async fn board(&self, user: &AuthenticatedUser) -> Result<Value, AppError> {
        let statuses = lookup_cache::work_statuses(&self.state).await?;
        let closed: Vec<i32> = statuses
            .iter()
            .filter(|s| StatusKind::of(s).is_closed())
            .map(|s| s.id)
            .collect();

        let services = self
            .repository
            .board(user.branch_scope(), &closed, BOARD_CLOSED_DAYS)
            .await?;

        let columns: Vec<Value> = statuses
            .iter()
            .map(|status| {
                let items: Vec<_> = services.iter().filter(|s| s.status_id == status.id).collect();
                json!({ "status": status, "count": items.len(), "services": items })
            })
            .collect();

        Ok(json!({ "columns": columns }))
    }

    /// Orden con cliente, vehículo, mecánico y estado
    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Value, AppError> {
        let service = self.find(user, id).await?;

        let client = self.clients.find_by_id(service.client_id).await?;
        let vehicle = self.vehicles.find_by_id(service.vehicle_id).await?;
        let mechanic = match service.mechanic_id {
            Some(mechanic_id) => self.mechanics.find_by_id(mechanic_id).await?,
            None => None,
        };
        let status = self.status(service.status_id).await?;

        Ok(json!({
            "service": service,
            "client": client,
            "vehicle": vehicle,
            "mechanic": mechanic,
            "status": status,
        }))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateServiceRequest,
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

        let mechanic = match request.mechanic_id {
            Some(mechanic_id) => Some(self.assignable_mechanic(user, mechanic_id).await?),
            None => None,
        };

        let status = self.status(request.status_id.unwrap_or(STATUS_RECIBIDO)).await?;
        let total_amount = request.total_amount.unwrap_or(Decimal::ZERO);
        let mechanic_commission = resolve_commission(
            request.mechanic_commission,
            total_amount,
            mechanic.as_ref().map(|m| m.commission_percentage),
        );

        let branch_id = match request.branch_id {
            Some(branch_id) if user.is_admin => branch_id,
            _ => client.branch_id,
        };

        let mut tx = self.state.pool.begin().await?;

        if let Some(appointment_id) = request.appointment_id {
            let appointment = AppointmentRepository::find_by_id_in(&mut tx, appointment_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Cita no encontrada".to_string()))?;
            ensure_linkable(&appointment, client.id, vehicle.id)?;
        }

        let service = ServiceRepository::create_in(
            &mut tx,
            NewService {
                branch_id,
                client_id: client.id,
                vehicle_id: vehicle.id,
                mechanic_id: mechanic.as_ref().map(|m| m.id),
                status_id: status.id,
                appointment_id: request.appointment_id,
                problem_description: request.problem_description,
                diagnosis: request.diagnosis,
                quotation_details: request.quotation_details,
                total_amount,
                mechanic_commission,
                timestamps: transition_timestamps(StatusKind::of(&status), None, Utc::now()),
            },
        )
        .await?;

        ServiceRepository::insert_status_log_in(
            &mut tx,
            service.id,
            None,
            service.status_id,
            Some(user.user_id),
            Some("Servicio creado".to_string()),
        )
        .await?;

        if let Some(appointment_id) = request.appointment_id {
            AppointmentRepository::link_service_in(&mut tx, appointment_id, service.id, AppointmentStatus::Completed)
                .await?;
        }

        tx.commit().await?;

        info!("🧾 Servicio creado: {} ({})", service.id, vehicle.plate);
        Ok(ApiResponse::success_with_message(
            json!({ "service": service }),
            "Servicio creado exitosamente",
        ))
    }

    /// Editar la orden. Una comisión enviada se guarda tal cual; si no viene y
    /// cambian el mecánico o el monto, se recalcula.
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateServiceRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        let current = self.find(user, id).await?;

        let mechanic_id = if request.unassign_mechanic {
            None
        } else {
            request.mechanic_id.or(current.mechanic_id)
        };
        let mechanic = match mechanic_id {
            Some(mechanic_id) if Some(mechanic_id) != current.mechanic_id => {
                Some(self.assignable_mechanic(user, mechanic_id).await?)
            }
            Some(mechanic_id) => self.mechanics.find_by_id(mechanic_id).await?,
            None => None,
        };

        let total_amount = request.total_amount.unwrap_or(current.total_amount);
        let pricing_changed = mechanic_id != current.mechanic_id || total_amount != current.total_amount;

        let mechanic_commission = match request.mechanic_commission {
            Some(commission) => commission,
            None if pricing_changed => resolve_commission(
                None,
                total_amount,
                mechanic.as_ref().map(|m| m.commission_percentage),
            ),
            None => current.mechanic_commission,
        };

        let service = self
            .repository
            .update(
                id,
                ServiceEdit {
                    mechanic_id,
                    problem_description: request.problem_description.unwrap_or(current.problem_description),
                    diagnosis: merge_optional(request.diagnosis, current.diagnosis),
                    quotation_details: merge_optional(request.quotation_details, current.quotation_details),
                    total_amount,
                    mechanic_commission,
                },
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            json!({ "service": service }),
            "Servicio actualizado exitosamente",
        ))
    }

    /// Cambiar el estado y registrar el cambio en el historial, en una sola transacción
    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateServiceStatusRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;

        let mut tx = self.state.pool.begin().await?;

        let current = ServiceRepository::lock_in(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Servicio no encontrado".to_string()))?;
        user.ensure_branch_access(current.branch_id)?;

        let target = WorkStatusRepository::find_by_id_in(&mut tx, request.status_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Estado no encontrado".to_string()))?;

        let timestamps = transition_timestamps(StatusKind::of(&target), current.started_at, Utc::now());
        let service = ServiceRepository::update_status_in(&mut tx, id, target.id, timestamps).await?;
        let log = ServiceRepository::insert_status_log_in(
            &mut tx,
            id,
            Some(current.status_id),
            target.id,
            Some(user.user_id),
            request.notes,
        )
        .await?;

        tx.commit().await?;

        info!(
            "🔄 Servicio {} cambió de estado {} → {} ({})",
            id, current.status_id, target.id, target.name
        );

        Ok(ApiResponse::success_with_message(
            json!({ "service": service, "log": log }),
            format!("Estado actualizado a {}", target.name),
        ))
    }

    pub async fn status_history(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Vec<StatusLogEntry>, AppError> {
        self.find(user, id).await?;
        self.repository.status_history(id).await
    }

    /// Servicios de un cliente o de un vehículo
    pub async fn history(
        &self,
        user: &AuthenticatedUser,
        history_type: HistoryType,
        id: Uuid,
    ) -> Result<Value, AppError> {
        let owner_id = match history_type {
            HistoryType::Client => id,
            HistoryType::Vehicle => {
                self.vehicles
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?
                    .client_id
            }
        };

        let client = self
            .clients
            .find_by_id(owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;
        user.ensure_branch_access(client.branch_id)?;

        let services = self.repository.history(history_type, id, user.branch_scope()).await?;
        let total_amount: Decimal = services.iter().map(|s| s.total_amount).sum();

        Ok(json!({
            "services": services,
            "count": services.len(),
            "totalAmount": total_amount,
        }))
    }

    async fn find(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Service, AppError> {
        let service = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Servicio no encontrado".to_string()))?;

        user.ensure_branch_access(service.branch_id)?;
        Ok(service)
    }

    async fn status(&self, status_id: i32) -> Result<WorkStatus, AppError> {
        lookup_cache::work_statuses(&self.state)
            .await?
            .into_iter()
            .find(|s| s.id == status_id)
            .ok_or_else(|| AppError::NotFound("Estado no encontrado".to_string()))
    }

    /// Mecánico activo de una sucursal visible para el usuario
    async fn assignable_mechanic(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Mechanic, AppError> {
        let mechanic = self
            .mechanics
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Mecánico no encontrado".to_string()))?;

        if !mechanic.is_active {
            return Err(AppError::BadRequest("El mecánico está inactivo".to_string()));
        }
        user.ensure_branch_access(mechanic.branch_id)?;

        Ok(mechanic)
    }
}
