use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::controllers::service_controller::ServiceController;
use crate::dto::appointment_dto::{
    AppointmentQuery, ConvertAppointmentRequest, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::dto::common_dto::{ApiResponse, Pagination};
use crate::dto::service_dto::CreateServiceRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::repositories::appointment_repository::AppointmentRepository;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Una cita solo genera orden si sigue abierta, no tiene servicio y es del
/// mismo cliente y vehículo
pub fn ensure_linkable(appointment: &Appointment, client_id: Uuid, vehicle_id: Uuid) -> Result<(), AppError> {
    if appointment.parsed_status().is_some_and(|s| s.is_closed()) {
        return Err(AppError::BadRequest(format!(
            "La cita está en estado {} y no se puede convertir",
            appointment.status
        )));
    }
    if appointment.service_id.is_some() {
        return Err(AppError::Conflict("La cita ya tiene un servicio asociado".to_string()));
    }
    if appointment.client_id != client_id || appointment.vehicle_id != vehicle_id {
        return Err(AppError::BadRequest(
            "La cita no corresponde al cliente y vehículo indicados".to_string(),
        ));
    }
    Ok(())
}

pub struct AppointmentController {
    state: AppState,
    repository: AppointmentRepository,
    clients: ClientRepository,
    vehicles: VehicleRepository,
}

impl AppointmentController {
    pub fn new(state: AppState) -> Self {
        let pool = state.pool.clone();
        Self {
            repository: AppointmentRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
            state,
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, query: AppointmentQuery) -> Result<Value, AppError> {
        let pagination = Pagination::new(query.page, query.limit);
        let branch_id = user.branch_scope().or(query.branch_id);

        let (appointments, total) = self.repository.list(branch_id, &query, pagination).await?;

        Ok(json!({ "appointments": appointments, "pagination": pagination.meta(total) }))
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Appointment, AppError> {
        let appointment = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cita no encontrada".to_string()))?;

        user.ensure_branch_access(appointment.branch_id)?;
        Ok(appointment)
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateAppointmentRequest,
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

        let branch_id = match request.branch_id {
            Some(branch_id) if user.is_admin => branch_id,
            _ => client.branch_id,
        };

        let appointment = self.repository.create(branch_id, user.user_id, request).await?;

        info!("📅 Cita agendada: {} para {}", appointment.id, appointment.scheduled_date);
        Ok(ApiResponse::success_with_message(
            json!({ "appointment": appointment }),
            "Cita agendada exitosamente",
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        let current = self.get_by_id(user, id).await?;

        let completed = current.parsed_status() == Some(AppointmentStatus::Completed);
        if completed && request.status.is_some_and(|s| s != AppointmentStatus::Completed) {
            return Err(AppError::BadRequest(
                "Una cita completada no puede cambiar de estado".to_string(),
            ));
        }

        let appointment = self.repository.update(id, request).await?;
        Ok(ApiResponse::success_with_message(
            json!({ "appointment": appointment }),
            "Cita actualizada exitosamente",
        ))
    }

    /// Eliminar una cita es cancelarla; el registro se conserva
    pub async fn cancel(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Appointment, AppError> {
        let current = self.get_by_id(user, id).await?;

        if current.parsed_status() == Some(AppointmentStatus::Completed) {
            return Err(AppError::BadRequest(
                "No se puede cancelar una cita completada".to_string(),
            ));
        }

        let appointment = self.repository.set_status(id, AppointmentStatus::Cancelled).await?;
        info!("🚫 Cita cancelada: {}", id);
        Ok(appointment)
    }

    /// Generar una orden de servicio a partir de la cita
    pub async fn convert_to_service(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: ConvertAppointmentRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        let appointment = self.get_by_id(user, id).await?;
        ensure_linkable(&appointment, appointment.client_id, appointment.vehicle_id)?;

        let problem_description = request
            .problem_description
            .or_else(|| appointment.service_type.clone())
            .or_else(|| appointment.notes.clone())
            .unwrap_or_else(|| "Servicio agendado".to_string());

        ServiceController::new(self.state.clone())
            .create(
                user,
                CreateServiceRequest {
                    client_id: appointment.client_id,
                    vehicle_id: appointment.vehicle_id,
                    mechanic_id: request.mechanic_id,
                    status_id: None,
                    appointment_id: Some(appointment.id),
                    problem_description,
                    diagnosis: None,
                    quotation_details: None,
                    total_amount: None,
                    mechanic_commission: None,
                    branch_id: Some(appointment.branch_id),
                },
            )
            .await
    }
}
