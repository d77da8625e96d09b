//! Recepción de vehículos
//!
//! Cliente, vehículo, orden de servicio, checklist, firma, kilometraje y
//! cita se guardan en una sola transacción: si algo falla no queda nada a
//! medias.

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgConnection;
use tracing::info;
use validator::Validate;

use crate::controllers::appointment_controller::ensure_linkable;
use crate::dto::client_dto::ContactInfo;
use crate::dto::common_dto::ApiResponse;
use crate::dto::reception_dto::ReceiveVehicleRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::appointment::AppointmentStatus;
use crate::models::client::Client;
use crate::models::service::{Service, ServiceSummary};
use crate::models::vehicle::Vehicle;
use crate::models::work_status::STATUS_RECIBIDO;
use crate::repositories::appointment_repository::AppointmentRepository;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::mechanic_repository::MechanicRepository;
use crate::repositories::service_repository::{NewService, ReceptionData, ServiceRepository};
use crate::repositories::vehicle_repository::{NewVehicle, VehicleRepository};
use crate::repositories::work_status_repository::WorkStatusRepository;
use crate::services::status_rules::{transition_timestamps, StatusKind};
use crate::state::AppState;
use crate::utils::errors::{conflict_error, AppError};
use crate::utils::validation::normalize_plate;

pub struct ReceptionController {
    state: AppState,
}

impl ReceptionController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn receive_vehicle(
        &self,
        user: &AuthenticatedUser,
        request: ReceiveVehicleRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;

        let mut tx = self.state.pool.begin().await?;

        let client = resolve_client(&mut tx, user, &request).await?;
        let vehicle = resolve_vehicle(&mut tx, &client, &request).await?;

        if let Some(appointment_id) = request.appointment_id {
            let appointment = AppointmentRepository::find_by_id_in(&mut tx, appointment_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Cita no encontrada".to_string()))?;
            user.ensure_branch_access(appointment.branch_id)?;
            ensure_linkable(&appointment, client.id, vehicle.id)?;
        }

        let service = match request.service_id {
            Some(service_id) => open_service(&mut tx, user, service_id, &vehicle).await?,
            None => new_service(&mut tx, user, &client, &vehicle, &request).await?,
        };

        let received_at = Utc::now();
        let service = ServiceRepository::apply_reception_in(
            &mut tx,
            service.id,
            ReceptionData {
                received_by: user.user_id,
                kilometraje: request.kilometraje,
                nivel_combustible: request.nivel_combustible,
                checklist: request.checklist.clone(),
                carroceria_notes: request.carroceria_notes.clone(),
                observaciones: request.observaciones.clone(),
                signature_data: request.signature.clone(),
                signed_by: request.signed_by.clone(),
            },
            received_at,
        )
        .await?;

        if let Some(kilometraje) = request.kilometraje {
            VehicleRepository::update_mileage_in(&mut tx, vehicle.id, kilometraje).await?;
        }

        if let Some(appointment_id) = request.appointment_id {
            AppointmentRepository::link_service_in(&mut tx, appointment_id, service.id, AppointmentStatus::Completed)
                .await?;
        }

        tx.commit().await?;

        info!("📥 Vehículo {} recibido (servicio {})", vehicle.plate, service.id);

        Ok(ApiResponse::success_with_message(
            json!({ "service": service, "client": client, "vehicle": vehicle }),
            "Vehículo recibido exitosamente",
        ))
    }

    /// Vehículos recibidos hoy en la sucursal del usuario
    pub async fn received_today(&self, user: &AuthenticatedUser) -> Result<Vec<ServiceSummary>, AppError> {
        ServiceRepository::new(self.state.pool.clone())
            .received_on(user.branch_scope(), Utc::now().date_naive())
            .await
    }
}

/// Cliente existente o nuevo
async fn resolve_client(
    conn: &mut PgConnection,
    user: &AuthenticatedUser,
    request: &ReceiveVehicleRequest,
) -> Result<Client, AppError> {
    if let Some(client_id) = request.client_id {
        let client = ClientRepository::find_by_id_in(conn, client_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;
        user.ensure_branch_access(client.branch_id)?;
        return Ok(client);
    }

    let data = request
        .client
        .clone()
        .ok_or_else(|| AppError::BadRequest("Faltan los datos del cliente".to_string()))?;
    let contact = ContactInfo::unify(data.phone.clone(), data.whatsapp.clone());
    let branch_id = user.target_branch(data.branch_id);

    let client = ClientRepository::create_in(conn, branch_id, data, contact).await?;
    info!("👤 Cliente creado en recepción: {}", client.name);
    Ok(client)
}

/// Vehículo existente o nuevo; una placa registrada solo se reutiliza si es del mismo cliente
async fn resolve_vehicle(
    conn: &mut PgConnection,
    client: &Client,
    request: &ReceiveVehicleRequest,
) -> Result<Vehicle, AppError> {
    if let Some(vehicle_id) = request.vehicle_id {
        let vehicle = VehicleRepository::find_by_id_in(conn, vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;
        if vehicle.client_id != client.id {
            return Err(AppError::BadRequest("El vehículo no pertenece al cliente".to_string()));
        }
        return Ok(vehicle);
    }

    let data = request
        .vehicle
        .clone()
        .ok_or_else(|| AppError::BadRequest("Faltan los datos del vehículo".to_string()))?;

    match VehicleRepository::find_by_plate_in(conn, &data.plate).await? {
        Some(existing) if existing.client_id == client.id => Ok(existing),
        Some(_) => Err(conflict_error("Vehículo", "placa", &normalize_plate(&data.plate))),
        None => {
            let vehicle = VehicleRepository::create_in(
                conn,
                NewVehicle {
                    client_id: client.id,
                    plate: data.plate,
                    brand: data.brand,
                    model: data.model,
                    year: data.year,
                    color: data.color,
                    fuel_type: data.fuel_type,
                    transmission: data.transmission,
                    vin: None,
                    mileage: request.kilometraje,
                    notes: None,
                },
            )
            .await?;
            info!("🚗 Vehículo creado en recepción: {}", vehicle.plate);
            Ok(vehicle)
        }
    }
}

/// Orden existente que aún no está cerrada
async fn open_service(
    conn: &mut PgConnection,
    user: &AuthenticatedUser,
    service_id: uuid::Uuid,
    vehicle: &Vehicle,
) -> Result<Service, AppError> {
    let service = ServiceRepository::lock_in(conn, service_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Servicio no encontrado".to_string()))?;
    user.ensure_branch_access(service.branch_id)?;

    if service.vehicle_id != vehicle.id {
        return Err(AppError::BadRequest("El servicio corresponde a otro vehículo".to_string()));
    }

    let closed = WorkStatusRepository::find_by_id_in(conn, service.status_id)
        .await?
        .is_some_and(|status| StatusKind::of(&status).is_closed());
    if closed {
        return Err(AppError::BadRequest("El servicio ya está cerrado".to_string()));
    }

    Ok(service)
}

/// Orden nueva en estado RECIBIDO con su primer registro de historial
async fn new_service(
    conn: &mut PgConnection,
    user: &AuthenticatedUser,
    client: &Client,
    vehicle: &Vehicle,
    request: &ReceiveVehicleRequest,
) -> Result<Service, AppError> {
    let status = WorkStatusRepository::find_by_id_in(conn, STATUS_RECIBIDO)
        .await?
        .ok_or_else(|| AppError::Internal("El estado RECIBIDO no existe".to_string()))?;

    let mechanic_id = match request.mechanic_id {
        Some(mechanic_id) => {
            let mechanic = MechanicRepository::find_by_id_in(conn, mechanic_id)
                .await?
                .filter(|m| m.is_active)
                .ok_or_else(|| AppError::NotFound("Mecánico no encontrado".to_string()))?;
            user.ensure_branch_access(mechanic.branch_id)?;
            Some(mechanic.id)
        }
        None => None,
    };

    let service = ServiceRepository::create_in(
        conn,
        NewService {
            branch_id: client.branch_id,
            client_id: client.id,
            vehicle_id: vehicle.id,
            mechanic_id,
            status_id: status.id,
            appointment_id: request.appointment_id,
            problem_description: request.problem_description.clone(),
            diagnosis: None,
            quotation_details: None,
            total_amount: Decimal::ZERO,
            mechanic_commission: Decimal::ZERO,
            timestamps: transition_timestamps(StatusKind::of(&status), None, Utc::now()),
        },
    )
    .await?;

    ServiceRepository::insert_status_log_in(
        conn,
        service.id,
        None,
        service.status_id,
        Some(user.user_id),
        Some("Vehículo recibido".to_string()),
    )
    .await?;

    Ok(service)
}
