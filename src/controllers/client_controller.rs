use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::client_dto::{ClientQuery, ContactInfo, CreateClientRequest, UpdateClientRequest};
use crate::dto::common_dto::{ApiResponse, Pagination};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::client::Client;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::work_status_repository::WorkStatusRepository;
use crate::utils::errors::{validation_error, AppError};

pub struct ClientController {
    repository: ClientRepository,
    statuses: WorkStatusRepository,
}

impl ClientController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClientRepository::new(pool.clone()),
            statuses: WorkStatusRepository::new(pool),
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, query: ClientQuery) -> Result<Value, AppError> {
        let pagination = Pagination::new(query.page, query.limit);
        let branch_id = user.branch_scope().or(query.branch_id);

        let (clients, total) = self
            .repository
            .list(branch_id, query.search.as_deref(), pagination)
            .await?;

        Ok(json!({ "clients": clients, "pagination": pagination.meta(total) }))
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Client, AppError> {
        let client = self
            .repository
            .find_by_id(id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;

        user.ensure_branch_access(client.branch_id)?;
        Ok(client)
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateClientRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;

        let contact = ContactInfo::unify(request.phone.clone(), request.whatsapp.clone());
        let branch_id = user.target_branch(request.branch_id);
        let client = self.repository.create(branch_id, request, contact).await?;

        info!("👤 Cliente creado: {} ({})", client.name, client.id);
        Ok(ApiResponse::success_with_message(
            json!({ "client": client }),
            "Cliente creado exitosamente",
        ))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<ApiResponse<Value>, AppError> {
        request.validate()?;
        let current = self.get_by_id(user, id).await?;

        // Lo que no llega conserva el valor actual; un string vacío lo borra
        let phone = match &request.phone {
            Some(value) => Some(value.clone()),
            None => current.phone.clone(),
        };
        let whatsapp = match &request.whatsapp {
            Some(value) => Some(value.clone()),
            None => current.whatsapp.clone(),
        };

        let contact = ContactInfo::unify(phone, whatsapp);
        if contact.is_empty() {
            return Err(validation_error("phone", "Se requiere teléfono o WhatsApp"));
        }

        let client = self.repository.update(&current, request, contact).await?;
        Ok(ApiResponse::success_with_message(
            json!({ "client": client }),
            "Cliente actualizado exitosamente",
        ))
    }

    /// Baja lógica, bloqueada si el cliente tiene citas activas o servicios abiertos
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        let client = self.get_by_id(user, id).await?;

        let closed = self.statuses.closed_ids().await?;
        let dependencies = self.repository.dependencies(id, &closed).await?;

        if dependencies.active_appointments > 0 {
            return Err(AppError::BadRequest(format!(
                "No se puede eliminar el cliente: tiene {} cita(s) activa(s)",
                dependencies.active_appointments
            )));
        }
        if dependencies.open_services > 0 {
            return Err(AppError::BadRequest(format!(
                "No se puede eliminar el cliente: tiene {} servicio(s) abierto(s)",
                dependencies.open_services
            )));
        }

        self.repository.deactivate(id).await?;
        info!("🗑️ Cliente desactivado: {}", client.name);
        Ok(())
    }
}
