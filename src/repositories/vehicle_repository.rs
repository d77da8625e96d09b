use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::common_dto::Pagination;
use crate::dto::vehicle_dto::UpdateVehicleRequest;
use crate::models::vehicle::{Vehicle, VehicleWithOwner};
use crate::utils::errors::AppError;
use crate::utils::validation::{normalize_optional, normalize_plate};

const OWNER_SELECT: &str = r#"
    SELECT v.id, v.client_id, c.name AS client_name, COALESCE(c.phone, c.whatsapp) AS client_phone,
           v.plate, v.brand, v.model, v.year, v.color, v.fuel_type, v.transmission,
           v.mileage, v.created_at
    FROM vehicles v
    JOIN clients c ON c.id = v.client_id
"#;

/// Datos para registrar un vehículo
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub client_id: Uuid,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub vin: Option<String>,
    pub mileage: Option<i32>,
    pub notes: Option<String>,
}

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Vehículos visibles para la sucursal (a través del dueño)
    pub async fn list(
        &self,
        branch_id: Option<Uuid>,
        client_id: Option<Uuid>,
        search: Option<&str>,
        pagination: Pagination,
    ) -> Result<(Vec<VehicleWithOwner>, i64), AppError> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let filter = r#"
            WHERE ($1::uuid IS NULL OR c.branch_id = $1)
              AND ($2::uuid IS NULL OR v.client_id = $2)
              AND ($3::text IS NULL OR v.plate ILIKE $3 OR v.brand ILIKE $3
                   OR v.model ILIKE $3 OR c.name ILIKE $3)
        "#;

        let vehicles = sqlx::query_as::<_, VehicleWithOwner>(&format!(
            "{} {} ORDER BY v.plate LIMIT $4 OFFSET $5",
            OWNER_SELECT, filter
        ))
        .bind(branch_id)
        .bind(client_id)
        .bind(pattern.as_deref())
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM vehicles v JOIN clients c ON c.id = v.client_id {}",
            filter
        ))
        .bind(branch_id)
        .bind(client_id)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((vehicles, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(conn: &mut PgConnection, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(vehicle)
    }

    /// Búsqueda por placa con los datos del dueño
    pub async fn find_by_plate(&self, plate: &str) -> Result<Option<VehicleWithOwner>, AppError> {
        let vehicle = sqlx::query_as::<_, VehicleWithOwner>(&format!("{} WHERE v.plate = $1", OWNER_SELECT))
            .bind(normalize_plate(plate))
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_plate_in(conn: &mut PgConnection, plate: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE plate = $1")
            .bind(normalize_plate(plate))
            .fetch_optional(conn)
            .await?;

        Ok(vehicle)
    }

    pub async fn plate_exists(&self, plate: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE plate = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(normalize_plate(plate))
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::create_in(&mut conn, vehicle).await
    }

    pub async fn create_in(conn: &mut PgConnection, vehicle: NewVehicle) -> Result<Vehicle, AppError> {
        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, client_id, plate, brand, model, year, color, fuel_type,
                                  transmission, vin, mileage, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle.client_id)
        .bind(normalize_plate(&vehicle.plate))
        .bind(vehicle.brand.trim())
        .bind(vehicle.model.trim())
        .bind(vehicle.year)
        .bind(normalize_optional(vehicle.color))
        .bind(normalize_optional(vehicle.fuel_type))
        .bind(normalize_optional(vehicle.transmission))
        .bind(normalize_optional(vehicle.vin))
        .bind(vehicle.mileage)
        .bind(normalize_optional(vehicle.notes))
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, id: Uuid, request: UpdateVehicleRequest) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET client_id = COALESCE($2, client_id),
                plate = COALESCE($3, plate),
                brand = COALESCE($4, brand),
                model = COALESCE($5, model),
                year = COALESCE($6, year),
                color = COALESCE($7, color),
                fuel_type = COALESCE($8, fuel_type),
                transmission = COALESCE($9, transmission),
                vin = COALESCE($10, vin),
                mileage = COALESCE($11, mileage),
                notes = COALESCE($12, notes),
                updated_at = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.client_id)
        .bind(request.plate.as_deref().map(normalize_plate))
        .bind(request.brand.as_deref().map(str::trim))
        .bind(request.model.as_deref().map(str::trim))
        .bind(request.year)
        .bind(request.color)
        .bind(request.fuel_type)
        .bind(request.transmission)
        .bind(request.vin)
        .bind(request.mileage)
        .bind(request.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Registrar el kilometraje leído en una recepción
    pub async fn update_mileage_in(conn: &mut PgConnection, id: Uuid, mileage: i32) -> Result<(), AppError> {
        sqlx::query("UPDATE vehicles SET mileage = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(mileage)
            .bind(Utc::now())
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Servicios, citas y oportunidades que referencian al vehículo
    pub async fn count_dependencies(&self, id: Uuid) -> Result<(i64, i64, i64), AppError> {
        let counts = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM services WHERE vehicle_id = $1),
                (SELECT COUNT(*) FROM appointments WHERE vehicle_id = $1),
                (SELECT COUNT(*) FROM opportunities WHERE vehicle_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        Ok(())
    }
}
