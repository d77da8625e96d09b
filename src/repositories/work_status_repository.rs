use sqlx::{PgConnection, PgPool};

use crate::models::work_status::WorkStatus;
use crate::services::status_rules::StatusKind;
use crate::utils::errors::AppError;

pub struct WorkStatusRepository {
    pool: PgPool,
}

impl WorkStatusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<WorkStatus>, AppError> {
        let statuses =
            sqlx::query_as::<_, WorkStatus>("SELECT * FROM work_statuses ORDER BY order_index")
                .fetch_all(&self.pool)
                .await?;

        Ok(statuses)
    }

    pub async fn find_by_id_in(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<Option<WorkStatus>, AppError> {
        let status = sqlx::query_as::<_, WorkStatus>("SELECT * FROM work_statuses WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(status)
    }

    /// Ids de los estados cuya clase cumple `predicate`
    pub async fn ids_where(&self, predicate: impl Fn(StatusKind) -> bool) -> Result<Vec<i32>, AppError> {
        Ok(self
            .list()
            .await?
            .iter()
            .filter(|status| predicate(StatusKind::of(status)))
            .map(|status| status.id)
            .collect())
    }

    /// Estados cerrados (terminado o rechazado)
    pub async fn closed_ids(&self) -> Result<Vec<i32>, AppError> {
        self.ids_where(|kind| kind.is_closed()).await
    }

    pub async fn completed_ids(&self) -> Result<Vec<i32>, AppError> {
        self.ids_where(|kind| kind == StatusKind::Completed).await
    }
}
