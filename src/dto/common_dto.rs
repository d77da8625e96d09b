use serde::{Deserialize, Serialize};

/// Límite por defecto de registros por página
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Límite máximo de registros por página
pub const MAX_PAGE_SIZE: i64 = 100;

// Response genérica: { success, message, data }
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: "OK".to_string(),
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Página solicitada, ya acotada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta {
            page: self.page,
            limit: self.limit,
            total,
            total_pages: (total + self.limit - 1) / self.limit,
        }
    }
}

// Metadatos de paginación para el frontend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_bounds() {
        assert_eq!(Pagination::new(None, None), Pagination { page: 1, limit: DEFAULT_PAGE_SIZE });
        assert_eq!(Pagination::new(Some(0), Some(1000)), Pagination { page: 1, limit: MAX_PAGE_SIZE });
        assert_eq!(Pagination::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = Pagination::new(Some(2), Some(10)).meta(35);
        assert_eq!(meta.total_pages, 4);
        assert_eq!(Pagination::new(None, None).meta(0).total_pages, 0);
    }

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success_with_message(5, "Creado")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Creado");
        assert_eq!(body["data"], 5);
    }
}
