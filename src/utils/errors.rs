//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Una sub-consulta del motor de riesgo no pudo responder.
    /// El scoring completo se aborta: nunca se persiste un snapshot parcial.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                eprintln!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::DataUnavailable(msg) => {
                eprintln!("Data unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: "Data Unavailable".to_string(),
                        message: "A required data source failed to answer".to_string(),
                        details: Some(json!({ "source_error": msg })),
                        code: Some("DATA_UNAVAILABLE".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                eprintln!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                eprintln!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                eprintln!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }

            AppError::ServiceUnavailable(msg) => {
                eprintln!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: "Service Unavailable".to_string(),
                        message: msg,
                        details: None,
                        code: Some("SERVICE_UNAVAILABLE".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_names_resource_and_id() {
        match not_found_error("Vehicle", "abc-123") {
            AppError::NotFound(msg) => {
                assert!(msg.contains("Vehicle"));
                assert!(msg.contains("'abc-123'"));
                assert!(msg.contains("not found"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
