//! Error handling for the Gestionale platform
//!
//! Provides consistent error responses in English and Italian

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{FleetError, OrderStateError, PricingError, ReceiptError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_it: String,
    },

    #[error("Invalid format for {field}")]
    InvalidFormat { field: String },

    #[error("Checksum mismatch for {field}")]
    ChecksumMismatch { field: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_it: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    OrderState(#[from] OrderStateError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    // External service errors
    #[error("Mail delivery error: {0}")]
    MailError(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_it: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

fn detail(code: &str, message_en: String, message_it: String, field: Option<String>) -> ErrorDetail {
    ErrorDetail {
        code: code.to_string(),
        message_en,
        message_it,
        field,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                detail(
                    "INVALID_CREDENTIALS",
                    "Invalid email or password".to_string(),
                    "Email o password non validi".to_string(),
                    None,
                ),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                detail(
                    "TOKEN_EXPIRED",
                    "Token has expired".to_string(),
                    "Il token è scaduto".to_string(),
                    None,
                ),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                detail(
                    "INVALID_TOKEN",
                    "Invalid token".to_string(),
                    "Token non valido".to_string(),
                    None,
                ),
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                detail(
                    "INSUFFICIENT_PERMISSIONS",
                    "You do not have permission to perform this action".to_string(),
                    "Non hai i permessi per eseguire questa operazione".to_string(),
                    None,
                ),
            ),
            AppError::Validation {
                field,
                message,
                message_it,
            } => (
                StatusCode::BAD_REQUEST,
                detail(
                    "VALIDATION_ERROR",
                    message.clone(),
                    message_it.clone(),
                    Some(field.clone()),
                ),
            ),
            AppError::InvalidFormat { field } => (
                StatusCode::BAD_REQUEST,
                detail(
                    "INVALID_FORMAT",
                    format!("Invalid format for {}", field),
                    format!("Formato non valido per {}", field),
                    Some(field.clone()),
                ),
            ),
            AppError::ChecksumMismatch { field } => (
                StatusCode::BAD_REQUEST,
                detail(
                    "CHECKSUM_MISMATCH",
                    format!("Checksum mismatch for {}", field),
                    format!("Cifra di controllo errata per {}", field),
                    Some(field.clone()),
                ),
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                detail(
                    "DUPLICATE_ENTRY",
                    format!("A record with this {} already exists", field),
                    format!("Esiste già un record con questo {}", field),
                    Some(field.clone()),
                ),
            ),
            AppError::Conflict {
                resource,
                message,
                message_it,
            } => (
                StatusCode::CONFLICT,
                detail(
                    "CONFLICT",
                    message.clone(),
                    message_it.clone(),
                    Some(resource.clone()),
                ),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                detail(
                    "NOT_FOUND",
                    format!("{} not found", resource),
                    format!("{} non trovato", resource),
                    None,
                ),
            ),
            AppError::Pricing(err) => {
                let (code, message_it) = match err {
                    PricingError::InvalidPrice => {
                        ("INVALID_PRICE", "Il prezzo unitario deve essere positivo")
                    }
                    PricingError::InvalidQuantity => {
                        ("INVALID_QUANTITY", "La quantità deve essere positiva")
                    }
                    PricingError::InvalidDiscount => {
                        ("INVALID_DISCOUNT", "Lo sconto deve essere tra 0 e 100")
                    }
                    PricingError::MissingPackagingMultiplier => (
                        "MISSING_PACKAGING_MULTIPLIER",
                        "Indicare i pezzi per confezione",
                    ),
                };
                (
                    StatusCode::BAD_REQUEST,
                    detail(code, err.to_string(), message_it.to_string(), None),
                )
            }
            AppError::OrderState(err) => {
                let code = match err {
                    OrderStateError::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
                    OrderStateError::MissingRequiredDate => "MISSING_REQUIRED_DATE",
                };
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    detail(
                        code,
                        err.to_string(),
                        "Cambio di stato non consentito".to_string(),
                        None,
                    ),
                )
            }
            AppError::Receipt(err) => {
                let (status, code, message_it) = match err {
                    ReceiptError::OrderNotReceivable => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "ORDER_NOT_RECEIVABLE",
                        "L'ordine non è in uno stato ricevibile",
                    ),
                    ReceiptError::ReceiptAlreadyExists => (
                        StatusCode::CONFLICT,
                        "RECEIPT_ALREADY_EXISTS",
                        "Esiste già una ricezione per questo ordine",
                    ),
                    ReceiptError::InvalidLineItem => (
                        StatusCode::BAD_REQUEST,
                        "INVALID_LINE_ITEM",
                        "La quantità ricevuta deve essere positiva",
                    ),
                };
                (
                    status,
                    detail(code, err.to_string(), message_it.to_string(), None),
                )
            }
            AppError::Fleet(err) => (
                StatusCode::BAD_REQUEST,
                detail(
                    "ODOMETER_REGRESSION",
                    err.to_string(),
                    "Il chilometraggio è inferiore all'ultima lettura registrata".to_string(),
                    Some("odometer_km".to_string()),
                ),
            ),
            AppError::MailError(msg) => (
                StatusCode::BAD_GATEWAY,
                detail(
                    "MAIL_ERROR",
                    format!("Mail delivery error: {}", msg),
                    format!("Errore nell'invio dell'email: {}", msg),
                    None,
                ),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    "Si è verificato un errore del database".to_string(),
                    None,
                ),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "INTERNAL_ERROR",
                    msg.clone(),
                    "Errore interno del server".to_string(),
                    None,
                ),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail(
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    "Errore interno del server".to_string(),
                    None,
                ),
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
